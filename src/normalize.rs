//! Nullable-union normalization.
//!
//! Rewrites X ∪ null into (X, nullable) so synthesis can wrap the remainder
//! in `t.nullOr`. Both union spellings are handled: a null-typed branch in
//! `anyOf`/`oneOf`, and `"null"` inside a type array.

use crate::schema::{SchemaNode, TypeField};

/// Split a deref'd schema into its non-null core and a nullability flag.
///
/// The returned core is owned and carries the filtered union (or the
/// collapsed type field) in place of the original. Callers deref before
/// calling; branch schemas themselves are matched shallowly, as emitted.
pub fn strip_nullable(schema: &SchemaNode) -> (SchemaNode, bool) {
    if let Some(branches) = &schema.any_of {
        let (kept, nullable) = filter_null_branches(branches);
        let mut core = schema.clone();
        core.any_of = Some(kept);
        return (core, nullable);
    }

    if let Some(branches) = &schema.one_of {
        let (kept, nullable) = filter_null_branches(branches);
        let mut core = schema.clone();
        core.one_of = Some(kept);
        return (core, nullable);
    }

    if let Some(TypeField::Many(entries)) = &schema.ty {
        let nullable = entries.iter().any(|entry| entry == "null");
        let kept: Vec<String> = entries
            .iter()
            .filter(|entry| *entry != "null")
            .cloned()
            .collect();
        let mut core = schema.clone();
        core.ty = Some(if kept.len() == 1 {
            TypeField::One(kept.into_iter().next().unwrap())
        } else {
            TypeField::Many(kept)
        });
        return (core, nullable);
    }

    (schema.clone(), false)
}

fn filter_null_branches(branches: &[SchemaNode]) -> (Vec<SchemaNode>, bool) {
    let nullable = branches.iter().any(is_null_schema);
    let kept = branches
        .iter()
        .filter(|branch| !is_null_schema(branch))
        .cloned()
        .collect();
    (kept, nullable)
}

fn is_null_schema(schema: &SchemaNode) -> bool {
    match &schema.ty {
        Some(TypeField::One(name)) => name == "null",
        Some(TypeField::Many(entries)) => entries.iter().any(|entry| entry == "null"),
        None => false,
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
