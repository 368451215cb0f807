//! Schema → type-expression synthesis.
//!
//! Pure function of (node, definitions table): deref, strip the nullable
//! arm, dispatch on the discriminated core, recurse. The visited-reference
//! set threads through the whole recursion, so a definition that reaches
//! itself through nested properties degrades to `t.anything` instead of
//! recursing forever. No state survives across properties.

use std::collections::BTreeSet;

use crate::expr::{Literal, OptionDecl, TypeExpr};
use crate::normalize::strip_nullable;
use crate::resolve::{Resolver, SeenRefs};
use crate::schema::{AdditionalProperties, ScalarKind, SchemaKind, SchemaNode, TypeField};

/// Full type for a schema node: normalize away nullability, compute the base
/// type on the stripped core, wrap in `nullOr` iff a null arm was removed.
pub fn type_for_schema(resolver: &Resolver, node: &SchemaNode, seen: &SeenRefs) -> TypeExpr {
    let (schema, seen) = resolver.deref(node, seen);
    let (core, nullable) = strip_nullable(schema);
    let base = base_type_for_schema(resolver, &core, &seen);
    if nullable {
        TypeExpr::NullOr(Box::new(base))
    } else {
        base
    }
}

/// Base-type dispatch over the discriminated (deref'd, stripped) core.
pub fn base_type_for_schema(resolver: &Resolver, node: &SchemaNode, seen: &SeenRefs) -> TypeExpr {
    match node.kind() {
        SchemaKind::Const(value) => TypeExpr::Enum(vec![Literal::from_json(value)]),
        SchemaKind::Enum(values) => {
            TypeExpr::Enum(values.iter().map(Literal::from_json).collect())
        }
        SchemaKind::AnyOf(branches) | SchemaKind::OneOf(branches) => one_of(
            branches
                .iter()
                .map(|branch| type_for_schema(resolver, branch, seen))
                .collect(),
        ),
        // allOf would need structural merging; emit the open type instead.
        SchemaKind::AllOf => TypeExpr::Anything,
        SchemaKind::TypeUnion(entries) => one_of(
            entries
                .iter()
                .map(|entry| {
                    let single = SchemaNode {
                        ty: Some(TypeField::One(entry.clone())),
                        ..SchemaNode::default()
                    };
                    type_for_schema(resolver, &single, seen)
                })
                .collect(),
        ),
        SchemaKind::Scalar(ScalarKind::Str) => TypeExpr::Str,
        SchemaKind::Scalar(ScalarKind::Number) => TypeExpr::Number,
        SchemaKind::Scalar(ScalarKind::Int) => TypeExpr::Int,
        SchemaKind::Scalar(ScalarKind::Bool) => TypeExpr::Bool,
        SchemaKind::Array(items) => {
            // absent `items` means the same as the empty schema
            let item = match items {
                Some(items) => type_for_schema(resolver, items, seen),
                None => TypeExpr::Anything,
            };
            TypeExpr::ListOf(Box::new(item))
        }
        SchemaKind::Object(object) => object_type_for_schema(resolver, object, seen),
        SchemaKind::Unknown => TypeExpr::Anything,
    }
}

/// Options for every property of an object node, sorted by key. Shared by
/// submodule synthesis and the top-level assembler.
pub fn options_for_object(
    resolver: &Resolver,
    schema: &SchemaNode,
    seen: &SeenRefs,
) -> Vec<OptionDecl> {
    let Some(properties) = &schema.properties else {
        return Vec::new();
    };
    let required: BTreeSet<&str> = schema
        .required
        .iter()
        .flatten()
        .map(String::as_str)
        .collect();

    let mut keys: Vec<&String> = properties.keys().collect();
    keys.sort();
    keys.into_iter()
        .map(|key| {
            option_for_property(
                resolver,
                key,
                &properties[key],
                required.contains(key.as_str()),
                seen,
            )
        })
        .collect()
}

fn option_for_property(
    resolver: &Resolver,
    key: &str,
    node: &SchemaNode,
    required: bool,
    seen: &SeenRefs,
) -> OptionDecl {
    // description comes from the resolved node, not the bare `$ref` wrapper
    let (schema, seen) = resolver.deref(node, seen);
    OptionDecl {
        key: key.to_string(),
        ty: type_for_schema(resolver, schema, &seen),
        description: schema.description.clone(),
        required,
    }
}

fn object_type_for_schema(resolver: &Resolver, schema: &SchemaNode, seen: &SeenRefs) -> TypeExpr {
    let has_properties = schema
        .properties
        .as_ref()
        .is_some_and(|properties| !properties.is_empty());
    if has_properties {
        return TypeExpr::Submodule(options_for_object(resolver, schema, seen));
    }
    match &schema.additional_properties {
        Some(AdditionalProperties::Schema(value_schema)) => {
            TypeExpr::AttrsOf(Box::new(type_for_schema(resolver, value_schema, seen)))
        }
        _ => TypeExpr::Attrs,
    }
}

// A one-armed union is just that arm.
fn one_of(mut arms: Vec<TypeExpr>) -> TypeExpr {
    match arms.len() {
        0 => TypeExpr::Anything,
        1 => arms.remove(0),
        _ => TypeExpr::OneOf(arms),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
