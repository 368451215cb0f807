//! `$ref` resolution with cycle protection.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::schema::SchemaNode;

const DEFINITIONS_PREFIX: &str = "#/definitions/";
const DEFS_PREFIX: &str = "#/$defs/";

/// Fallback for unresolved and cyclic chains; synthesizes to `t.anything`.
static EMPTY: Lazy<SchemaNode> = Lazy::new(SchemaNode::default);

/// Append-only set of references visited along one synthesis path.
///
/// Extending copies; earlier holders never observe the extension, so sibling
/// subtrees resolve the same definition independently.
#[derive(Clone, Debug, Default)]
pub struct SeenRefs(BTreeSet<String>);

impl SeenRefs {
    pub fn contains(&self, reference: &str) -> bool {
        self.0.contains(reference)
    }

    pub fn with(&self, reference: &str) -> Self {
        let mut next = self.0.clone();
        next.insert(reference.to_string());
        Self(next)
    }
}

/// Dereferences `$ref` chains against an explicit definitions table.
///
/// Holds no state beyond the borrowed table; callers thread their own
/// visited set through every resolution.
pub struct Resolver<'a> {
    definitions: &'a IndexMap<String, SchemaNode>,
}

impl<'a> Resolver<'a> {
    pub fn new(definitions: &'a IndexMap<String, SchemaNode>) -> Self {
        Self { definitions }
    }

    /// Look up a local reference. Only `#/definitions/<name>` and
    /// `#/$defs/<name>` are supported; any other shape resolves to nothing.
    pub fn resolve_ref(&self, reference: &str) -> Option<&'a SchemaNode> {
        let name = reference
            .strip_prefix(DEFINITIONS_PREFIX)
            .or_else(|| reference.strip_prefix(DEFS_PREFIX))?;
        self.definitions.get(name)
    }

    /// Follow a `$ref` chain until a non-reference node is reached, returning
    /// the final node and the visited set extended with every reference
    /// traversed.
    ///
    /// A reference already present in `seen`, or one that resolves to
    /// nothing, degrades to the empty schema instead of recursing forever.
    /// Callers keep the returned set for the subtree so that definitions
    /// reaching themselves through nested properties degrade too.
    pub fn deref<'n>(&self, node: &'n SchemaNode, seen: &SeenRefs) -> (&'n SchemaNode, SeenRefs)
    where
        'a: 'n,
    {
        let Some(reference) = node.reference.as_deref() else {
            return (node, seen.clone());
        };
        if seen.contains(reference) {
            return (&EMPTY, seen.clone());
        }
        match self.resolve_ref(reference) {
            Some(resolved) => self.deref(resolved, &seen.with(reference)),
            None => (&EMPTY, seen.clone()),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> SchemaNode {
        serde_json::from_value(value).unwrap()
    }

    fn table(value: serde_json::Value) -> IndexMap<String, SchemaNode> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn resolve_ref_supports_both_prefixes() {
        let defs = table(json!({"port": {"type": "integer"}}));
        let resolver = Resolver::new(&defs);
        assert!(resolver.resolve_ref("#/definitions/port").is_some());
        assert!(resolver.resolve_ref("#/$defs/port").is_some());
        assert!(resolver.resolve_ref("#/definitions/missing").is_none());
        assert!(resolver.resolve_ref("#/components/schemas/port").is_none());
        assert!(resolver.resolve_ref("port").is_none());
    }

    #[test]
    fn deref_follows_chains_and_records_them() {
        let defs = table(json!({
            "a": {"$ref": "#/definitions/b"},
            "b": {"type": "string"},
        }));
        let resolver = Resolver::new(&defs);
        let start = node(json!({"$ref": "#/definitions/a"}));
        let (resolved, seen) = resolver.deref(&start, &SeenRefs::default());
        assert_eq!(resolved, &node(json!({"type": "string"})));
        assert!(seen.contains("#/definitions/a"));
        assert!(seen.contains("#/definitions/b"));
    }

    #[test]
    fn deref_leaves_plain_nodes_alone() {
        let defs = IndexMap::new();
        let resolver = Resolver::new(&defs);
        let plain = node(json!({"type": "boolean"}));
        let (resolved, _) = resolver.deref(&plain, &SeenRefs::default());
        assert_eq!(resolved, &plain);
    }

    #[test]
    fn direct_cycle_degrades_to_empty_schema() {
        let defs = table(json!({"loop": {"$ref": "#/definitions/loop"}}));
        let resolver = Resolver::new(&defs);
        let start = node(json!({"$ref": "#/definitions/loop"}));
        let (resolved, _) = resolver.deref(&start, &SeenRefs::default());
        assert_eq!(resolved, &SchemaNode::default());
    }

    #[test]
    fn transitive_cycle_degrades_to_empty_schema() {
        let defs = table(json!({
            "a": {"$ref": "#/definitions/b"},
            "b": {"$ref": "#/definitions/a"},
        }));
        let resolver = Resolver::new(&defs);
        let start = node(json!({"$ref": "#/definitions/a"}));
        let (resolved, _) = resolver.deref(&start, &SeenRefs::default());
        assert_eq!(resolved, &SchemaNode::default());
    }

    #[test]
    fn seen_reference_degrades_even_without_a_chain() {
        let defs = table(json!({"a": {"type": "string"}}));
        let resolver = Resolver::new(&defs);
        let start = node(json!({"$ref": "#/definitions/a"}));
        let seen = SeenRefs::default().with("#/definitions/a");
        let (resolved, _) = resolver.deref(&start, &seen);
        assert_eq!(resolved, &SchemaNode::default());
    }

    #[test]
    fn unresolved_ref_degrades_to_empty_schema() {
        let defs = IndexMap::new();
        let resolver = Resolver::new(&defs);
        let start = node(json!({"$ref": "#/definitions/nowhere"}));
        let (resolved, _) = resolver.deref(&start, &SeenRefs::default());
        assert_eq!(resolved, &SchemaNode::default());
    }

    #[test]
    fn deref_is_idempotent_within_a_run() {
        let defs = table(json!({
            "a": {"$ref": "#/definitions/b"},
            "b": {"type": "number"},
        }));
        let resolver = Resolver::new(&defs);
        let start = node(json!({"$ref": "#/definitions/a"}));
        let (first, _) = resolver.deref(&start, &SeenRefs::default());
        let (second, _) = resolver.deref(&start, &SeenRefs::default());
        assert_eq!(first, second);
    }

    #[test]
    fn extending_seen_does_not_mutate_the_original() {
        let seen = SeenRefs::default();
        let extended = seen.with("#/definitions/a");
        assert!(!seen.contains("#/definitions/a"));
        assert!(extended.contains("#/definitions/a"));
    }
}
