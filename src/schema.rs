//! Input-side schema model.
//!
//! A deliberately small slice of draft-07: just the vocabulary the upstream
//! `toJSONSchema` export produces. Unknown keywords are ignored on parse and
//! unsupported shapes synthesize to `t.anything` downstream.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SchemaNode {
    #[serde(rename = "type")]
    pub ty: Option<TypeField>,
    pub properties: Option<IndexMap<String, SchemaNode>>,
    pub items: Option<Box<SchemaNode>>,
    #[serde(rename = "enum")]
    pub enum_: Option<Vec<Value>>,
    /// `const: null` is legal and distinct from an absent `const`, so a plain
    /// `Option<Value>` (which folds JSON null into `None`) is not enough.
    #[serde(rename = "const", deserialize_with = "present_value")]
    pub const_: Option<Value>,
    #[serde(rename = "anyOf")]
    pub any_of: Option<Vec<SchemaNode>>,
    #[serde(rename = "oneOf")]
    pub one_of: Option<Vec<SchemaNode>>,
    #[serde(rename = "allOf")]
    pub all_of: Option<Vec<SchemaNode>>,
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    #[serde(rename = "additionalProperties")]
    pub additional_properties: Option<AdditionalProperties>,
    pub description: Option<String>,
    pub required: Option<Vec<String>>,
}

/// `type` is either one scalar name or a set of them.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TypeField {
    One(String),
    Many(Vec<String>),
}

/// `additionalProperties` is either a boolean gate or a value schema.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Flag(bool),
    Schema(Box<SchemaNode>),
}

/// Root schema plus its local definitions table, immutable for one run.
#[derive(Clone, Debug, Deserialize)]
pub struct SchemaDocument {
    #[serde(flatten)]
    pub root: SchemaNode,
    #[serde(default)]
    pub definitions: IndexMap<String, SchemaNode>,
    #[serde(rename = "$defs", default)]
    pub defs: IndexMap<String, SchemaNode>,
}

// ————————————————————————————————————————————————————————————————————————————
// DISCRIMINATION
// ————————————————————————————————————————————————————————————————————————————

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarKind {
    Str,
    Number,
    Int,
    Bool,
}

/// Discriminated view of a (deref'd, normalized) node. The variant order is
/// the dispatch priority: const, enum, anyOf, oneOf, allOf, type unions,
/// scalars, arrays, objects, anything else.
#[derive(Debug)]
pub enum SchemaKind<'a> {
    Const(&'a Value),
    Enum(&'a [Value]),
    AnyOf(&'a [SchemaNode]),
    OneOf(&'a [SchemaNode]),
    AllOf,
    TypeUnion(&'a [String]),
    Scalar(ScalarKind),
    Array(Option<&'a SchemaNode>),
    Object(&'a SchemaNode),
    Unknown,
}

impl SchemaNode {
    /// Classify for base-type dispatch. Callers must pass a deref'd node;
    /// a leftover `$ref` lands in `Unknown`.
    pub fn kind(&self) -> SchemaKind<'_> {
        if let Some(value) = &self.const_ {
            return SchemaKind::Const(value);
        }
        if let Some(values) = &self.enum_ {
            return SchemaKind::Enum(values);
        }
        if let Some(branches) = &self.any_of {
            if !branches.is_empty() {
                return SchemaKind::AnyOf(branches);
            }
        }
        if let Some(branches) = &self.one_of {
            if !branches.is_empty() {
                return SchemaKind::OneOf(branches);
            }
        }
        if let Some(branches) = &self.all_of {
            if !branches.is_empty() {
                return SchemaKind::AllOf;
            }
        }
        match &self.ty {
            Some(TypeField::Many(entries)) if !entries.is_empty() => {
                SchemaKind::TypeUnion(entries)
            }
            Some(TypeField::Many(_)) => SchemaKind::Unknown,
            Some(TypeField::One(name)) => match name.as_str() {
                "string" => SchemaKind::Scalar(ScalarKind::Str),
                "number" => SchemaKind::Scalar(ScalarKind::Number),
                "integer" => SchemaKind::Scalar(ScalarKind::Int),
                "boolean" => SchemaKind::Scalar(ScalarKind::Bool),
                "array" => SchemaKind::Array(self.items.as_deref()),
                "object" => SchemaKind::Object(self),
                _ => SchemaKind::Unknown,
            },
            None => {
                if self.properties.is_some() || self.additional_properties.is_some() {
                    SchemaKind::Object(self)
                } else {
                    SchemaKind::Unknown
                }
            }
        }
    }
}

impl SchemaDocument {
    /// `definitions` wins over `$defs` when both are present.
    pub fn definitions(&self) -> &IndexMap<String, SchemaNode> {
        if !self.definitions.is_empty() {
            &self.definitions
        } else {
            &self.defs
        }
    }

    /// Parse a schema export, reporting the JSON path on failure.
    pub fn parse(src: &str) -> Result<Self, String> {
        let de = &mut serde_json::Deserializer::from_str(src);
        match serde_path_to_error::deserialize::<_, Self>(de) {
            Ok(document) => Ok(document),
            Err(err) => {
                let path = err.path().to_string();
                Err(format!("at JSON path {path}: {}", err.into_inner()))
            }
        }
    }
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
