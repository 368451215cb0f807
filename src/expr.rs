// Strongly-typed output IR for codegen. No serde_json::Value past this point.

/// A Nix `lib.types` expression, built bottom-up once per run and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Str,
    Number,
    Int,
    Bool,
    Anything,
    ListOf(Box<TypeExpr>),
    /// Open, untyped attribute set.
    Attrs,
    /// Open attribute set with one fixed value type.
    AttrsOf(Box<TypeExpr>),
    Enum(Vec<Literal>),
    OneOf(Vec<TypeExpr>),
    NullOr(Box<TypeExpr>),
    /// Nested record of named options; sorted order for deterministic codegen.
    Submodule(Vec<OptionDecl>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionDecl {
    pub key: String,
    pub ty: TypeExpr,
    pub description: Option<String>,
    /// Listed under the parent's `required`. Computed for every option but
    /// not rendered; reserved until the module format grows a marker for it.
    pub required: bool,
}

/// Literal values carried by `enum`/`const`. No object shapes; those degrade
/// to `Null` during conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Literal>),
}

impl Literal {
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Literal::Null,
            Value::Bool(b) => Literal::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Literal::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Literal::Float(f)
                } else {
                    Literal::Null
                }
            }
            Value::String(s) => Literal::Str(s.clone()),
            Value::Array(items) => Literal::List(items.iter().map(Literal::from_json).collect()),
            Value::Object(_) => Literal::Null,
        }
    }
}
