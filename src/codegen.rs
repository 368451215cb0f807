//! Nix option-module rendering.
//!
//! Pure text assembly over the type-expression IR. The full module is built
//! in memory; nothing here touches the filesystem.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::expr::{Literal, OptionDecl, TypeExpr};
use crate::resolve::{Resolver, SeenRefs};
use crate::schema::SchemaDocument;
use crate::synth;

/// Keys matching this render bare; everything else gets quoted.
static BARE_IDENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_']*$").unwrap());

const HEADER: &str = "# Generated from the upstream config schema. DO NOT EDIT.";

/// Quote and escape a string for Nix source.
pub fn nix_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Attribute keys render bare when they are valid identifiers.
pub fn nix_attr(key: &str) -> String {
    if BARE_IDENT.is_match(key) {
        key.to_string()
    } else {
        nix_string(key)
    }
}

/// Literal encoding for `t.enum` members.
pub fn nix_literal(literal: &Literal) -> String {
    match literal {
        Literal::Null => "null".to_string(),
        Literal::Bool(true) => "true".to_string(),
        Literal::Bool(false) => "false".to_string(),
        Literal::Int(value) => value.to_string(),
        Literal::Float(value) if value.is_finite() => value.to_string(),
        Literal::Float(_) => "null".to_string(),
        Literal::Str(value) => nix_string(value),
        Literal::List(items) => {
            let inner = items.iter().map(nix_literal).collect::<Vec<_>>().join(" ");
            format!("[ {inner} ]")
        }
    }
}

/// Render a type expression at the given ambient indent. Only submodules
/// span lines; everything else is a single `t.*` application.
pub fn render_type(expr: &TypeExpr, indent: &str) -> String {
    match expr {
        TypeExpr::Str => "t.str".to_string(),
        TypeExpr::Number => "t.number".to_string(),
        TypeExpr::Int => "t.int".to_string(),
        TypeExpr::Bool => "t.bool".to_string(),
        TypeExpr::Anything => "t.anything".to_string(),
        TypeExpr::Attrs => "t.attrs".to_string(),
        TypeExpr::ListOf(item) => format!("t.listOf ({})", render_type(item, indent)),
        TypeExpr::AttrsOf(value) => format!("t.attrsOf ({})", render_type(value, indent)),
        TypeExpr::NullOr(inner) => format!("t.nullOr ({})", render_type(inner, indent)),
        TypeExpr::Enum(values) => {
            let inner = values.iter().map(nix_literal).collect::<Vec<_>>().join(" ");
            format!("t.enum [ {inner} ]")
        }
        TypeExpr::OneOf(arms) => {
            let inner = arms
                .iter()
                .map(|arm| render_type(arm, indent))
                .collect::<Vec<_>>()
                .join(" ");
            format!("t.oneOf [ {inner} ]")
        }
        TypeExpr::Submodule(options) => {
            let next_indent = format!("{indent}  ");
            let inner = options
                .iter()
                .map(|option| render_option(option, &next_indent))
                .collect::<Vec<_>>()
                .join("\n");
            format!("t.submodule {{ options = {{\n{inner}\n{indent}}}; }}")
        }
    }
}

/// One `lib.mkOption` block at the given indent: type, then description when
/// the schema carried one. The computed `required` flag stays unrendered.
pub fn render_option(option: &OptionDecl, indent: &str) -> String {
    let type_expr = render_type(&option.ty, indent);
    let mut lines = vec![
        format!("{indent}{} = lib.mkOption {{", nix_attr(&option.key)),
        format!("{indent}  type = {type_expr};"),
    ];
    if let Some(description) = &option.description {
        lines.push(format!("{indent}  description = {};", nix_string(description)));
    }
    lines.push(format!("{indent}}};"));
    lines.join("\n")
}

/// Assemble the complete generated module: one option per top-level property
/// in lexicographic order, blank-line separated, inside the fixed wrapper.
pub fn generate_module(document: &SchemaDocument) -> String {
    let resolver = Resolver::new(document.definitions());
    let (root, seen) = resolver.deref(&document.root, &SeenRefs::default());

    let body = synth::options_for_object(&resolver, root, &seen)
        .iter()
        .map(|option| render_option(option, "  "))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{HEADER}\n{{ lib }}:\nlet\n  t = lib.types;\nin\n{{\n{body}\n}}\n")
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_keys_quote_only_when_needed() {
        assert_eq!(nix_attr("fooBar"), "fooBar");
        assert_eq!(nix_attr("_private"), "_private");
        assert_eq!(nix_attr("foo'"), "foo'");
        assert_eq!(nix_attr("foo-bar"), "\"foo-bar\"");
        assert_eq!(nix_attr("0start"), "\"0start\"");
        assert_eq!(nix_attr(""), "\"\"");
    }

    #[test]
    fn strings_escape_backslashes_and_quotes() {
        assert_eq!(nix_string(r#"a "b" c\d"#), r#""a \"b\" c\\d""#);
    }

    #[test]
    fn literal_encoding() {
        assert_eq!(nix_literal(&Literal::Null), "null");
        assert_eq!(nix_literal(&Literal::Bool(true)), "true");
        assert_eq!(nix_literal(&Literal::Bool(false)), "false");
        assert_eq!(nix_literal(&Literal::Int(42)), "42");
        assert_eq!(nix_literal(&Literal::Float(4.5)), "4.5");
        assert_eq!(nix_literal(&Literal::Float(f64::NAN)), "null");
        assert_eq!(nix_literal(&Literal::Float(f64::INFINITY)), "null");
        assert_eq!(nix_literal(&Literal::Str("x".into())), "\"x\"");
        assert_eq!(
            nix_literal(&Literal::List(vec![Literal::Int(1), Literal::Str("a".into())])),
            "[ 1 \"a\" ]"
        );
        assert_eq!(nix_literal(&Literal::List(Vec::new())), "[  ]");
    }

    #[test]
    fn simple_types_render_flat() {
        assert_eq!(render_type(&TypeExpr::Str, ""), "t.str");
        assert_eq!(
            render_type(&TypeExpr::NullOr(Box::new(TypeExpr::Str)), ""),
            "t.nullOr (t.str)"
        );
        assert_eq!(
            render_type(&TypeExpr::ListOf(Box::new(TypeExpr::Anything)), ""),
            "t.listOf (t.anything)"
        );
        assert_eq!(
            render_type(
                &TypeExpr::OneOf(vec![TypeExpr::Str, TypeExpr::Int]),
                ""
            ),
            "t.oneOf [ t.str t.int ]"
        );
        assert_eq!(
            render_type(&TypeExpr::Enum(vec![Literal::Int(1), Literal::Int(2)]), ""),
            "t.enum [ 1 2 ]"
        );
    }

    #[test]
    fn option_renders_type_then_description() {
        let option = OptionDecl {
            key: "port".into(),
            ty: TypeExpr::Int,
            description: Some("Listen port".into()),
            required: true,
        };
        assert_eq!(
            render_option(&option, "  "),
            "  port = lib.mkOption {\n    type = t.int;\n    description = \"Listen port\";\n  };"
        );
    }

    #[test]
    fn option_without_description_omits_the_field() {
        let option = OptionDecl {
            key: "foo-bar".into(),
            ty: TypeExpr::Bool,
            description: None,
            required: false,
        };
        assert_eq!(
            render_option(&option, "  "),
            "  \"foo-bar\" = lib.mkOption {\n    type = t.bool;\n  };"
        );
    }

    #[test]
    fn submodules_nest_with_two_space_steps() {
        let expr = TypeExpr::Submodule(vec![OptionDecl {
            key: "inner".into(),
            ty: TypeExpr::Str,
            description: None,
            required: false,
        }]);
        assert_eq!(
            render_type(&expr, "  "),
            "t.submodule { options = {\n    inner = lib.mkOption {\n      type = t.str;\n    };\n  }; }"
        );
    }
}
