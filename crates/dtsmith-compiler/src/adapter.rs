//! Type grammar adapter: documentation type expressions to model types.
//!
//! Produces the flat `Vec<Type>` the declaration model stores. Unions
//! concatenate (order preserved, duplicates allowed; the emitter joins them
//! as an alternation), `ns:Name` splits into namespace and name, and a small
//! alias table rewrites documented shorthands to concrete equivalents.
//!
//! Everything else (function types, wrapper types) is a hard failure naming
//! the production: a silently guessed fallback would defeat the point of the
//! tool, so callers get `UnsupportedTypeGrammar` instead.

use dtsmith_core::Type;

use crate::jsdoc::TypeExpr;
use crate::{Error, Result};

/// Expand one documentation type expression into model types.
pub fn expand(expr: &TypeExpr) -> Result<Vec<Type>> {
    match expr {
        TypeExpr::All => Ok(vec![Type::any()]),
        TypeExpr::Name(name) => Ok(vec![name_to_type(name)]),
        TypeExpr::Union(members) => {
            let mut types = Vec::with_capacity(members.len());
            for member in members {
                types.extend(expand(member)?);
            }
            Ok(types)
        }
        TypeExpr::Application { name, args } => {
            let root = name_to_type(name);
            let mut parameters = Vec::with_capacity(args.len());
            for arg in args {
                parameters.extend(expand(arg)?);
            }
            Ok(vec![Type {
                parameters,
                ..root
            }])
        }
        TypeExpr::Nullable(_)
        | TypeExpr::NonNullable(_)
        | TypeExpr::Optional(_)
        | TypeExpr::Rest(_)
        | TypeExpr::Function { .. } => Err(Error::UnsupportedTypeGrammar {
            tag: expr.production().to_string(),
        }),
    }
}

/// Split an optional `ns:` prefix and apply the alias table.
fn name_to_type(name: &str) -> Type {
    if let Some((namespace, bare)) = name.split_once(':') {
        return Type::namespaced(namespace, bare);
    }
    match name {
        // Documented shorthands with concrete equivalents.
        "array" => Type::with_parameters("Array", vec![Type::any()]),
        "function" => Type::new("Function"),
        "bool" => Type::new("boolean"),
        "int" | "integer" | "float" | "double" => Type::new("number"),
        _ => Type::new(name),
    }
}

#[cfg(test)]
mod adapter_tests {
    use super::*;
    use crate::jsdoc::parse_type_expr;

    fn expand_text(text: &str) -> Result<Vec<Type>> {
        expand(&parse_type_expr(text).expect("type text parses"))
    }

    #[test]
    fn names_pass_through() {
        assert_eq!(expand_text("string").unwrap(), vec![Type::new("string")]);
    }

    #[test]
    fn namespaced_names_split() {
        assert_eq!(
            expand_text("external:String").unwrap(),
            vec![Type::namespaced("external", "String")]
        );
    }

    #[test]
    fn unions_concatenate_in_order() {
        assert_eq!(
            expand_text("string|number|string").unwrap(),
            vec![
                Type::new("string"),
                Type::new("number"),
                Type::new("string"),
            ]
        );
    }

    #[test]
    fn applications_keep_their_parameters() {
        assert_eq!(
            expand_text("Array.<string>").unwrap(),
            vec![Type::with_parameters("Array", vec![Type::new("string")])]
        );
    }

    #[test]
    fn union_inside_application_flattens_into_parameters() {
        assert_eq!(
            expand_text("Array.<(string|number)>").unwrap(),
            vec![Type::with_parameters(
                "Array",
                vec![Type::new("string"), Type::new("number")]
            )]
        );
    }

    #[test]
    fn aliases_rewrite_to_concrete_types() {
        assert_eq!(
            expand_text("array").unwrap(),
            vec![Type::with_parameters("Array", vec![Type::any()])]
        );
        assert_eq!(expand_text("function").unwrap(), vec![Type::new("Function")]);
        assert_eq!(expand_text("bool").unwrap(), vec![Type::new("boolean")]);
        assert_eq!(expand_text("*").unwrap(), vec![Type::any()]);
    }

    #[test]
    fn unsupported_productions_fail_with_their_tag() {
        for (text, tag) in [
            ("function(string): number", "FunctionType"),
            ("?string", "NullableType"),
            ("!Object", "NonNullableType"),
            ("number=", "OptionalType"),
            ("...string", "RestType"),
        ] {
            match expand_text(text) {
                Err(Error::UnsupportedTypeGrammar { tag: t }) => assert_eq!(t, tag),
                other => panic!("expected UnsupportedTypeGrammar for {text}, got {other:?}"),
            }
        }
    }
}
