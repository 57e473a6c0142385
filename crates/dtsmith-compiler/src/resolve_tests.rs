use dtsmith_core::{DeclKind, Declaration, ModuleDecl, Type};
use indoc::indoc;

use crate::diagnostics::Diagnostics;
use crate::{Error, lang, resolve};

fn resolve_source(source: &str) -> (ModuleDecl, Diagnostics) {
    let tree = lang::parse(source);
    resolve::resolve(source, &tree, "mod").expect("source resolves")
}

fn resolve_err(source: &str) -> Error {
    let tree = lang::parse(source);
    resolve::resolve(source, &tree, "mod").expect_err("source must not resolve")
}

fn item<'m>(module: &'m ModuleDecl, name: &str) -> &'m Declaration {
    module
        .items
        .get(name)
        .unwrap_or_else(|| panic!("member `{name}` missing"))
}

#[test]
fn documented_function_gets_a_typed_signature() {
    let (module, diagnostics) = resolve_source(indoc! {r#"
        /**
         * Adds two numbers.
         * @param {number} a the left operand
         * @param {number} b the right operand
         * @return {number} the sum
         */
        function add(a, b) {
            return a + b;
        }
    "#});
    assert!(diagnostics.is_empty());

    let add = item(&module, "add");
    assert_eq!(add.description, "Adds two numbers.");
    assert!(add.errors.is_empty());
    let DeclKind::Function(func) = &add.kind else {
        panic!("expected a function, got {:?}", add.kind);
    };
    assert_eq!(func.params.len(), 2);
    assert_eq!(func.params[0].name, "a");
    assert_eq!(func.params[0].types, vec![Type::new("number")]);
    assert_eq!(func.params[0].description, "the left operand");
    assert_eq!(func.result, vec![Type::new("number")]);
}

#[test]
fn undocumented_parameter_falls_back_to_any_with_a_note() {
    let (module, _) = resolve_source("exports.hello = function (name) {};");

    let hello = item(&module, "hello");
    assert!(hello.exported);
    let DeclKind::Function(func) = &hello.kind else {
        panic!("expected a function");
    };
    assert_eq!(func.params[0].types, vec![Type::any()]);
    // No return statement: void, and no note about the return.
    assert!(func.result.is_empty());
    assert_eq!(hello.errors.len(), 1);
    assert_eq!(
        hello.errors[0].message,
        "Parameter \"name\" has no documented type"
    );
}

#[test]
fn undocumented_value_return_falls_back_to_any_with_a_note() {
    let (module, _) = resolve_source("exports.make = function () { return 1; };");
    let make = item(&module, "make");
    let DeclKind::Function(func) = &make.kind else {
        panic!("expected a function");
    };
    assert_eq!(func.result, vec![Type::any()]);
    assert_eq!(make.errors[0].message, "Return type is not documented");
}

#[test]
fn return_scan_skips_nested_functions() {
    let (module, _) = resolve_source(indoc! {r#"
        exports.run = function () {
            var inner = function () { return 1; };
            inner();
        };
    "#});
    let run = item(&module, "run");
    let DeclKind::Function(func) = &run.kind else {
        panic!("expected a function");
    };
    assert!(func.result.is_empty());
}

#[test]
fn exporting_a_local_function_reuses_its_declaration() {
    let (module, _) = resolve_source(indoc! {r#"
        /**
         * Greets.
         * @param {string} name who to greet
         */
        function hello(name) {}
        exports.hello = hello;
    "#});
    assert_eq!(module.items.len(), 1);

    let hello = item(&module, "hello");
    assert!(hello.exported);
    assert_eq!(hello.description, "Greets.");
    assert!(matches!(hello.kind, DeclKind::Function(_)));
}

#[test]
fn prototype_assignment_promotes_a_function_to_a_class() {
    let (module, _) = resolve_source(indoc! {r#"
        /**
         * A widget.
         * @param {number} width
         */
        function Widget(width) {}

        /**
         * Opens the widget.
         * @param {string} how
         */
        Widget.prototype.open = function (how) {};

        module.exports = Widget;
    "#});

    // The local was inlined into the exports slot and dropped.
    assert!(module.items.is_empty());
    let slot = module.exports.as_ref().expect("exports slot set");
    assert!(slot.exported);
    assert_eq!(slot.description, "A widget.");
    let DeclKind::Class { ctor, members } = &slot.kind else {
        panic!("expected a class, got {:?}", slot.kind);
    };
    let ctor = ctor.as_ref().expect("constructor kept");
    assert_eq!(ctor.params[0].name, "width");
    assert_eq!(ctor.params[0].types, vec![Type::new("number")]);

    let open = &members["open"];
    assert_eq!(open.description, "Opens the widget.");
    let DeclKind::Function(func) = &open.kind else {
        panic!("expected a method");
    };
    assert_eq!(func.params[0].types, vec![Type::new("string")]);
}

#[test]
fn whole_prototype_object_populates_class_members() {
    let (module, _) = resolve_source(indoc! {r#"
        function Widget() {}
        Widget.prototype = {
            size: 3,
            close: function () {}
        };
        module.exports = Widget;
    "#});
    let slot = module.exports.as_ref().expect("exports slot set");
    let DeclKind::Class { members, .. } = &slot.kind else {
        panic!("expected a class");
    };
    assert_eq!(
        members.keys().collect::<Vec<_>>(),
        vec!["size", "close"]
    );
    assert!(matches!(members["size"].kind, DeclKind::Constant { .. }));
    assert!(matches!(members["close"].kind, DeclKind::Function(_)));
}

#[test]
fn object_literal_export_keeps_member_order() {
    let (module, _) = resolve_source(indoc! {r#"
        module.exports = {
            color: 'black',
            width: 10,
            open: function () { return true; }
        };
    "#});
    let slot = module.exports.as_ref().expect("exports slot set");
    let DeclKind::Object { members } = &slot.kind else {
        panic!("expected an object, got {:?}", slot.kind);
    };
    assert_eq!(
        members.keys().collect::<Vec<_>>(),
        vec!["color", "width", "open"]
    );
    assert_eq!(
        members["color"].kind,
        DeclKind::Constant {
            value: "'black'".to_string(),
            types: vec![Type::new("string")],
        }
    );
    assert_eq!(
        members["width"].kind,
        DeclKind::Constant {
            value: "10".to_string(),
            types: vec![Type::new("number")],
        }
    );
}

#[test]
fn last_exports_assignment_wins() {
    let (module, _) = resolve_source(indoc! {r#"
        module.exports = { color: 'black' };
        module.exports = function () {};
    "#});
    let slot = module.exports.as_ref().expect("exports slot set");
    assert!(matches!(slot.kind, DeclKind::Function(_)));
}

#[test]
fn header_typedef_joins_the_recognized_type_set() {
    let (module, _) = resolve_source(indoc! {r#"
        /**
         * @typedef {string|number} Identifier
         */

        /**
         * @param {Identifier} id which record to fetch
         */
        exports.fetch = function (id) {};
    "#});

    let typedef = item(&module, "Identifier");
    assert!(typedef.exported);
    assert_eq!(
        typedef.kind,
        DeclKind::TypeDef {
            types: vec![Type::new("string"), Type::new("number")],
        }
    );

    // The documented type resolves against the typedef, so no downgrade.
    let fetch = item(&module, "fetch");
    assert!(fetch.errors.is_empty());
    let DeclKind::Function(func) = &fetch.kind else {
        panic!("expected a function");
    };
    assert_eq!(func.params[0].types, vec![Type::new("Identifier")]);
}

#[test]
fn unknown_type_downgrades_to_any_with_a_note() {
    let (module, _) = resolve_source(indoc! {r#"
        /**
         * @param {Sprocket} x the sprocket
         */
        exports.run = function (x) {};
    "#});
    let run = item(&module, "run");
    let DeclKind::Function(func) = &run.kind else {
        panic!("expected a function");
    };
    assert_eq!(func.params[0].types, vec![Type::any()]);
    assert_eq!(run.errors.len(), 1);
    assert_eq!(
        run.errors[0].message,
        "Parameter \"x\" type \"Sprocket\" was not found"
    );
}

#[test]
fn namespaced_types_are_trusted_without_lookup() {
    let (module, _) = resolve_source(indoc! {r#"
        /**
         * @param {external:String} s
         */
        exports.keep = function (s) {};
    "#});
    let keep = item(&module, "keep");
    assert!(keep.errors.is_empty());
    let DeclKind::Function(func) = &keep.kind else {
        panic!("expected a function");
    };
    assert_eq!(
        func.params[0].types,
        vec![Type::namespaced("external", "String")]
    );
}

#[test]
fn require_binding_resolves_through_an_alias_export() {
    let (module, _) = resolve_source(indoc! {r#"
        var fs = require('fs');
        exports.fs = fs;
    "#});
    assert_eq!(module.items.len(), 1);
    let fs = item(&module, "fs");
    assert!(fs.exported);
    assert_eq!(
        fs.kind,
        DeclKind::Import {
            module_path: "fs".to_string(),
            source_name: "fs".to_string(),
        }
    );
}

#[test]
fn dangling_alias_degrades_to_a_placeholder() {
    let (module, _) = resolve_source("exports.missing = nowhere;");
    let missing = item(&module, "missing");
    assert!(missing.exported);
    assert!(matches!(missing.kind, DeclKind::Constant { .. }));
    assert_eq!(
        missing.errors[0].message,
        "Alias target \"nowhere\" could not be resolved"
    );
}

#[test]
fn several_exports_can_alias_one_local() {
    let (module, diagnostics) = resolve_source(indoc! {r#"
        /**
         * @param {string} name
         */
        function hello(name) {}
        exports.a = hello;
        exports.b = hello;
    "#});
    assert!(diagnostics.is_empty());
    assert!(!module.items.contains_key("hello"));
    for name in ["a", "b"] {
        let decl = item(&module, name);
        assert!(decl.exported);
        assert!(decl.errors.is_empty(), "{name} must resolve cleanly");
        let DeclKind::Function(func) = &decl.kind else {
            panic!("expected `{name}` to inline the function");
        };
        assert_eq!(func.params[0].types, vec![Type::new("string")]);
    }
}

#[test]
fn es_module_statements_register_exports() {
    let (module, _) = resolve_source(indoc! {r#"
        /**
         * @param {string} name
         */
        export function greet(name) {}
        export default greet;
        export { greet as hail };
        export { readFile as read } from 'fs';
        export * from './util';
    "#});

    assert!(item(&module, "greet").exported);
    // Both aliases inlined to the function they point at.
    assert!(matches!(
        item(&module, "default").kind,
        DeclKind::Function(_)
    ));
    assert!(matches!(item(&module, "hail").kind, DeclKind::Function(_)));
    assert_eq!(
        item(&module, "read").kind,
        DeclKind::Import {
            module_path: "fs".to_string(),
            source_name: "readFile".to_string(),
        }
    );
    assert_eq!(
        item(&module, "*").kind,
        DeclKind::Import {
            module_path: "./util".to_string(),
            source_name: "*".to_string(),
        }
    );
}

#[test]
fn import_statement_registers_local_bindings() {
    let (module, _) = resolve_source(indoc! {r#"
        import dflt from 'a';
        import { one, two as deux } from 'b';
        import * as ns from 'c';
    "#});
    assert!(!item(&module, "dflt").exported);
    assert_eq!(
        item(&module, "dflt").kind,
        DeclKind::Import {
            module_path: "a".to_string(),
            source_name: "default".to_string(),
        }
    );
    assert_eq!(
        item(&module, "deux").kind,
        DeclKind::Import {
            module_path: "b".to_string(),
            source_name: "two".to_string(),
        }
    );
    assert_eq!(
        item(&module, "ns").kind,
        DeclKind::Import {
            module_path: "c".to_string(),
            source_name: "*".to_string(),
        }
    );
}

#[test]
fn directives_and_odd_assignments_become_notices() {
    let (module, diagnostics) = resolve_source(indoc! {r#"
        'use strict';
        window.foo = 1;
    "#});
    assert!(module.items.is_empty());
    assert_eq!(diagnostics.len(), 1);
    let notice = diagnostics.iter().next().unwrap();
    assert!(notice.text.contains("window.foo"), "got: {}", notice.text);
}

#[test]
fn unhandled_statement_kind_is_fatal_with_a_path() {
    let err = resolve_err("with (x) {}\n");
    match err {
        Error::UnhandledNodeKind { kind, path } => {
            assert_eq!(kind, "with_statement");
            assert_eq!(path, "with_statement");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn uninferable_export_value_is_fatal_with_the_full_path() {
    let err = resolve_err("exports.x = compute();\n");
    match err {
        Error::UnhandledNodeKind { kind, path } => {
            assert_eq!(kind, "call_expression");
            assert_eq!(
                path,
                "expression_statement > assignment_expression > call_expression"
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unsupported_type_grammar_is_fatal() {
    let err = resolve_err(indoc! {r#"
        /**
         * @param {function(string): number} f
         */
        exports.apply = function (f) {};
    "#});
    match err {
        Error::UnsupportedTypeGrammar { tag } => assert_eq!(tag, "FunctionType"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn doc_comment_must_sit_directly_above_its_statement() {
    let (module, _) = resolve_source(indoc! {r#"
        /**
         * Orphaned text.
         */

        function fly() {}
    "#});
    assert_eq!(item(&module, "fly").description, "");
}
