use dtsmith_core::Colors;
use indoc::indoc;

use crate::{Emitter, lang, resolve};

fn emit_source(source: &str) -> String {
    let tree = lang::parse(source);
    let (module, _) = resolve::resolve(source, &tree, "mod").expect("source resolves");
    Emitter::new(&module).emit()
}

#[test]
fn documented_function_renders_with_its_doc_block() {
    let out = emit_source(indoc! {r#"
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
    assert_eq!(
        out,
        indoc! {r#"
            declare module "mod" {

              /**
               * Adds two numbers.
               * @param a the left operand
               * @param b the right operand
               */
              function add (a: number, b: number) : number;
            }
        "#}
    );
}

#[test]
fn function_without_a_return_renders_void() {
    let out = emit_source(indoc! {r#"
        /**
         * @param {string} name
         */
        exports.hello = function (name) {};
    "#});
    assert_eq!(
        out,
        indoc! {r#"
            declare module "mod" {

              function hello (name: string) : void;
            }
        "#}
    );
}

#[test]
fn whole_module_object_renders_as_an_export_assignment() {
    let out = emit_source("module.exports = { color: 'black' };");
    assert_eq!(
        out,
        indoc! {r#"
            declare module "mod" {

              var _exports: {
                color: string;
              };
              export = _exports;
            }
        "#}
    );
}

#[test]
fn promoted_class_renders_constructor_and_public_methods() {
    let out = emit_source(indoc! {r#"
        /**
         * A widget.
         * @param {number} width how wide
         */
        function Widget(width) {}

        /**
         * @param {string} how
         */
        Widget.prototype.open = function (how) {};

        module.exports = Widget;
    "#});
    assert_eq!(
        out,
        indoc! {r#"
            declare module "mod" {

              /**
               * A widget.
               * @param width how wide
               */
              class _exports {
                constructor (width: number);
                public open (how: string) : void;
              }
              export = _exports;
            }
        "#}
    );
}

#[test]
fn unresolved_type_renders_a_trailing_warning_comment() {
    let source = indoc! {r#"
        /**
         * @param {Sprocket} x
         */
        exports.run = function (x) {};
    "#};
    let out = emit_source(source);
    assert!(out.contains("function run (x: any) : void;"));
    assert!(out.contains("  // [warning] Parameter \"x\" type \"Sprocket\" was not found\n"));

    let tree = lang::parse(source);
    let (module, _) = resolve::resolve(source, &tree, "mod").unwrap();
    let quiet = Emitter::new(&module).warnings(false).emit();
    assert!(!quiet.contains("[warning]"));
}

#[test]
fn typedefs_and_generics_render_as_type_aliases() {
    let out = emit_source(indoc! {r#"
        /**
         * @typedef {string|number} Id
         */

        /**
         * @param {Array.<Id>} ids
         * @return {Id}
         */
        exports.first = function (ids) { return ids[0]; };
    "#});
    assert!(out.contains("type Id = string | number;\n"));
    assert!(out.contains("function first (ids: Array<Id>) : Id;\n"));
}

#[test]
fn typedefs_still_render_alongside_a_module_replacement() {
    let out = emit_source(indoc! {r#"
        /**
         * @typedef {number} Count
         */

        /**
         * @param {Count} n
         */
        module.exports = function (n) {};
    "#});
    assert!(out.contains("type Count = number;\n"));
    assert!(out.contains("function _exports (n: Count) : void;\n"));
    assert!(out.contains("export = _exports;\n"));
}

#[test]
fn re_exports_render_in_plain_and_rename_forms() {
    let out = emit_source(indoc! {r#"
        export { readFile as read } from 'fs';
        export * from './util';
    "#});
    assert!(out.contains("  export { readFile as read } from \"fs\";\n"));
    assert!(out.contains("  export * from \"./util\";\n"));
}

#[test]
fn multiple_types_join_as_an_alternation() {
    let out = emit_source(indoc! {r#"
        /**
         * @param {string|number} id
         */
        exports.get = function (id) {};
    "#});
    assert!(out.contains("function get (id: string | number) : void;"));
}

#[test]
fn namespaced_types_keep_their_qualifier() {
    let out = emit_source(indoc! {r#"
        /**
         * @param {external:String} s
         */
        exports.keep = function (s) {};
    "#});
    assert!(out.contains("function keep (s: external:String) : void;"));
}

#[test]
fn output_is_deterministic() {
    let source = indoc! {r#"
        function Widget() {}
        Widget.prototype.open = function () {};
        exports.Widget = Widget;
        exports.name = 'widget';
    "#};
    assert_eq!(emit_source(source), emit_source(source));
}

#[test]
fn exported_members_render_exactly_once_in_source_order() {
    let out = emit_source(indoc! {r#"
        exports.b = 'two';
        exports.a = 1;
    "#});
    assert_eq!(out.matches("var b:").count(), 1);
    assert_eq!(out.matches("var a:").count(), 1);
    let b = out.find("var b: string;").expect("b emitted");
    let a = out.find("var a: number;").expect("a emitted");
    assert!(b < a, "members must keep source order");
}

#[test]
fn colored_output_only_differs_by_escape_codes() {
    let source = "exports.x = 1;";
    let plain = emit_source(source);
    assert!(!plain.contains('\x1b'));

    let tree = lang::parse(source);
    let (module, _) = resolve::resolve(source, &tree, "mod").unwrap();
    let colored = Emitter::new(&module).colors(Colors::ON).emit();
    assert!(colored.contains("\x1b[34m"));

    let stripped = colored
        .replace("\x1b[34m", "")
        .replace("\x1b[32m", "")
        .replace("\x1b[33m", "")
        .replace("\x1b[2m", "")
        .replace("\x1b[0m", "");
    assert_eq!(stripped, plain);
}
