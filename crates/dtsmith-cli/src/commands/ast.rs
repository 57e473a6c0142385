//! Show the syntax tree of a source file.
//!
//! Useful when `generate` fails with an unhandled node kind: the printed
//! tree shows exactly which construct has no handler.

use std::path::PathBuf;

use dtsmith_compiler::lang;

use crate::util::load_source;

pub struct AstArgs {
    pub source_file: PathBuf,
}

pub fn run(args: AstArgs) {
    let source = load_source(&args.source_file);
    let tree = lang::parse(&source);
    println!("{}", render(tree.root_node(), &source));
}

/// One node per line, indented by depth, field names and text for leaves.
fn render(root: arborium_tree_sitter::Node, source: &str) -> String {
    let mut out = String::new();
    walk(root, source, 0, None, &mut out);
    out.trim_end().to_string()
}

fn walk(
    node: arborium_tree_sitter::Node,
    source: &str,
    depth: usize,
    field: Option<&str>,
    out: &mut String,
) {
    if !node.is_named() {
        return;
    }
    out.push_str(&"  ".repeat(depth));
    if let Some(field) = field {
        out.push_str(field);
        out.push_str(": ");
    }
    out.push_str(node.kind());
    if node.named_child_count() == 0 {
        let text = lang::node_text(node, source);
        if text.len() <= 40 && !text.contains('\n') {
            out.push_str(&format!(" {text:?}"));
        }
    }
    out.push('\n');

    let mut cursor = node.walk();
    if cursor.goto_first_child() {
        loop {
            walk(
                cursor.node(),
                source,
                depth + 1,
                cursor.field_name(),
                out,
            );
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod ast_tests {
    use super::*;
    use dtsmith_compiler::lang;

    #[test]
    fn renders_an_indented_kind_tree() {
        let source = "var x = 1;";
        let tree = lang::parse(source);
        let out = render(tree.root_node(), source);
        assert!(out.starts_with("program"));
        assert!(out.contains("variable_declarator"));
        assert!(out.contains("value: number \"1\""));
    }
}
