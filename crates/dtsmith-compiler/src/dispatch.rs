//! Node-kind dispatch with path-stack diagnostics.
//!
//! Every syntax shape the resolver understands is declared exactly once, as
//! a match arm at a dispatch site. An unmatched kind is a hard failure that
//! carries the full ancestor-kind trail, so an unsupported idiom fails with
//! a debuggable location instead of silently producing a wrong declaration.
//!
//! The path stack is an explicit value threaded through the traversal (not
//! ambient state); it is scoped to one top-level statement and fully
//! unwound on every exit, including failure.

use arborium_tree_sitter::Node;

use crate::{Error, Result};

/// Ancestor-kind trail for the traversal in progress.
#[derive(Debug, Default)]
pub struct NodePath {
    kinds: Vec<&'static str>,
}

impl NodePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Human-readable trail, outermost first.
    pub fn render(&self) -> String {
        self.kinds.join(" > ")
    }
}

/// Dispatch `node` to the handler selected inside `f`.
///
/// `f` inspects `node.kind()` and returns `None` for kinds it has no arm
/// for, which converts into [`Error::UnhandledNodeKind`] carrying the path
/// accumulated so far. The node's kind is pushed before `f` runs and popped
/// on every return path.
pub fn dispatch<T>(
    path: &mut NodePath,
    node: Node,
    f: impl FnOnce(&mut NodePath, Node) -> Option<Result<T>>,
) -> Result<T> {
    path.kinds.push(node.kind());
    let result = match f(path, node) {
        Some(result) => result,
        None => Err(Error::UnhandledNodeKind {
            kind: node.kind().to_string(),
            path: path.render(),
        }),
    };
    path.kinds.pop();
    result
}

#[cfg(test)]
mod dispatch_tests {
    use super::*;
    use crate::lang;

    #[test]
    fn routes_to_the_matching_arm() {
        let tree = lang::parse("var x = 1;");
        let stmt = tree.root_node().named_child(0).unwrap();
        let mut path = NodePath::new();
        let kind = dispatch(&mut path, stmt, |_, node| match node.kind() {
            "variable_declaration" => Some(Ok("var")),
            _ => None,
        })
        .unwrap();
        assert_eq!(kind, "var");
        assert!(path.is_empty());
    }

    #[test]
    fn unhandled_kind_fails_with_nonempty_path() {
        let tree = lang::parse("class C {}");
        let stmt = tree.root_node().named_child(0).unwrap();
        let mut path = NodePath::new();
        let err = dispatch(&mut path, stmt, |_, _| None::<Result<()>>).unwrap_err();
        match err {
            Error::UnhandledNodeKind { kind, path } => {
                assert_eq!(kind, "class_declaration");
                assert_eq!(path, "class_declaration");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(path.is_empty());
    }

    #[test]
    fn path_accumulates_across_nested_dispatches() {
        let tree = lang::parse("exports.x = 1;");
        let stmt = tree.root_node().named_child(0).unwrap();
        let mut path = NodePath::new();
        let err = dispatch(&mut path, stmt, |path, node| {
            let inner = node.named_child(0).unwrap();
            Some(dispatch(path, inner, |_, _| None::<Result<()>>))
        })
        .unwrap_err();
        match err {
            Error::UnhandledNodeKind { path, .. } => {
                assert_eq!(path, "expression_statement > assignment_expression");
            }
            other => panic!("unexpected error: {other}"),
        }
        // Fully unwound even though the inner dispatch failed.
        assert!(path.is_empty());
    }
}
