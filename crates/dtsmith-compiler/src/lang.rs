//! JavaScript parsing via tree-sitter.
//!
//! The grammar is an external collaborator: it hands us a concrete syntax
//! tree whose nodes expose a `kind()` discriminator, with comments kept as
//! ordinary (extra) nodes. Everything downstream works on that tree.

use arborium_tree_sitter as tree_sitter;

/// Parse one module's source text.
///
/// tree-sitter is total: malformed input yields `ERROR` nodes in the tree
/// rather than a parse failure, and those surface later as unhandled node
/// kinds with a precise path.
pub fn parse(source: &str) -> tree_sitter::Tree {
    let language: tree_sitter::Language = arborium_javascript::language().into();
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language)
        .expect("failed to set language");
    parser.parse(source, None).expect("failed to parse source")
}

/// Text of a node, sliced out of the original source.
pub fn node_text<'s>(node: tree_sitter::Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes())
        .expect("source is valid utf-8")
}
