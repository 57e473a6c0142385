//! dtsmith compiler: JavaScript source in, declaration-file text out.
//!
//! Pipeline stages:
//! - `lang` - tree-sitter parsing (external grammar, consumed as a black box)
//! - `dispatch` - node-kind dispatch with path-stack diagnostics
//! - `jsdoc` - documentation-comment grammar (lexer, tags, type expressions)
//! - `adapter` - doc type expressions to declaration-model types
//! - `resolve` - export resolution engine
//! - `emit` - declaration-file rendering
//! - `generator` - high-level facade tying the stages together

pub mod adapter;
pub mod diagnostics;
pub mod dispatch;
pub mod emit;
pub mod generator;
pub mod jsdoc;
pub mod lang;
pub mod resolve;

#[cfg(test)]
mod emit_tests;
#[cfg(test)]
mod resolve_tests;

pub use diagnostics::{Diagnostics, Message, Severity};
pub use emit::Emitter;
pub use generator::{Config, Generated, Generator};

/// Result type for resolution passes that produce both output and
/// pass-level diagnostics. Fatal errors use the outer `Result`.
pub type PassResult<T> = std::result::Result<(T, Diagnostics), Error>;

/// Fatal errors: the source contains a shape the pipeline has no handler
/// for. There is no partial-file recovery; everything non-fatal travels as
/// a [`Diagnostics`] entry or a per-declaration note instead.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// A syntax-tree node kind with no registered handler. `path` is the
    /// ancestor-kind trail taken to reach the node.
    #[error("unhandled node kind `{kind}` at {path}")]
    UnhandledNodeKind { kind: String, path: String },

    /// A documentation type-expression production the adapter does not
    /// expand. `tag` names the offending production.
    #[error("unsupported type grammar production `{tag}`")]
    UnsupportedTypeGrammar { tag: String },
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
