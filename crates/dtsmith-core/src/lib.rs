//! Core data structures for dtsmith.
//!
//! Two pieces:
//! - **Declaration model**: the closed set of member shapes a module
//!   interface can contain, plus the owning [`ModuleDecl`] container
//! - **Color palette**: ANSI codes shared by the emitter and the CLI

mod colors;
mod model;

#[cfg(test)]
mod model_tests;

pub use colors::Colors;
pub use model::{
    DeclKind, Declaration, Diagnostic, FunctionDecl, ModuleDecl, Parameter, Type, BUILTIN_TYPES,
    DEFAULT_EXPORT_NAME, WILDCARD_EXPORT_NAME,
};
