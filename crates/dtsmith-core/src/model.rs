//! The declaration model: everything the resolver can infer about a module.
//!
//! A [`ModuleDecl`] owns an insertion-ordered map of named members, each a
//! [`Declaration`]. The member map is the single source of emission order, so
//! output is deterministic for a given source. Declarations form a tree (class
//! and object members nest); no declaration is shared between modules.

use indexmap::IndexMap;
use serde::Serialize;

/// Reserved member name for `export default` / `module.exports`.
pub const DEFAULT_EXPORT_NAME: &str = "default";

/// Reserved member name for `export * from "..."`.
pub const WILDCARD_EXPORT_NAME: &str = "*";

/// Type names accepted without a local `@typedef` declaration.
pub const BUILTIN_TYPES: &[&str] = &[
    "any", "void", "never", "unknown", "string", "number", "boolean", "symbol", "object", "null",
    "undefined", "String", "Number", "Boolean", "Symbol", "Object", "Array", "Function", "Date",
    "RegExp", "Promise", "Error", "Map", "Set", "Buffer",
];

/// A named type, optionally namespaced and optionally generic.
///
/// Unresolved types are normalized to `{ namespace: None, name: "any" }`
/// during validation; `name` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Type {
    pub namespace: Option<String>,
    pub name: String,
    pub parameters: Vec<Type>,
}

impl Type {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameters(name: impl Into<String>, parameters: Vec<Type>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
            parameters,
        }
    }

    /// The universal fallback type.
    pub fn any() -> Self {
        Self::new("any")
    }

    pub fn is_any(&self) -> bool {
        self.namespace.is_none() && self.name == "any"
    }

    /// Downgrade this type to `any` in place, dropping namespace and
    /// generic parameters.
    pub fn downgrade(&mut self) {
        self.namespace = None;
        self.name = "any".to_string();
        self.parameters.clear();
    }

    /// Namespace-qualified name without generic parameters.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}:{}", ns, self.name),
            None => self.name.clone(),
        }
    }
}

/// A function argument: its documented types and description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    pub types: Vec<Type>,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            types: Vec::new(),
        }
    }
}

/// A non-fatal note attached to the declaration it concerns.
///
/// Purely informational: validation records one for every type it had to
/// downgrade, every undocumented parameter or return, and every alias it
/// could not resolve. The emitter renders them as trailing comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub message: String,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Signature of an inferred function: parameters and result types.
///
/// An empty `result` means the body never returns a value and renders
/// as `void`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct FunctionDecl {
    pub params: Vec<Parameter>,
    pub result: Vec<Type>,
}

/// The closed set of member shapes the resolver can infer.
///
/// Promotion (a `Function` becoming a `Class` once a prototype assignment is
/// seen) is a slot overwrite in the owning map, never a graph rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum DeclKind {
    /// A member whose type comes from documentation.
    Variable { types: Vec<Type> },
    /// A member bound to a literal; `value` keeps the raw source text.
    Constant { value: String, types: Vec<Type> },
    /// A binding to another module, by literal path.
    Import {
        module_path: String,
        /// Name under which the source module exports the binding.
        /// Equals the local name for plain `require` imports.
        source_name: String,
    },
    Function(FunctionDecl),
    Class {
        ctor: Option<FunctionDecl>,
        members: IndexMap<String, Declaration>,
    },
    Object {
        members: IndexMap<String, Declaration>,
    },
    /// An alias pointing at another local member by name.
    Identifier { target: String },
    /// A `@typedef` alias.
    TypeDef { types: Vec<Type> },
}

/// One typed member of a module's surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub kind: DeclKind,
    pub exported: bool,
    pub description: String,
    pub errors: Vec<Diagnostic>,
}

impl Declaration {
    pub fn new(kind: DeclKind) -> Self {
        Self {
            kind,
            exported: false,
            description: String::new(),
            errors: Vec::new(),
        }
    }

    pub fn exported(mut self) -> Self {
        self.exported = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn note(&mut self, message: impl Into<String>) {
        self.errors.push(Diagnostic::new(message));
    }
}

/// The root container: one per source unit.
///
/// `items` preserves insertion order, which is source order, which is
/// emission order. `exports` is the whole-module replacement slot
/// (`module.exports = ...`); when set it wins over per-member exports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleDecl {
    pub name: String,
    pub items: IndexMap<String, Declaration>,
    pub exports: Option<Declaration>,
}

impl ModuleDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: IndexMap::new(),
            exports: None,
        }
    }

    /// Register or overwrite a member under `name`. Last write wins.
    pub fn insert(&mut self, name: impl Into<String>, decl: Declaration) {
        self.items.insert(name.into(), decl);
    }

    /// Members flagged `exported`, in insertion order.
    pub fn exported_items(&self) -> impl Iterator<Item = (&String, &Declaration)> {
        self.items.iter().filter(|(_, d)| d.exported)
    }

    pub fn has_exports(&self) -> bool {
        self.exports.is_some() || self.items.values().any(|d| d.exported)
    }
}
