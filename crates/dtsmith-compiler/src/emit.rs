//! Declaration-file rendering.
//!
//! A pure function of the module tree: no mutation, and insertion order is
//! emission order, so identical trees render byte-identically (modulo the
//! color palette). Every declaration kind has an arm in a total match; a new
//! kind is a compile error here until it learns how to render itself.

use dtsmith_core::{Colors, DeclKind, Declaration, FunctionDecl, ModuleDecl, Parameter, Type};
use indexmap::IndexMap;

const INDENT: &str = "  ";

/// Name given to the synthesized binding in whole-module replacement mode
/// (`module.exports = ...` renders as `var _exports: ...; export = _exports;`).
const EXPORTS_BINDING: &str = "_exports";

/// Renders a module tree to `declare module "<name>" { ... }` text.
pub struct Emitter<'m> {
    module: &'m ModuleDecl,
    colors: Colors,
    warnings: bool,
}

impl<'m> Emitter<'m> {
    pub fn new(module: &'m ModuleDecl) -> Self {
        Self {
            module,
            colors: Colors::OFF,
            warnings: true,
        }
    }

    pub fn colors(mut self, colors: Colors) -> Self {
        self.colors = colors;
        self
    }

    /// Include inline diagnostic comments (on by default).
    pub fn warnings(mut self, warnings: bool) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn emit(&self) -> String {
        let c = &self.colors;
        let mut out = format!(
            "{}declare module{} {}\"{}\"{} {{\n",
            c.dim, c.reset, c.green, self.module.name, c.reset
        );

        match &self.module.exports {
            // Whole-module replacement wins over per-member exports, but
            // typedefs still render since the replacement may reference them.
            Some(slot) => {
                for (name, decl) in self.module.exported_items() {
                    if matches!(decl.kind, DeclKind::TypeDef { .. }) {
                        out.push('\n');
                        self.item(&mut out, name, decl, 1);
                    }
                }
                out.push('\n');
                self.exports_slot(&mut out, slot);
            }
            None => {
                for (name, decl) in self.module.exported_items() {
                    out.push('\n');
                    self.item(&mut out, name, decl, 1);
                }
            }
        }

        out.push_str("}\n");
        out
    }

    // ------------------------------------------------------------------
    // Per-member rendering
    // ------------------------------------------------------------------

    fn item(&self, out: &mut String, name: &str, decl: &Declaration, level: usize) {
        let c = &self.colors;
        let indent = INDENT.repeat(level);

        match &decl.kind {
            DeclKind::Variable { types } | DeclKind::Constant { types, .. } => {
                self.doc_block(out, level, &decl.description, &[]);
                out.push_str(&format!(
                    "{indent}{}var{} {}{name}{}: {};\n",
                    c.dim,
                    c.reset,
                    c.blue,
                    c.reset,
                    self.types(types)
                ));
            }
            DeclKind::TypeDef { types } => {
                self.doc_block(out, level, &decl.description, &[]);
                out.push_str(&format!(
                    "{indent}{}type{} {}{name}{} = {};\n",
                    c.dim,
                    c.reset,
                    c.blue,
                    c.reset,
                    self.types(types)
                ));
            }
            DeclKind::Function(func) => {
                self.doc_block(out, level, &decl.description, &func.params);
                out.push_str(&format!(
                    "{indent}{}function{} {}{name}{} {};\n",
                    c.dim,
                    c.reset,
                    c.blue,
                    c.reset,
                    self.signature(func)
                ));
            }
            DeclKind::Class { ctor, members } => {
                let ctor_params: &[Parameter] = ctor.as_ref().map_or(&[], |f| &f.params);
                self.doc_block(out, level, &decl.description, ctor_params);
                self.class_block(out, name, ctor.as_ref(), members, level);
            }
            DeclKind::Object { members } => {
                self.doc_block(out, level, &decl.description, &[]);
                out.push_str(&format!(
                    "{indent}{}var{} {}{name}{}: {};\n",
                    c.dim,
                    c.reset,
                    c.blue,
                    c.reset,
                    self.object_type(members, level)
                ));
            }
            DeclKind::Import {
                module_path,
                source_name,
            } => {
                let line = if name == dtsmith_core::WILDCARD_EXPORT_NAME {
                    format!(
                        "{indent}{}export{} * {}from{} {}\"{module_path}\"{};\n",
                        c.dim, c.reset, c.dim, c.reset, c.green, c.reset
                    )
                } else if source_name == name {
                    format!(
                        "{indent}{}export{} {{ {}{name}{} }} {}from{} {}\"{module_path}\"{};\n",
                        c.dim, c.reset, c.blue, c.reset, c.dim, c.reset, c.green, c.reset
                    )
                } else {
                    format!(
                        "{indent}{}export{} {{ {}{source_name}{} as {}{name}{} }} {}from{} {}\"{module_path}\"{};\n",
                        c.dim, c.reset, c.blue, c.reset, c.blue, c.reset, c.dim, c.reset, c.green, c.reset
                    )
                };
                out.push_str(&line);
            }
            DeclKind::Identifier { target } => {
                let line = if target == name {
                    format!(
                        "{indent}{}export{} {{ {}{name}{} }};\n",
                        c.dim, c.reset, c.blue, c.reset
                    )
                } else {
                    format!(
                        "{indent}{}export{} {{ {}{target}{} as {}{name}{} }};\n",
                        c.dim, c.reset, c.blue, c.reset, c.blue, c.reset
                    )
                };
                out.push_str(&line);
            }
        }

        self.warning_lines(out, decl, level);
    }

    /// `module.exports = ...` as a single export-assignment form.
    fn exports_slot(&self, out: &mut String, slot: &Declaration) {
        let c = &self.colors;
        let indent = INDENT;

        match &slot.kind {
            DeclKind::Import { module_path, .. } => {
                out.push_str(&format!(
                    "{indent}{}import{} {}{EXPORTS_BINDING}{} = {}require{}({}\"{module_path}\"{});\n",
                    c.dim, c.reset, c.blue, c.reset, c.dim, c.reset, c.green, c.reset
                ));
                self.warning_lines(out, slot, 1);
            }
            DeclKind::Identifier { target } => {
                // Unresolvable by construction; keep the reference visible.
                out.push_str(&format!(
                    "{indent}{}export{} = {}{target}{};\n",
                    c.dim, c.reset, c.blue, c.reset
                ));
                self.warning_lines(out, slot, 1);
                return;
            }
            _ => {
                self.item(out, EXPORTS_BINDING, slot, 1);
            }
        }

        out.push_str(&format!(
            "{indent}{}export{} = {}{EXPORTS_BINDING}{};\n",
            c.dim, c.reset, c.blue, c.reset
        ));
    }

    fn class_block(
        &self,
        out: &mut String,
        name: &str,
        ctor: Option<&FunctionDecl>,
        members: &IndexMap<String, Declaration>,
        level: usize,
    ) {
        let c = &self.colors;
        let indent = INDENT.repeat(level);
        let inner = INDENT.repeat(level + 1);

        out.push_str(&format!(
            "{indent}{}class{} {}{name}{} {{\n",
            c.dim, c.reset, c.blue, c.reset
        ));

        if let Some(ctor) = ctor {
            if !ctor.params.is_empty() {
                out.push_str(&format!(
                    "{inner}{}constructor{} ({});\n",
                    c.dim,
                    c.reset,
                    self.parameters(&ctor.params)
                ));
            }
        }

        for (member_name, member) in members {
            match &member.kind {
                DeclKind::Function(func) => {
                    self.doc_block(out, level + 1, &member.description, &func.params);
                    out.push_str(&format!(
                        "{inner}{}public{} {}{member_name}{} {};\n",
                        c.dim,
                        c.reset,
                        c.blue,
                        c.reset,
                        self.signature(func)
                    ));
                }
                _ => {
                    self.doc_block(out, level + 1, &member.description, &[]);
                    out.push_str(&format!(
                        "{inner}{}{member_name}{}: {};\n",
                        c.blue,
                        c.reset,
                        self.member_type(member, level + 1)
                    ));
                }
            }
            self.warning_lines(out, member, level + 1);
        }

        out.push_str(&format!("{indent}}}\n"));
    }

    /// Inline object type: `{ field: type; method (...) : ...; }` across
    /// multiple lines, closing brace at the owning indent level.
    fn object_type(&self, members: &IndexMap<String, Declaration>, level: usize) -> String {
        if members.is_empty() {
            return "{}".to_string();
        }
        let c = &self.colors;
        let indent = INDENT.repeat(level);
        let inner = INDENT.repeat(level + 1);

        let mut out = String::from("{\n");
        for (name, member) in members {
            match &member.kind {
                DeclKind::Function(func) => {
                    out.push_str(&format!(
                        "{inner}{}{name}{} {};\n",
                        c.blue,
                        c.reset,
                        self.signature(func)
                    ));
                }
                _ => {
                    out.push_str(&format!(
                        "{inner}{}{name}{}: {};\n",
                        c.blue,
                        c.reset,
                        self.member_type(member, level + 1)
                    ));
                }
            }
            if self.warnings {
                for error in &member.errors {
                    out.push_str(&format!(
                        "{inner}{}// [warning] {}{}\n",
                        c.yellow, error.message, c.reset
                    ));
                }
            }
        }
        out.push_str(&format!("{indent}}}"));
        out
    }

    /// Type text for a non-function member in field position.
    fn member_type(&self, member: &Declaration, level: usize) -> String {
        match &member.kind {
            DeclKind::Variable { types }
            | DeclKind::Constant { types, .. }
            | DeclKind::TypeDef { types } => self.types(types),
            DeclKind::Object { members } => self.object_type(members, level),
            // No field-position rendering for these shapes.
            DeclKind::Function(_)
            | DeclKind::Class { .. }
            | DeclKind::Import { .. }
            | DeclKind::Identifier { .. } => self.render_type(&Type::any()),
        }
    }

    // ------------------------------------------------------------------
    // Fragments
    // ------------------------------------------------------------------

    /// `(a: number, b: string) : void`
    fn signature(&self, func: &FunctionDecl) -> String {
        let result = if func.result.is_empty() {
            self.render_type(&Type::new("void"))
        } else {
            self.types(&func.result)
        };
        format!("({}) : {}", self.parameters(&func.params), result)
    }

    fn parameters(&self, params: &[Parameter]) -> String {
        params
            .iter()
            .map(|p| format!("{}: {}", p.name, self.types(&p.types)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Alternation of type names: `string | number`.
    fn types(&self, types: &[Type]) -> String {
        if types.is_empty() {
            return self.render_type(&Type::any());
        }
        types
            .iter()
            .map(|t| self.render_type(t))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// One type, generic parameters rendered recursively.
    fn render_type(&self, ty: &Type) -> String {
        let c = &self.colors;
        let name = ty.qualified_name();
        if ty.parameters.is_empty() {
            return format!("{}{name}{}", c.blue, c.reset);
        }
        let parameters = ty
            .parameters
            .iter()
            .map(|p| self.render_type(p))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}{name}{}<{parameters}>", c.blue, c.reset)
    }

    /// `/** ... */` block with the description and one `@param` line per
    /// parameter that carries one. Nothing is written when there is nothing
    /// to say.
    fn doc_block(&self, out: &mut String, level: usize, description: &str, params: &[Parameter]) {
        let documented: Vec<&Parameter> =
            params.iter().filter(|p| !p.description.is_empty()).collect();
        if description.is_empty() && documented.is_empty() {
            return;
        }
        let c = &self.colors;
        let indent = INDENT.repeat(level);

        out.push_str(&format!("{indent}{}/**{}\n", c.dim, c.reset));
        for line in description.lines() {
            out.push_str(&format!("{indent} {}* {line}{}\n", c.dim, c.reset));
        }
        for param in documented {
            out.push_str(&format!(
                "{indent} {}* @param {} {}{}\n",
                c.dim, param.name, param.description, c.reset
            ));
        }
        out.push_str(&format!("{indent} {}*/{}\n", c.dim, c.reset));
    }

    /// Trailing `// [warning] ...` comment per attached diagnostic.
    fn warning_lines(&self, out: &mut String, decl: &Declaration, level: usize) {
        if !self.warnings {
            return;
        }
        let c = &self.colors;
        let indent = INDENT.repeat(level);
        for error in &decl.errors {
            out.push_str(&format!(
                "{indent}{}// [warning] {}{}\n",
                c.yellow, error.message, c.reset
            ));
        }
    }
}
