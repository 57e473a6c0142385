//! Export resolution engine.
//!
//! One top-to-bottom pass over a module's top-level statements. Each
//! statement is classified through the dispatcher, its attached doc comment
//! (the block comment ending on the line directly above it) is parsed, and
//! the result lands in the module's member map. A second sweep validates
//! every inferred type against the recognized-type set, downgrading
//! unresolvable ones to `any` with a note, and inlines or degrades alias
//! exports. Resolution always produces a complete module; only a shape with
//! no registered handler aborts it.

use std::collections::BTreeSet;

use arborium_tree_sitter::{Node, Tree};
use dtsmith_core::{
    BUILTIN_TYPES, DEFAULT_EXPORT_NAME, DeclKind, Declaration, FunctionDecl, ModuleDecl, Parameter,
    Type, WILDCARD_EXPORT_NAME,
};
use indexmap::IndexMap;

use crate::adapter;
use crate::diagnostics::Diagnostics;
use crate::dispatch::{NodePath, dispatch};
use crate::jsdoc::{self, DocComment};
use crate::lang::node_text;
use crate::{PassResult, Result};

/// Kinds that open a new function scope; the return-statement scan must not
/// descend into them.
const FUNCTION_KINDS: &[&str] = &[
    "function",
    "function_expression",
    "function_declaration",
    "generator_function",
    "generator_function_declaration",
    "arrow_function",
    "method_definition",
];

fn is_function_kind(kind: &str) -> bool {
    FUNCTION_KINDS.contains(&kind)
}

/// Resolve one parsed source unit into a module declaration tree.
pub fn resolve(source: &str, tree: &Tree, module_name: &str) -> PassResult<ModuleDecl> {
    let mut resolver = Resolver {
        source,
        module: ModuleDecl::new(module_name),
        diagnostics: Diagnostics::new(),
        recognized: BUILTIN_TYPES.iter().map(|s| s.to_string()).collect(),
    };
    resolver.run(tree.root_node())?;
    Ok((resolver.module, resolver.diagnostics))
}

struct Resolver<'s> {
    source: &'s str,
    module: ModuleDecl,
    diagnostics: Diagnostics,
    recognized: BTreeSet<String>,
}

impl<'s> Resolver<'s> {
    fn text(&self, node: Node) -> &'s str {
        node_text(node, self.source)
    }

    fn run(&mut self, root: Node) -> Result<()> {
        let mut cursor = root.walk();
        let nodes: Vec<Node> = root.named_children(&mut cursor).collect();

        self.header_typedefs(&nodes)?;

        for (i, node) in nodes.iter().enumerate() {
            if node.kind() == "comment" {
                continue;
            }
            let doc = self.attached_doc(&nodes, i);
            // The path stack is scoped to one top-level statement.
            let mut path = NodePath::new();
            self.statement(&mut path, *node, &doc)?;
            debug_assert!(path.is_empty());
        }

        // Script mode: a source with no export construct at all still
        // describes a surface, so its own declarations become it. Imported
        // bindings and bare aliases stay local. Typedefs do not count as
        // export constructs.
        let has_value_exports = self.module.exports.is_some()
            || self
                .module
                .items
                .values()
                .any(|d| d.exported && !matches!(d.kind, DeclKind::TypeDef { .. }));
        if !has_value_exports {
            for decl in self.module.items.values_mut() {
                if !matches!(
                    decl.kind,
                    DeclKind::Import { .. } | DeclKind::Identifier { .. }
                ) {
                    decl.exported = true;
                }
            }
        }

        self.resolve_aliases();
        self.validate();
        Ok(())
    }

    /// Doc comment attached to statement `i`: the block comment whose last
    /// line sits directly above the statement's first line.
    fn attached_doc(&self, nodes: &[Node], i: usize) -> DocComment {
        if i == 0 {
            return DocComment::default();
        }
        let prev = nodes[i - 1];
        if prev.kind() != "comment" {
            return DocComment::default();
        }
        let text = self.text(prev);
        if !text.starts_with("/*") {
            return DocComment::default();
        }
        if prev.end_position().row + 1 != nodes[i].start_position().row {
            return DocComment::default();
        }
        jsdoc::parse_comment(text)
    }

    /// Scan top-of-file comment blocks (those not attached to any statement)
    /// for `@typedef` tags; each becomes a `TypeDef` member and its name
    /// joins the recognized-type set.
    fn header_typedefs(&mut self, nodes: &[Node]) -> Result<()> {
        let first_stmt = nodes.iter().position(|n| n.kind() != "comment");
        for (i, node) in nodes.iter().enumerate() {
            if node.kind() != "comment" {
                break;
            }
            // The comment directly above the first statement is its doc.
            if let Some(stmt) = first_stmt {
                if i + 1 == stmt
                    && node.end_position().row + 1 == nodes[stmt].start_position().row
                {
                    continue;
                }
            }
            let text = self.text(*node);
            if !text.starts_with("/*") {
                continue;
            }
            let doc = jsdoc::parse_comment(text);
            for tag in doc.typedefs() {
                let Some(name) = tag.name.clone() else {
                    self.diagnostics.warning("@typedef without a name; ignoring");
                    continue;
                };
                let types = match &tag.type_expr {
                    Some(expr) => adapter::expand(expr)?,
                    None => vec![Type::any()],
                };
                self.recognized.insert(name.clone());
                let decl = Declaration::new(DeclKind::TypeDef { types })
                    .with_description(tag.description.clone())
                    .exported();
                self.module.insert(name, decl);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Statement classification
    // ------------------------------------------------------------------

    fn statement(&mut self, path: &mut NodePath, node: Node, doc: &DocComment) -> Result<()> {
        dispatch(path, node, |path, node| match node.kind() {
            "function_declaration" | "generator_function_declaration" => {
                Some(self.function_statement(path, node, doc, false))
            }
            "lexical_declaration" | "variable_declaration" => {
                Some(self.variable_statement(path, node, doc, false))
            }
            "expression_statement" => Some(self.expression_statement(path, node, doc)),
            "export_statement" => Some(self.export_statement(path, node, doc)),
            "import_statement" => Some(self.import_statement(node)),
            "empty_statement" => Some(Ok(())),
            _ => None,
        })
    }

    /// `function name(...) { ... }`
    fn function_statement(
        &mut self,
        path: &mut NodePath,
        node: Node,
        doc: &DocComment,
        exported: bool,
    ) -> Result<()> {
        let name_node = node.child_by_field_name("name").expect("named function");
        let name = self.text(name_node).to_string();
        let mut decl = self.infer_function(path, node, doc)?;
        decl.exported = exported;
        self.module.insert(name, decl);
        Ok(())
    }

    /// `var|let|const name = <rhs>, ...;`
    fn variable_statement(
        &mut self,
        path: &mut NodePath,
        node: Node,
        doc: &DocComment,
        exported: bool,
    ) -> Result<()> {
        let mut cursor = node.walk();
        let declarators: Vec<Node> = node
            .named_children(&mut cursor)
            .filter(|n| n.kind() == "variable_declarator")
            .collect();
        for declarator in declarators {
            let name_node = declarator
                .child_by_field_name("name")
                .expect("declarator has a name");
            let name = dispatch(path, name_node, |_, n| match n.kind() {
                "identifier" => Some(Ok(self.text(n).to_string())),
                _ => None,
            })?;
            let mut decl = match declarator.child_by_field_name("value") {
                Some(value) => self.infer_rhs(path, value, doc, &name)?,
                // `var x;` declares an untyped slot.
                None => Declaration::new(DeclKind::Variable {
                    types: vec![Type::any()],
                })
                .with_description(doc.description.clone()),
            };
            decl.exported = exported;
            self.module.insert(name, decl);
        }
        Ok(())
    }

    fn expression_statement(
        &mut self,
        path: &mut NodePath,
        node: Node,
        doc: &DocComment,
    ) -> Result<()> {
        let Some(expr) = self.first_named_child(node) else {
            return Ok(());
        };
        dispatch(path, expr, |path, expr| match expr.kind() {
            "assignment_expression" => Some(self.assignment(path, expr, doc)),
            // Directive prologue (`'use strict';`).
            "string" => Some(Ok(())),
            _ => None,
        })
    }

    /// Assignment with a qualifier-chain target.
    fn assignment(&mut self, path: &mut NodePath, node: Node, doc: &DocComment) -> Result<()> {
        let left = node.child_by_field_name("left").expect("assignment lhs");
        let right = node.child_by_field_name("right").expect("assignment rhs");

        let Some(target) = self.flatten_chain(left) else {
            self.diagnostics.warning(format!(
                "ignoring assignment to non-qualifier target `{}`",
                self.text(left)
            ));
            return Ok(());
        };
        let segments: Vec<&str> = target.split('.').collect();

        match segments.as_slice() {
            ["module", "exports"] => {
                let mut decl = self.infer_rhs(path, right, doc, DEFAULT_EXPORT_NAME)?;
                decl.exported = true;
                // Whole-module replacement: last write wins.
                self.module.exports = Some(decl);
            }
            ["exports", name] | ["module", "exports", name] => {
                let decl = self.infer_rhs(path, right, doc, name)?;
                self.export_member(name, decl);
            }
            [class_name, "prototype"] => {
                self.prototype_object(path, class_name, right, doc)?;
            }
            [class_name, "prototype", member] => {
                let member_decl = self.infer_rhs(path, right, doc, member)?;
                self.add_class_member(class_name, member, member_decl);
            }
            _ => {
                self.diagnostics
                    .warning(format!("ignoring assignment to `{target}`"));
            }
        }
        Ok(())
    }

    /// Register `decl` as an exported member. `exports.foo = foo` re-exports
    /// the local `foo` rather than shadowing it with a self-alias.
    fn export_member(&mut self, name: &str, mut decl: Declaration) {
        decl.exported = true;
        if let DeclKind::Identifier { target } = &decl.kind {
            if target == name {
                if let Some(existing) = self.module.items.get_mut(name) {
                    existing.exported = true;
                    if existing.description.is_empty() {
                        existing.description = decl.description;
                    }
                    return;
                }
            }
        }
        self.module.insert(name.to_string(), decl);
    }

    /// `Widget.prototype = { ... }`: every member of the object literal
    /// becomes a class member.
    fn prototype_object(
        &mut self,
        path: &mut NodePath,
        class_name: &str,
        right: Node,
        doc: &DocComment,
    ) -> Result<()> {
        if right.kind() != "object" {
            self.diagnostics.warning(format!(
                "ignoring non-object prototype assignment to `{class_name}`"
            ));
            return Ok(());
        }
        let object = self.infer_object(path, right, doc)?;
        if let DeclKind::Object { members } = object.kind {
            for (member, decl) in members {
                self.add_class_member(class_name, &member, decl);
            }
        }
        Ok(())
    }

    /// Promote `class_name` from `Function` to `Class` if needed, then add
    /// `member` to it. Promotion overwrites the member-map slot in place, so
    /// the class keeps the function's source position.
    fn add_class_member(&mut self, class_name: &str, member: &str, decl: Declaration) {
        let Some(existing) = self.module.items.get_mut(class_name) else {
            self.diagnostics.warning(format!(
                "ignoring prototype member `{member}` on unknown `{class_name}`"
            ));
            return;
        };
        if let DeclKind::Function(func) = &existing.kind {
            existing.kind = DeclKind::Class {
                ctor: Some(func.clone()),
                members: IndexMap::new(),
            };
        }
        match &mut existing.kind {
            DeclKind::Class { members, .. } => {
                members.insert(member.to_string(), decl);
            }
            _ => {
                self.diagnostics.warning(format!(
                    "ignoring prototype member `{member}` on non-function `{class_name}`"
                ));
            }
        }
    }

    /// Flatten a qualifier chain (`module.exports.foo`) into a dotted path.
    /// `None` for anything that is not a plain identifier/member chain.
    fn flatten_chain(&self, node: Node) -> Option<String> {
        match node.kind() {
            "identifier" => Some(self.text(node).to_string()),
            "member_expression" => {
                let object = self.flatten_chain(node.child_by_field_name("object")?)?;
                let property = node.child_by_field_name("property")?;
                if property.kind() != "property_identifier" {
                    return None;
                }
                Some(format!("{}.{}", object, self.text(property)))
            }
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // ES module statements
    // ------------------------------------------------------------------

    fn export_statement(&mut self, path: &mut NodePath, node: Node, doc: &DocComment) -> Result<()> {
        let source = node
            .child_by_field_name("source")
            .map(|s| self.string_content(s));

        // `export * from "m";`
        if self.has_token(node, "*") {
            let Some(module_path) = source else {
                self.diagnostics
                    .warning("ignoring `export *` without a source module");
                return Ok(());
            };
            let decl = Declaration::new(DeclKind::Import {
                module_path,
                source_name: WILDCARD_EXPORT_NAME.to_string(),
            })
            .exported();
            self.module.insert(WILDCARD_EXPORT_NAME, decl);
            return Ok(());
        }

        // `export default <expr>;`
        if let Some(value) = node.child_by_field_name("value") {
            let mut decl = self.infer_rhs(path, value, doc, DEFAULT_EXPORT_NAME)?;
            decl.exported = true;
            self.module.insert(DEFAULT_EXPORT_NAME, decl);
            return Ok(());
        }

        // `export <declaration>` / `export default <declaration>`
        if let Some(declaration) = node.child_by_field_name("declaration") {
            if self.has_token(node, "default") {
                let mut decl = self.infer_rhs(path, declaration, doc, DEFAULT_EXPORT_NAME)?;
                decl.exported = true;
                self.module.insert(DEFAULT_EXPORT_NAME, decl);
                return Ok(());
            }
            return dispatch(path, declaration, |path, declaration| {
                match declaration.kind() {
                    "function_declaration" | "generator_function_declaration" => {
                        Some(self.function_statement(path, declaration, doc, true))
                    }
                    "lexical_declaration" | "variable_declaration" => {
                        Some(self.variable_statement(path, declaration, doc, true))
                    }
                    _ => None,
                }
            });
        }

        // `export { a, b as c };` / `export { a as b } from "m";`
        for specifier in self.named_children_of_kind(node, "export_clause") {
            let mut cursor = specifier.walk();
            let specs: Vec<Node> = specifier
                .named_children(&mut cursor)
                .filter(|n| n.kind() == "export_specifier")
                .collect();
            for spec in specs {
                let local = spec.child_by_field_name("name").expect("specifier name");
                let local = self.text(local).to_string();
                let exported_as = spec
                    .child_by_field_name("alias")
                    .map(|a| self.text(a).to_string())
                    .unwrap_or_else(|| local.clone());
                match &source {
                    Some(module_path) => {
                        let kind = DeclKind::Import {
                            module_path: module_path.clone(),
                            source_name: local,
                        };
                        self.module.insert(exported_as, Declaration::new(kind).exported());
                    }
                    // `export { foo }` marks an existing local exported;
                    // anything else becomes an alias for the post-pass.
                    None if exported_as == local => match self.module.items.get_mut(&local) {
                        Some(existing) => existing.exported = true,
                        None => {
                            let kind = DeclKind::Identifier { target: local.clone() };
                            self.module.insert(local, Declaration::new(kind).exported());
                        }
                    },
                    None => {
                        let kind = DeclKind::Identifier { target: local };
                        self.module.insert(exported_as, Declaration::new(kind).exported());
                    }
                }
            }
        }
        Ok(())
    }

    /// `import ... from "m";` registers local (unexported) bindings so later
    /// alias exports can resolve them.
    fn import_statement(&mut self, node: Node) -> Result<()> {
        let Some(source) = node.child_by_field_name("source") else {
            return Ok(()); // bare `import "m";` declares nothing
        };
        let module_path = self.string_content(source);

        for clause in self.named_children_of_kind(node, "import_clause") {
            let mut cursor = clause.walk();
            let parts: Vec<Node> = clause.named_children(&mut cursor).collect();
            for part in parts {
                match part.kind() {
                    "identifier" => {
                        let local = self.text(part).to_string();
                        self.module.insert(
                            local,
                            Declaration::new(DeclKind::Import {
                                module_path: module_path.clone(),
                                source_name: DEFAULT_EXPORT_NAME.to_string(),
                            }),
                        );
                    }
                    "namespace_import" => {
                        if let Some(id) = self.first_named_child(part) {
                            self.module.insert(
                                self.text(id).to_string(),
                                Declaration::new(DeclKind::Import {
                                    module_path: module_path.clone(),
                                    source_name: WILDCARD_EXPORT_NAME.to_string(),
                                }),
                            );
                        }
                    }
                    "named_imports" => {
                        let mut inner = part.walk();
                        let specs: Vec<Node> = part
                            .named_children(&mut inner)
                            .filter(|n| n.kind() == "import_specifier")
                            .collect();
                        for spec in specs {
                            let name = spec.child_by_field_name("name").expect("import name");
                            let name = self.text(name).to_string();
                            let local = spec
                                .child_by_field_name("alias")
                                .map(|a| self.text(a).to_string())
                                .unwrap_or_else(|| name.clone());
                            self.module.insert(
                                local,
                                Declaration::new(DeclKind::Import {
                                    module_path: module_path.clone(),
                                    source_name: name,
                                }),
                            );
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Right-hand-side inference
    // ------------------------------------------------------------------

    /// Infer a declaration from an expression, keyed by the name it will be
    /// registered under.
    fn infer_rhs(
        &mut self,
        path: &mut NodePath,
        node: Node,
        doc: &DocComment,
        name: &str,
    ) -> Result<Declaration> {
        dispatch(path, node, |path, node| match node.kind() {
            "function" | "function_expression" | "arrow_function" | "generator_function"
            | "function_declaration" | "generator_function_declaration" => {
                Some(self.infer_function(path, node, doc))
            }
            "object" => Some(self.infer_object(path, node, doc)),
            "identifier" => Some(Ok(Declaration::new(DeclKind::Identifier {
                target: self.text(node).to_string(),
            })
            .with_description(doc.description.clone()))),
            "call_expression" => self
                .require_import(node, name)
                .map(|decl| Ok(decl.with_description(doc.description.clone()))),
            "string" | "template_string" => Some(Ok(self.literal(node, "string", doc))),
            "number" => Some(Ok(self.literal(node, "number", doc))),
            "true" | "false" => Some(Ok(self.literal(node, "boolean", doc))),
            "null" => Some(Ok(self.literal(node, "null", doc))),
            "undefined" => Some(Ok(self.literal(node, "undefined", doc))),
            "regex" => Some(Ok(self.literal(node, "RegExp", doc))),
            "array" => Some(Ok(Declaration::new(DeclKind::Constant {
                value: self.text(node).to_string(),
                types: vec![Type::with_parameters("Array", vec![Type::any()])],
            })
            .with_description(doc.description.clone()))),
            "parenthesized_expression" => {
                let inner = self.first_named_child(node)?;
                Some(self.infer_rhs(path, inner, doc, name))
            }
            _ => None,
        })
    }

    fn literal(&self, node: Node, type_name: &str, doc: &DocComment) -> Declaration {
        Declaration::new(DeclKind::Constant {
            value: self.text(node).to_string(),
            types: vec![Type::new(type_name)],
        })
        .with_description(doc.description.clone())
    }

    /// `require("path")` with a single literal argument.
    fn require_import(&self, node: Node, name: &str) -> Option<Declaration> {
        let callee = node.child_by_field_name("function")?;
        if callee.kind() != "identifier" || self.text(callee) != "require" {
            return None;
        }
        let args = node.child_by_field_name("arguments")?;
        let mut cursor = args.walk();
        let args: Vec<Node> = args.named_children(&mut cursor).collect();
        match args.as_slice() {
            [arg] if arg.kind() == "string" => Some(Declaration::new(DeclKind::Import {
                module_path: self.string_content(*arg),
                source_name: name.to_string(),
            })),
            _ => None,
        }
    }

    /// Object literal: each property becomes a member declaration.
    fn infer_object(&mut self, path: &mut NodePath, node: Node, doc: &DocComment) -> Result<Declaration> {
        let mut members = IndexMap::new();
        let empty = DocComment::default();
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        for child in children {
            match child.kind() {
                "pair" => {
                    let key = child.child_by_field_name("key").expect("pair key");
                    let key = self.property_name(key);
                    let value = child.child_by_field_name("value").expect("pair value");
                    let decl = self.infer_rhs(path, value, &empty, &key)?;
                    members.insert(key, decl);
                }
                "method_definition" => {
                    let key = child.child_by_field_name("name").expect("method name");
                    let key = self.property_name(key);
                    let decl = self.infer_function(path, child, &empty)?;
                    members.insert(key, decl);
                }
                "shorthand_property_identifier" => {
                    let key = self.text(child).to_string();
                    members.insert(
                        key.clone(),
                        Declaration::new(DeclKind::Identifier { target: key }),
                    );
                }
                "comment" => {}
                other => {
                    self.diagnostics
                        .warning(format!("ignoring object member of kind `{other}`"));
                }
            }
        }
        Ok(Declaration::new(DeclKind::Object { members })
            .with_description(doc.description.clone()))
    }

    fn property_name(&self, key: Node) -> String {
        if key.kind() == "string" {
            self.string_content(key)
        } else {
            self.text(key).to_string()
        }
    }

    /// Infer a function signature from its parameters, body, and doc tags.
    fn infer_function(
        &mut self,
        path: &mut NodePath,
        node: Node,
        doc: &DocComment,
    ) -> Result<Declaration> {
        let mut func = FunctionDecl::default();
        let mut notes: Vec<String> = Vec::new();

        for param in self.parameter_nodes(node) {
            let name = dispatch(path, param, |_, n| match n.kind() {
                "identifier" => Some(Ok(self.text(n).to_string())),
                // Default value: the bound name is on the left.
                "assignment_pattern" => {
                    let left = n.child_by_field_name("left")?;
                    (left.kind() == "identifier").then(|| Ok(self.text(left).to_string()))
                }
                _ => None,
            })?;

            let mut parameter = Parameter::new(&name);
            match doc.param(&name) {
                Some(tag) => {
                    parameter.description = tag.description.clone();
                    match &tag.type_expr {
                        Some(expr) => parameter.types = adapter::expand(expr)?,
                        None => {
                            parameter.types = vec![Type::any()];
                            notes.push(format!("Parameter \"{name}\" has no documented type"));
                        }
                    }
                }
                None => {
                    parameter.types = vec![Type::any()];
                    notes.push(format!("Parameter \"{name}\" has no documented type"));
                }
            }
            func.params.push(parameter);
        }

        if self.returns_a_value(node) {
            match doc.returns().and_then(|tag| tag.type_expr.as_ref()) {
                Some(expr) => func.result = adapter::expand(expr)?,
                None => {
                    func.result = vec![Type::any()];
                    notes.push("Return type is not documented".to_string());
                }
            }
        }

        let mut decl =
            Declaration::new(DeclKind::Function(func)).with_description(doc.description.clone());
        for note in notes {
            decl.note(note);
        }
        Ok(decl)
    }

    fn parameter_nodes<'t>(&self, node: Node<'t>) -> Vec<Node<'t>> {
        if let Some(params) = node.child_by_field_name("parameters") {
            let mut cursor = params.walk();
            return params
                .named_children(&mut cursor)
                .filter(|n| n.kind() != "comment")
                .collect();
        }
        // Single-parameter arrow function without parentheses.
        if let Some(param) = node.child_by_field_name("parameter") {
            return vec![param];
        }
        Vec::new()
    }

    /// Whether the function body contains a `return` with a value, without
    /// descending into nested functions. An arrow with an expression body
    /// always returns a value.
    fn returns_a_value(&self, node: Node) -> bool {
        let Some(body) = node.child_by_field_name("body") else {
            return false;
        };
        if body.kind() != "statement_block" {
            return true;
        }
        fn scan(node: Node) -> bool {
            if node.kind() == "return_statement" && node.named_child_count() > 0 {
                return true;
            }
            let mut cursor = node.walk();
            node.named_children(&mut cursor)
                .any(|child| !is_function_kind(child.kind()) && scan(child))
        }
        scan(body)
    }

    // ------------------------------------------------------------------
    // Post-pass: alias resolution and type validation
    // ------------------------------------------------------------------

    /// Inline exported aliases. An alias whose target is a local member
    /// replaces itself with a copy of that member; a dangling alias degrades
    /// to a placeholder constant with a note. Non-exported locals that were
    /// copied drop out of the surface once every alias has been resolved, so
    /// several exports can share one target.
    fn resolve_aliases(&mut self) {
        let mut inlined_locals: BTreeSet<String> = BTreeSet::new();

        // Exports-slot alias first (`module.exports = foo;`).
        if let Some(slot) = &self.module.exports {
            if let DeclKind::Identifier { target } = &slot.kind {
                let target = target.clone();
                let resolved = self.alias_target(&target, &mut inlined_locals);
                let slot = self.module.exports.as_mut().expect("slot checked above");
                match resolved {
                    Some(mut decl) => {
                        decl.exported = true;
                        if decl.description.is_empty() {
                            decl.description = slot.description.clone();
                        }
                        *slot = decl;
                    }
                    None => Self::degrade_alias(slot, &target),
                }
            }
        }

        let names: Vec<String> = self.module.items.keys().cloned().collect();
        for name in names {
            let Some(decl) = self.module.items.get(&name) else {
                continue;
            };
            if !decl.exported {
                continue;
            }
            let DeclKind::Identifier { target } = &decl.kind else {
                continue;
            };
            let target = target.clone();
            // A same-name alias only survives to this point when the target
            // was never defined, so the lookup below degrades it.
            let resolved = if target == name {
                None
            } else {
                self.alias_target(&target, &mut inlined_locals)
            };
            match resolved {
                Some(mut inlined) => {
                    inlined.exported = true;
                    *self.module.items.get_mut(&name).expect("present") = inlined;
                }
                None => {
                    Self::degrade_alias(self.module.items.get_mut(&name).expect("present"), &target)
                }
            }
        }

        for target in inlined_locals {
            self.module.items.shift_remove(&target);
        }
    }

    /// Copy of the alias target. Non-exported locals are queued for removal
    /// rather than removed here; the copies live under the export names.
    fn alias_target(&mut self, target: &str, inlined: &mut BTreeSet<String>) -> Option<Declaration> {
        let decl = self.module.items.get(target)?.clone();
        if !decl.exported {
            inlined.insert(target.to_string());
        }
        Some(decl)
    }

    fn degrade_alias(decl: &mut Declaration, target: &str) {
        decl.kind = DeclKind::Constant {
            value: String::new(),
            types: vec![Type::any()],
        };
        decl.note(format!("Alias target \"{target}\" could not be resolved"));
    }

    /// Validate every type reachable from the exported surface against the
    /// recognized-type set, downgrading unresolved ones to `any` in place.
    /// Namespaced types are trusted without lookup.
    fn validate(&mut self) {
        let recognized = std::mem::take(&mut self.recognized);

        if let Some(slot) = &mut self.module.exports {
            Self::validate_decl(&recognized, slot);
        }
        for decl in self.module.items.values_mut() {
            if decl.exported {
                Self::validate_decl(&recognized, decl);
            }
        }

        self.recognized = recognized;
    }

    fn validate_decl(recognized: &BTreeSet<String>, decl: &mut Declaration) {
        let mut notes: Vec<String> = Vec::new();
        match &mut decl.kind {
            DeclKind::Variable { types }
            | DeclKind::Constant { types, .. }
            | DeclKind::TypeDef { types } => {
                for ty in types {
                    Self::validate_type(recognized, ty, &mut |name| {
                        notes.push(format!("Type \"{name}\" was not found"))
                    });
                }
            }
            DeclKind::Function(func) => Self::validate_function(recognized, func, &mut notes),
            DeclKind::Class { ctor, members } => {
                if let Some(ctor) = ctor {
                    Self::validate_function(recognized, ctor, &mut notes);
                }
                for member in members.values_mut() {
                    Self::validate_decl(recognized, member);
                }
            }
            DeclKind::Object { members } => {
                for member in members.values_mut() {
                    Self::validate_decl(recognized, member);
                }
            }
            DeclKind::Import { .. } | DeclKind::Identifier { .. } => {}
        }
        for note in notes {
            decl.note(note);
        }
    }

    fn validate_function(
        recognized: &BTreeSet<String>,
        func: &mut FunctionDecl,
        notes: &mut Vec<String>,
    ) {
        for param in &mut func.params {
            let param_name = param.name.clone();
            for ty in &mut param.types {
                Self::validate_type(recognized, ty, &mut |name| {
                    notes.push(format!(
                        "Parameter \"{param_name}\" type \"{name}\" was not found"
                    ))
                });
            }
        }
        for ty in &mut func.result {
            Self::validate_type(recognized, ty, &mut |name| {
                notes.push(format!("Return type \"{name}\" was not found"))
            });
        }
    }

    fn validate_type(
        recognized: &BTreeSet<String>,
        ty: &mut Type,
        on_unresolved: &mut impl FnMut(String),
    ) {
        if ty.namespace.is_some() {
            return; // external types are trusted, not verified
        }
        if !recognized.contains(&ty.name) {
            let name = ty.qualified_name();
            ty.downgrade();
            on_unresolved(name);
            return;
        }
        for parameter in &mut ty.parameters {
            Self::validate_type(recognized, parameter, on_unresolved);
        }
    }

    // ------------------------------------------------------------------
    // Small tree helpers
    // ------------------------------------------------------------------

    fn first_named_child<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .find(|n| n.kind() != "comment")
    }

    fn named_children_of_kind<'t>(&self, node: Node<'t>, kind: &str) -> Vec<Node<'t>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|n| n.kind() == kind)
            .collect()
    }

    /// Any (anonymous) child token with exactly this text, e.g. `*` or
    /// `default` in an export statement.
    fn has_token(&self, node: Node, token: &str) -> bool {
        let mut cursor = node.walk();
        node.children(&mut cursor).any(|n| n.kind() == token)
    }

    /// Interior of a string literal node.
    fn string_content(&self, node: Node) -> String {
        let mut cursor = node.walk();
        if let Some(fragment) = node
            .named_children(&mut cursor)
            .find(|n| n.kind() == "string_fragment")
        {
            return self.text(fragment).to_string();
        }
        self.text(node)
            .trim_matches(|c| c == '"' || c == '\'')
            .to_string()
    }
}
