use crate::model::{DeclKind, Declaration, FunctionDecl, ModuleDecl, Parameter, Type};

#[test]
fn type_qualified_name() {
    assert_eq!(Type::new("string").qualified_name(), "string");
    assert_eq!(
        Type::namespaced("external", "String").qualified_name(),
        "external:String"
    );
}

#[test]
fn type_downgrade_clears_everything() {
    let mut ty = Type::with_parameters("Array", vec![Type::new("Sprocket")]);
    ty.namespace = Some("ext".to_string());
    ty.downgrade();
    assert!(ty.is_any());
    assert!(ty.parameters.is_empty());
    assert_eq!(ty.namespace, None);
}

#[test]
fn insertion_order_is_preserved() {
    let mut module = ModuleDecl::new("m");
    for name in ["zeta", "alpha", "mid"] {
        module.insert(
            name,
            Declaration::new(DeclKind::Variable {
                types: vec![Type::any()],
            })
            .exported(),
        );
    }
    let order: Vec<_> = module.items.keys().map(String::as_str).collect();
    assert_eq!(order, ["zeta", "alpha", "mid"]);
}

#[test]
fn promotion_is_a_slot_overwrite() {
    let mut module = ModuleDecl::new("m");
    module.insert(
        "Widget",
        Declaration::new(DeclKind::Function(FunctionDecl::default())),
    );

    // Replacing the slot keeps the member's position in the map.
    module.insert("tail", Declaration::new(DeclKind::Identifier { target: "Widget".into() }));
    let ctor = match module.items.shift_remove("Widget").map(|d| d.kind) {
        Some(DeclKind::Function(f)) => f,
        other => panic!("expected function, got {:?}", other),
    };
    module.items.shift_insert(
        0,
        "Widget".to_string(),
        Declaration::new(DeclKind::Class {
            ctor: Some(ctor),
            members: Default::default(),
        }),
    );

    let order: Vec<_> = module.items.keys().map(String::as_str).collect();
    assert_eq!(order, ["Widget", "tail"]);
    assert!(matches!(
        module.items["Widget"].kind,
        DeclKind::Class { .. }
    ));
}

#[test]
fn exported_items_filters_locals() {
    let mut module = ModuleDecl::new("m");
    module.insert(
        "local",
        Declaration::new(DeclKind::Constant {
            value: "1".into(),
            types: vec![Type::new("number")],
        }),
    );
    module.insert(
        "public",
        Declaration::new(DeclKind::Variable {
            types: vec![Type::new("string")],
        })
        .exported(),
    );
    let exported: Vec<_> = module.exported_items().map(|(n, _)| n.as_str()).collect();
    assert_eq!(exported, ["public"]);
    assert!(module.has_exports());
}

#[test]
fn model_serializes_with_kind_tags() {
    let decl = Declaration::new(DeclKind::Function(FunctionDecl {
        params: vec![Parameter::new("a")],
        result: vec![Type::new("number")],
    }));
    let json = serde_json::to_value(&decl).unwrap();
    assert_eq!(json["kind"]["kind"], "Function");
    assert_eq!(json["exported"], false);
}
