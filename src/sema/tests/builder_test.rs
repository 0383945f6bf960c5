use strum::IntoEnumIterator;

use crate::{
    sema::{
        tests::{
            alias_node, assert_keys, enum_node, field, fn_node, param, prim, sema, struct_node,
            trait_node, ty, ty_array, ty_generics, ty_map, ty_ptr, ty_ref, ty_slice, ty_tuple,
            ty_unsafe_ptr,
        },
        CheckState, Scope, TypeKind,
    },
    types::Prim,
};

#[test]
fn test_build_primitives() {
    let mut s = sema();
    for p in Prim::iter() {
        let kind = s.build_type(&ty(&p.to_string()), Scope::empty());
        assert_eq!(kind, Some(prim(p)));
    }
    assert!(!s.failed());
}

#[test]
fn test_generics_on_primitive() {
    let mut s = sema();
    let kind = s.build_type(&ty_generics("i32", vec![ty("str")]), Scope::empty());
    assert!(kind.is_none());
    assert_keys(&s, &["type_not_supports_generics"]);
}

#[test]
fn test_unknown_ident() {
    let mut s = sema();
    assert!(s.build_type(&ty("Foo"), Scope::empty()).is_none());
    assert_keys(&s, &["invalid_type"]);
}

#[test]
fn test_alias_resolution() {
    let mut s = sema();
    s.register_alias(alias_node("Num", ty("i32")));
    s.register_alias(alias_node("Nums", ty_slice(ty("Num"))));
    assert!(s.check());

    let kind = s.build_type(&ty("Nums"), Scope::empty()).unwrap();
    assert_eq!(kind.to_string(), "[]i32");
}

#[test]
fn test_alias_cycle_terminates() {
    let mut s = sema();
    s.register_alias(alias_node("A", ty("B")));
    s.register_alias(alias_node("B", ty("A")));
    assert!(!s.check());

    // Exactly one cycle report, naming a node on the cycle.
    assert_keys(&s, &["illegal_cycle_in_declaration"]);
    let name = &s.diags().get(0).args[0];
    assert!(name == "A" || name == "B");

    // Both declarations end checked with an absent kind.
    assert_eq!(s.alias(0).state, CheckState::Checked);
    assert_eq!(s.alias(1).state, CheckState::Checked);
    assert!(s.alias(0).kind.is_none());
    assert!(s.alias(1).kind.is_none());
}

#[test]
fn test_self_referential_alias() {
    let mut s = sema();
    s.register_alias(alias_node("A", ty("A")));
    assert!(!s.check());
    assert_keys(&s, &["illegal_cycle_in_declaration"]);
}

#[test]
fn test_broken_alias_reference_reports_again() {
    let mut s = sema();
    s.register_alias(alias_node("A", ty("Missing")));
    s.register_alias(alias_node("B", ty("A")));
    assert!(!s.check());
    // A fails on the unknown ident; B then reports against the broken A
    // instead of re-walking it.
    assert_keys(&s, &["invalid_type", "invalid_type"]);
}

#[test]
fn test_struct_value_cycle() {
    let mut s = sema();
    s.register_struct(struct_node("A", vec![], vec![field("x", ty("A"))]));
    assert!(!s.check());
    assert_keys(&s, &["illegal_cycle_in_declaration"]);
}

#[test]
fn test_struct_cycle_through_alias() {
    let mut s = sema();
    s.register_struct(struct_node("A", vec![], vec![field("x", ty("B"))]));
    s.register_alias(alias_node("B", ty("A")));
    assert!(!s.check());
    assert_keys(&s, &["illegal_cycle_in_declaration"]);
}

#[test]
fn test_struct_indirect_self_reference() {
    let mut s = sema();
    s.register_struct(struct_node(
        "Node",
        vec![],
        vec![field("next", ty_ref(ty("Node"))), field("v", ty("i32"))],
    ));
    assert!(s.check());

    let next = s.struct_decl(0).fields[0].kind.as_ref().unwrap();
    assert_eq!(next.to_string(), "&Node");
}

#[test]
fn test_struct_slice_self_reference() {
    let mut s = sema();
    s.register_struct(struct_node(
        "Tree",
        vec![],
        vec![field("kids", ty_slice(ty("Tree")))],
    ));
    assert!(s.check());
}

#[test]
fn test_ref_violations() {
    let mut s = sema();
    s.register_enum(enum_node("E"));
    s.register_trait(trait_node("T", vec![]));
    assert!(s.check());

    assert!(s
        .build_type(&ty_ref(ty_ref(ty("i32"))), Scope::empty())
        .is_none());
    assert!(s
        .build_type(&ty_ref(ty_ptr(ty("i32"))), Scope::empty())
        .is_none());
    assert!(s.build_type(&ty_ref(ty("E")), Scope::empty()).is_none());
    assert!(s.build_type(&ty_ref(ty("T")), Scope::empty()).is_none());
    assert!(s
        .build_type(&ty_ptr(ty_ref(ty("i32"))), Scope::empty())
        .is_none());

    assert_keys(
        &s,
        &[
            "ref_refs_ref",
            "ref_refs_ptr",
            "ref_refs_enum",
            "ref_refs_trait",
            "ptr_points_ref",
        ],
    );
}

#[test]
fn test_unsafe_pointer() {
    let mut s = sema();
    let kind = s.build_type(&ty_unsafe_ptr(), Scope::empty()).unwrap();
    assert_eq!(kind.to_string(), "*unsafe");
    assert!(!s.failed());
}

#[test]
fn test_array_sizes() {
    let mut s = sema();
    let kind = s
        .build_type(&ty_array(ty("i32"), Some(4)), Scope::empty())
        .unwrap();
    assert_eq!(kind.to_string(), "[4]i32");

    assert!(s
        .build_type(&ty_array(ty("i32"), None), Scope::empty())
        .is_none());
    assert!(s
        .build_type(&ty_array(ty("i32"), Some(-1)), Scope::empty())
        .is_none());
    assert_keys(&s, &["auto_sized_array", "invalid_numeric_range"]);
}

#[test]
fn test_map_key_validity() {
    let mut s = sema();
    s.register_enum(enum_node("E"));
    s.register_struct(struct_node(
        "Point",
        vec![],
        vec![field("x", ty("int")), field("y", ty("int"))],
    ));
    s.register_struct(struct_node(
        "Buf",
        vec![],
        vec![field("data", ty_slice(ty("u8")))],
    ));
    assert!(s.check());

    assert!(s
        .build_type(&ty_map(ty("str"), ty("i32")), Scope::empty())
        .is_some());
    assert!(s
        .build_type(&ty_map(ty("E"), ty("i32")), Scope::empty())
        .is_some());
    // A struct is a valid key when every field supports equality.
    assert!(s
        .build_type(&ty_map(ty("Point"), ty("i32")), Scope::empty())
        .is_some());

    assert!(s
        .build_type(&ty_map(ty_slice(ty("i32")), ty("i32")), Scope::empty())
        .is_none());
    assert!(s
        .build_type(&ty_map(ty("any"), ty("i32")), Scope::empty())
        .is_none());
    assert!(s
        .build_type(&ty_map(ty("Buf"), ty("i32")), Scope::empty())
        .is_none());
    assert_keys(
        &s,
        &[
            "invalid_map_key_type",
            "invalid_map_key_type",
            "invalid_map_key_type",
        ],
    );
}

#[test]
fn test_tuple_arity() {
    let mut s = sema();
    assert!(s
        .build_type(&ty_tuple(vec![ty("i32")]), Scope::empty())
        .is_none());
    assert_keys(&s, &["invalid_type"]);

    let kind = s
        .build_type(&ty_tuple(vec![ty("i32"), ty("str")]), Scope::empty())
        .unwrap();
    assert_eq!(kind.to_string(), "(i32, str)");
}

#[test]
fn test_struct_generic_arity() {
    let mut s = sema();
    s.register_struct(struct_node(
        "Pair",
        vec!["A", "B"],
        vec![field("a", ty("A")), field("b", ty("B"))],
    ));
    assert!(s.check());

    assert!(s
        .build_type(&ty_generics("Pair", vec![ty("str")]), Scope::empty())
        .is_none());
    assert!(s
        .build_type(
            &ty_generics("Pair", vec![ty("str"), ty("i32"), ty("f64")]),
            Scope::empty()
        )
        .is_none());
    assert_keys(&s, &["missing_generics", "generics_overflow"]);

    let kind = s
        .build_type(&ty_generics("Pair", vec![ty("str"), ty("i32")]), Scope::empty())
        .unwrap();
    assert_eq!(kind.to_string(), "Pair[str, i32]");
}

#[test]
fn test_generic_scope_resolution() {
    let mut s = sema();
    let kind = s
        .build_type(&ty_slice(ty("T")), Scope::generics(vec!["T".to_owned()]))
        .unwrap();
    assert_eq!(kind, TypeKind::Slc(Box::new(TypeKind::Generic("T".to_owned()))));
}

#[test]
fn test_fn_ident_as_type() {
    let mut s = sema();
    s.register_fn(fn_node(
        "add",
        vec![],
        vec![param("a", ty("i32")), param("b", ty("i32"))],
        Some(ty("i32")),
    ));
    assert!(s.check());

    let kind = s.build_type(&ty("add"), Scope::empty()).unwrap();
    assert_eq!(kind.to_string(), "fn(i32, i32): i32");
}

#[test]
fn test_generic_fn_explicit_instantiation() {
    let mut s = sema();
    s.register_fn(fn_node(
        "id",
        vec!["T"],
        vec![param("x", ty("T"))],
        Some(ty("T")),
    ));
    assert!(s.check());

    let kind = s
        .build_type(&ty_generics("id", vec![ty("str")]), Scope::empty())
        .unwrap();
    assert_eq!(kind.to_string(), "fn(str): str");
}

#[test]
fn test_enum_underlying_kind() {
    let mut s = sema();
    let mut node = enum_node("Color");
    node.kind = Some(ty("u8"));
    s.register_enum(node);
    assert!(s.check());
    assert_eq!(s.enum_decl(0).kind, Prim::U8);

    let mut s = sema();
    let mut node = enum_node("Bad");
    node.kind = Some(ty("str"));
    s.register_enum(node);
    assert!(!s.check());
    assert_keys(&s, &["invalid_type"]);
}
