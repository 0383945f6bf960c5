use crate::{
    sema::{
        tests::{array_of, assert_keys, data, map_of, prim, sema, slice_of, tok},
        RangeVar, TypeKind,
    },
    types::Prim,
};

fn rv(ident: &str) -> Option<RangeVar> {
    Some(RangeVar {
        token: tok(ident),
        ident: ident.to_owned(),
        mutable: false,
    })
}

fn mut_rv(ident: &str) -> Option<RangeVar> {
    let mut v = rv(ident);
    if let Some(v) = &mut v {
        v.mutable = true;
    }
    v
}

#[test]
fn test_slice_iteration() {
    // for k, v in slice_of_int
    let mut s = sema();
    let d = data(slice_of(prim(Prim::I32)));
    let iter = s.check_range(&d, &tok("in"), rv("k"), rv("v")).unwrap();

    assert!(!s.failed(), "diagnostics:\n{}", s.diags().render());
    assert_eq!(iter.key_a.as_ref().unwrap().kind, prim(Prim::Int));
    assert_eq!(iter.key_b.as_ref().unwrap().kind, prim(Prim::I32));
}

#[test]
fn test_array_iteration() {
    let mut s = sema();
    let d = data(array_of(prim(Prim::Str), 3));
    let iter = s.check_range(&d, &tok("in"), rv("i"), rv("v")).unwrap();
    assert_eq!(iter.key_a.as_ref().unwrap().kind, prim(Prim::Int));
    assert_eq!(iter.key_b.as_ref().unwrap().kind, prim(Prim::Str));
}

#[test]
fn test_map_iteration() {
    let mut s = sema();
    let d = data(map_of(prim(Prim::Str), prim(Prim::F64)));
    let iter = s.check_range(&d, &tok("in"), rv("k"), rv("v")).unwrap();
    assert_eq!(iter.key_a.as_ref().unwrap().kind, prim(Prim::Str));
    assert_eq!(iter.key_b.as_ref().unwrap().kind, prim(Prim::F64));
}

#[test]
fn test_str_iteration() {
    let mut s = sema();
    let d = data(prim(Prim::Str));
    let iter = s.check_range(&d, &tok("in"), rv("i"), rv("b")).unwrap();
    assert_eq!(iter.key_a.as_ref().unwrap().kind, prim(Prim::Int));
    assert_eq!(iter.key_b.as_ref().unwrap().kind, prim(Prim::U8));
}

#[test]
fn test_non_enumerable_source() {
    let mut s = sema();
    let d = data(prim(Prim::Bool));
    assert!(s.check_range(&d, &tok("in"), rv("k"), rv("v")).is_none());
    assert_keys(&s, &["iter_range_require_enumerable_expr"]);
}

#[test]
fn test_underscore_suppresses_binding() {
    let mut s = sema();
    let d = data(slice_of(prim(Prim::I32)));
    let iter = s.check_range(&d, &tok("in"), rv("_"), rv("v")).unwrap();
    assert!(iter.key_a.is_none());
    assert!(iter.key_b.is_some());

    let iter = s.check_range(&d, &tok("in"), None, rv("v")).unwrap();
    assert!(iter.key_a.is_none());
    assert!(iter.key_b.is_some());
}

#[test]
fn test_mutable_binding_over_immutable_source() {
    let mut s = sema();
    let d = data(slice_of(slice_of(prim(Prim::I32))));
    s.check_range(&d, &tok("in"), rv("k"), mut_rv("v"));
    assert_keys(&s, &["mutable_operation_on_immutable"]);

    let mut s = sema();
    let mut d = data(slice_of(slice_of(prim(Prim::I32))));
    d.mutable = true;
    s.check_range(&d, &tok("in"), rv("k"), mut_rv("v"));
    assert!(!s.failed());
}

#[test]
fn test_map_value_mutability_is_per_part() {
    // A mutable binding over a copyable map value is fine even though the
    // map itself is a mutable type.
    let mut s = sema();
    let d = data(map_of(prim(Prim::Str), prim(Prim::I32)));
    s.check_range(&d, &tok("in"), rv("k"), mut_rv("v"));
    assert!(!s.failed(), "diagnostics:\n{}", s.diags().render());

    // A slice-valued map binds a view of shared storage.
    let d = data(map_of(prim(Prim::Str), slice_of(prim(Prim::I32))));
    s.check_range(&d, &tok("in"), rv("k"), mut_rv("v"));
    assert_keys(&s, &["mutable_operation_on_immutable"]);
}

#[test]
fn test_iteration_over_typed_var() {
    let mut s = sema();
    let d = data(TypeKind::Nil);
    assert!(s.check_range(&d, &tok("in"), rv("k"), None).is_none());
    assert_keys(&s, &["iter_range_require_enumerable_expr"]);
}
