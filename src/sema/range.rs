use crate::{
    sema::{Data, Sema, TypeKind},
    token::Token,
    types::Prim,
};

/// Loop variable slot of a range iteration (`for a, b in expr`). An
/// underscore ident suppresses binding.
#[derive(Debug, Clone)]
pub struct RangeVar {
    pub token: Token,
    pub ident: String,
    pub mutable: bool,
}

/// A bound loop variable.
#[derive(Debug, Clone)]
pub struct Var {
    pub token: Token,
    pub ident: String,
    pub kind: TypeKind,
    pub mutable: bool,
}

/// Bindings produced for a range iteration.
#[derive(Debug, Clone, Default)]
pub struct RangeIter {
    pub key_a: Option<Var>,
    pub key_b: Option<Var>,
}

fn is_ignore_ident(ident: &str) -> bool {
    ident == "_"
}

fn bind(slot: &Option<RangeVar>, kind: TypeKind) -> Option<Var> {
    let v = slot.as_ref()?;
    if is_ignore_ident(&v.ident) {
        return None;
    }
    Some(Var {
        token: v.token.clone(),
        ident: v.ident.clone(),
        kind,
        mutable: v.mutable,
    })
}

/// Binds loop variables for iteration over slices, arrays, maps and
/// strings; rejects any other source kind.
pub struct RangeChecker<'a> {
    s: &'a mut Sema,
    in_token: Token,
    d: &'a Data,
    key_a: Option<RangeVar>,
    key_b: Option<RangeVar>,
}

impl<'a> RangeChecker<'a> {
    pub fn new(
        s: &'a mut Sema,
        in_token: Token,
        d: &'a Data,
        key_a: Option<RangeVar>,
        key_b: Option<RangeVar>,
    ) -> RangeChecker<'a> {
        RangeChecker {
            s,
            in_token,
            d,
            key_a,
            key_b,
        }
    }

    pub fn check(&mut self) -> Option<RangeIter> {
        match &self.d.kind {
            TypeKind::Slc(elem) => {
                let elem = (**elem).clone();
                Some(self.check_enumerable(TypeKind::Prim(Prim::Int), elem))
            }
            TypeKind::Arr(arr) => {
                let elem = (*arr.elem).clone();
                Some(self.check_enumerable(TypeKind::Prim(Prim::Int), elem))
            }
            TypeKind::Map(m) => {
                let (key, val) = (m.key.clone(), m.val.clone());
                Some(self.check_map(key, val))
            }
            TypeKind::Prim(Prim::Str) => {
                Some(self.check_enumerable(TypeKind::Prim(Prim::Int), TypeKind::Prim(Prim::U8)))
            }
            _ => {
                let token = self.in_token.clone();
                self.s
                    .push_err(&token, "iter_range_require_enumerable_expr", vec![]);
                None
            }
        }
    }

    fn check_enumerable(&mut self, a_kind: TypeKind, b_kind: TypeKind) -> RangeIter {
        let key_a = bind(&self.key_a, a_kind);
        let key_b = bind(&self.key_b, b_kind);
        if let Some(b) = &key_b {
            let token = self.in_token.clone();
            self.s.check_validity_for_init_expr(b.mutable, self.d, &token);
        }
        RangeIter { key_a, key_b }
    }

    fn check_map(&mut self, key: TypeKind, val: TypeKind) -> RangeIter {
        let key_a = bind(&self.key_a, key.clone());
        let key_b = bind(&self.key_b, val.clone());

        // Each variable is validated against the part of the map it
        // binds, not the map itself.
        if let Some(a) = &key_a {
            let mut d = self.d.clone();
            d.kind = key;
            let token = self.in_token.clone();
            self.s.check_validity_for_init_expr(a.mutable, &d, &token);
        }
        if let Some(b) = &key_b {
            let mut d = self.d.clone();
            d.kind = val;
            let token = self.in_token.clone();
            self.s.check_validity_for_init_expr(b.mutable, &d, &token);
        }

        RangeIter { key_a, key_b }
    }
}

impl Sema {
    /// Bind loop variables for `for a, b in expr` over the evaluated
    /// iteration source.
    pub fn check_range(
        &mut self,
        d: &Data,
        in_token: &Token,
        key_a: Option<RangeVar>,
        key_b: Option<RangeVar>,
    ) -> Option<RangeIter> {
        RangeChecker::new(self, in_token.clone(), d, key_a, key_b).check()
    }
}
