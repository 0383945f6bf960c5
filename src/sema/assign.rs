use crate::{
    sema::{Const, Data, Sema, TypeKind},
    token::Token,
    types::{self, Prim},
};

fn float_assignable(kind: Prim, c: &Const) -> bool {
    types::fits_float(kind, c.as_f64())
}

fn sig_assignable(kind: Prim, c: &Const) -> bool {
    let min = types::min_of(kind);
    let max = types::max_of(kind);

    match c {
        Const::F64(x) => {
            if x.fract() != 0.0 {
                return false;
            }
            let i = x.trunc();
            i >= min && i <= max
        }
        Const::U64(x) => (*x as f64) <= max,
        Const::I64(x) => {
            let x = *x as f64;
            min <= x && x <= max
        }
        _ => false,
    }
}

fn unsig_assignable(kind: Prim, c: &Const) -> bool {
    let max = types::max_of(kind);

    match c {
        Const::F64(x) => {
            if *x < 0.0 || x.fract() != 0.0 {
                return false;
            }
            x.trunc() <= max
        }
        Const::U64(x) => (*x as f64) <= max,
        Const::I64(x) => {
            let x = *x as f64;
            0.0 <= x && x <= max
        }
        _ => false,
    }
}

fn int_assignable(kind: Prim, c: &Const) -> bool {
    if kind.is_sig_int() {
        sig_assignable(kind, c)
    } else if kind.is_unsig_int() {
        unsig_assignable(kind, c)
    } else {
        false
    }
}

/// Wraps structural compatibility with value-level checks: source
/// validity, variadic misuse and constant range narrowing, in that order,
/// stopping at the first that fires.
pub(crate) struct AssignTypeChecker<'a> {
    pub s: &'a mut Sema,
    pub dest: &'a TypeKind,
    pub d: &'a Data,
    pub error_token: &'a Token,
    pub deref: bool,
}

impl AssignTypeChecker<'_> {
    fn push_err(&mut self, key: &'static str, args: Vec<String>) {
        self.s.push_err(self.error_token, key, args);
    }

    fn check_validity(&mut self) -> bool {
        match &self.d.kind {
            TypeKind::Fn(f) => {
                if f.builtin {
                    self.push_err("builtin_as_anonymous_fn", vec![]);
                    return false;
                }
                let is_method = f.decl.map_or(false, |id| self.s.fn_decl(id).is_method);
                if is_method {
                    self.push_err("method_as_anonymous_fn", vec![]);
                    return false;
                }
                if f.has_unbound_generics() {
                    self.push_err("genericed_fn_as_anonymous_fn", vec![]);
                    return false;
                }
                true
            }
            TypeKind::Tup(_) => {
                self.push_err("tuple_assign_to_single", vec![]);
                false
            }
            _ => true,
        }
    }

    /// Constant narrowing: a numeric constant may flow into a narrower
    /// numeric primitive iff its value fits the target's range. Returns
    /// None when narrowing does not apply and structural checking decides.
    fn check_const(&mut self) -> Option<bool> {
        let c = self.d.constant.as_ref()?;
        let dp = self.dest.as_prim()?;
        let sp = self.d.kind.as_prim()?;
        if !c.is_num() || !sp.is_num() {
            return None;
        }

        if dp.is_float() {
            if !float_assignable(dp, c) {
                self.push_err("overflow_limits", vec![]);
                return Some(false);
            }
            Some(true)
        } else if dp.is_int() {
            if !int_assignable(dp, c) {
                self.push_err("overflow_limits", vec![]);
                return Some(false);
            }
            Some(true)
        } else {
            None
        }
    }

    pub fn check(&mut self) -> bool {
        if !self.check_validity() {
            return false;
        }

        if self.d.variadiced {
            let src = format!("{}...", self.d.kind);
            self.push_err("incompatible_types", vec![self.dest.to_string(), src]);
            return false;
        }

        match self.check_const() {
            Some(ok) => ok,
            None => self
                .s
                .check_type_compatibility(self.dest, &self.d.kind, self.error_token, self.deref),
        }
    }
}

impl Sema {
    /// Value-level assignment check: may `d` flow into a slot of kind
    /// `dest`.
    pub fn check_assign_type(
        &mut self,
        dest: &TypeKind,
        d: &Data,
        error_token: &Token,
        deref: bool,
    ) -> bool {
        AssignTypeChecker {
            s: self,
            dest,
            d,
            error_token,
            deref,
        }
        .check()
    }

    /// Init-expression mutability rule: a mutable slot cannot take an
    /// immutable value whose type is transitively mutable.
    pub fn check_validity_for_init_expr(
        &mut self,
        dest_mutable: bool,
        d: &Data,
        error_token: &Token,
    ) -> bool {
        if dest_mutable && !d.mutable && d.kind.is_mut() {
            self.push_err(error_token, "mutable_operation_on_immutable", vec![]);
            return false;
        }
        true
    }
}
