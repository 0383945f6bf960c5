use crate::{
    sema::{Data, FnIns, Sema, TypeKind},
    token::Token,
};

/// Flattened result types of a function: empty for void, singleton for a
/// single result, the member kinds for a tuple result.
fn result_types(f: &FnIns) -> Vec<TypeKind> {
    match &f.result {
        None => Vec::new(),
        Some(r) => match r.as_ref() {
            TypeKind::Tup(types) => types.clone(),
            kind => vec![kind.clone()],
        },
    }
}

/// Split a tuple-typed value into one Data per member.
fn tuple_datas(d: &Data) -> Vec<Data> {
    match &d.kind {
        TypeKind::Tup(types) => types
            .iter()
            .map(|t| Data {
                kind: t.clone(),
                constant: None,
                mutable: d.mutable,
                lvalue: false,
                variadiced: false,
                model: d.model.clone(),
            })
            .collect(),
        _ => vec![d.clone()],
    }
}

/// Checks a return statement against the enclosing function instance:
/// arity, voidness and per-value assignment with mutability enforcement.
pub struct RetTypeChecker<'a> {
    s: &'a mut Sema,
    f: &'a FnIns,
    error_token: Token,
}

impl<'a> RetTypeChecker<'a> {
    pub fn new(s: &'a mut Sema, f: &'a FnIns, error_token: Token) -> RetTypeChecker<'a> {
        RetTypeChecker { s, f, error_token }
    }

    pub fn check(&mut self, d: Option<Data>) -> bool {
        let types = result_types(self.f);
        let exprs = d.map(|d| tuple_datas(&d)).unwrap_or_default();
        let void = self.f.result.is_none();
        let n = exprs.len();
        let token = self.error_token.clone();

        if n == 0 && !void {
            // A bare `ret` is allowed when the results are named.
            let named = self
                .f
                .decl
                .map_or(false, |id| self.s.fn_decl(id).any_result_var());
            if !named {
                self.s.push_err(&token, "require_ret_expr", vec![]);
                return false;
            }
            return true;
        }

        if n > 0 && void {
            self.s.push_err(&token, "void_function_ret_expr", vec![]);
            return false;
        }

        if n > types.len() {
            self.s.push_err(&token, "overflow_ret", vec![]);
        } else if n < types.len() {
            self.s.push_err(&token, "missing_multi_ret", vec![]);
        }

        for (d, t) in exprs.iter().zip(types.iter()) {
            if !d.mutable && d.kind.is_mut() {
                self.s.push_err(&token, "ret_with_mut_typed_non_mut", vec![]);
                return false;
            }
            self.s.check_assign_type(t, d, &token, false);
        }

        true
    }
}

impl Sema {
    /// Check a return statement's value (absent for a bare `ret`) against
    /// the function instance it returns from.
    pub fn check_ret(&mut self, f: &FnIns, d: Option<Data>, error_token: &Token) -> bool {
        RetTypeChecker::new(self, f, error_token.clone()).check(d)
    }
}
