use crate::{
    sema::{
        substitute_generics, Data, DynamicTypeAnnotation, ExprModel, FnIns, Sema, SliceModel,
    },
    token::Token,
};

/// Argument of a call: the argument's anchor token and its evaluated value.
#[derive(Debug, Clone)]
pub struct CallArg {
    pub token: Token,
    pub data: Data,
}

/// Checks the argument list of a call against a function instance. The
/// receiver parameter of methods is excluded. Processing continues after
/// errors so every argument gets its diagnostics.
pub struct FnCallArgChecker<'a> {
    s: &'a mut Sema,
    f: &'a mut FnIns,
    args: Vec<CallArg>,
    error_token: Token,
    dynamic_annotation: bool,
    /// Final argument expression models, with variadic arguments packed
    /// into a synthesized slice model.
    pub arg_models: Vec<ExprModel>,
}

impl<'a> FnCallArgChecker<'a> {
    pub fn new(
        s: &'a mut Sema,
        f: &'a mut FnIns,
        args: Vec<CallArg>,
        error_token: Token,
        dynamic_annotation: bool,
    ) -> FnCallArgChecker<'a> {
        FnCallArgChecker {
            s,
            f,
            args,
            error_token,
            dynamic_annotation,
            arg_models: Vec::new(),
        }
    }

    pub fn check(&mut self) -> bool {
        let params: Vec<usize> = (0..self.f.params.len())
            .filter(|&i| !self.f.params[i].self_param)
            .collect();

        if !self.check_counts(&params) {
            return false;
        }

        let mut ok = self.check_args(&params);
        if ok && self.dynamic_annotation {
            ok = self.check_dynamic_type_annotation();
            if ok {
                self.finalize();
            }
        }
        ok
    }

    fn check_counts(&mut self, params: &[usize]) -> bool {
        let n = params.len();
        let variadic_last = params.last().map_or(false, |&i| self.f.params[i].variadic);

        if self.args.len() == n {
            return true;
        }
        if variadic_last && self.args.len() + 1 >= n {
            return true;
        }
        if self.args.len() > n {
            self.s
                .push_err(&self.error_token, "argument_overflow", vec![]);
            return false;
        }

        let idents = params[self.args.len()..]
            .iter()
            .map(|&i| self.f.params[i].ident.clone())
            .collect::<Vec<_>>()
            .join(", ");
        self.s
            .push_err(&self.error_token, "missing_expr_for", vec![idents]);
        false
    }

    fn check_args(&mut self, params: &[usize]) -> bool {
        let mut ok = true;
        let mut ai = 0;
        for &pi in params {
            if self.f.params[pi].variadic {
                ok = self.push_variadic(pi, ai) && ok;
                // Variadic parameters are always last.
                break;
            }
            if ai >= self.args.len() {
                // Deficit was already reported by the count check.
                break;
            }
            ok = self.push(pi, ai) && ok;
            ai += 1;
        }
        ok
    }

    fn push(&mut self, pi: usize, ai: usize) -> bool {
        let token = self.args[ai].token.clone();
        let mut d = self.args[ai].data.clone();
        self.arg_models.push(d.model.clone());
        self.check_arg(pi, &mut d, &token)
    }

    fn push_variadic(&mut self, pi: usize, start: usize) -> bool {
        let mut model = Some(SliceModel {
            elem: self.f.params[pi].kind.clone(),
            elems: Vec::new(),
        });
        let more = start + 1 < self.args.len();
        let mut variadiced = false;
        let mut ok = true;

        for ai in start..self.args.len() {
            let token = self.args[ai].token.clone();
            let mut d = self.args[ai].data.clone();

            if d.variadiced {
                variadiced = true;
                // Clear the flag so the assignment check sees the element
                // kind, not a spread.
                d.variadiced = false;
                match d.model.clone() {
                    ExprModel::Slice(m) => {
                        model = Some(SliceModel {
                            elem: self.f.params[pi].kind.clone(),
                            elems: m.elems,
                        });
                    }
                    other => {
                        model = None;
                        self.arg_models.push(other);
                    }
                }
            } else if let Some(m) = &mut model {
                m.elems.push(d.model.clone());
            }

            ok = self.check_arg(pi, &mut d, &token) && ok;
        }

        if variadiced && more {
            self.s
                .push_err(&self.error_token, "more_args_with_variadiced", vec![]);
            ok = false;
        }

        if let Some(mut m) = model {
            m.elem = self.f.params[pi].kind.clone();
            self.arg_models.push(ExprModel::Slice(m));
        }
        ok
    }

    fn check_arg(&mut self, pi: usize, d: &mut Data, token: &Token) -> bool {
        if self.dynamic_annotation {
            let idents = self
                .f
                .decl
                .map(|id| self.s.fn_decl(id).generics.clone())
                .unwrap_or_default();

            let ok = {
                let FnIns {
                    params, generics, ..
                } = &mut *self.f;
                let mut dta = DynamicTypeAnnotation {
                    s: &mut *self.s,
                    idents: &idents,
                    generics: generics.as_mut_slice(),
                    error_token: token,
                };
                dta.annotate(&mut params[pi].kind, &d.kind)
            };

            if !ok {
                self.s
                    .push_err(token, "dynamic_type_annotation_failed", vec![]);
                return false;
            }
        }

        let mutable = self.f.params[pi].mutable;
        let kind = self.f.params[pi].kind.clone();
        self.s.check_validity_for_init_expr(mutable, d, token);
        self.s.check_assign_type(&kind, d, token, false);
        true
    }

    /// After all arguments were processed every generic must be bound.
    fn check_dynamic_type_annotation(&mut self) -> bool {
        if self.f.generics.iter().any(Option::is_none) {
            self.s
                .push_err(&self.error_token, "dynamic_type_annotation_failed", vec![]);
            return false;
        }
        true
    }

    /// Substitute the bound generics through the remaining parameter and
    /// result slots the annotator did not walk.
    fn finalize(&mut self) {
        let Some(id) = self.f.decl else {
            return;
        };
        let idents = self.s.fn_decl(id).generics.clone();
        let bound = self.f.generics.clone();
        for p in &mut self.f.params {
            substitute_generics(&mut p.kind, &idents, &bound);
        }
        if let Some(result) = &mut self.f.result {
            substitute_generics(result, &idents, &bound);
        }
    }
}

impl Sema {
    /// Check a call site: argument counts, per-argument flows, variadic
    /// packing and, for generic calls, dynamic annotation. Returns the
    /// final argument models on success.
    pub fn check_fn_call(
        &mut self,
        f: &mut FnIns,
        args: Vec<CallArg>,
        error_token: &Token,
        dynamic_annotation: bool,
    ) -> (bool, Vec<ExprModel>) {
        let mut fcac = FnCallArgChecker::new(self, f, args, error_token.clone(), dynamic_annotation);
        let ok = fcac.check();
        let models = std::mem::take(&mut fcac.arg_models);
        (ok, models)
    }
}
