use crate::{
    sema::{FnIns, Sema, TypeKind},
    token::Token,
};

/// Replace generic parameter occurrences in a kind with their bound kinds.
pub(crate) fn substitute_generics(
    kind: &mut TypeKind,
    idents: &[String],
    bound: &[Option<TypeKind>],
) {
    match kind {
        TypeKind::Generic(ident) => {
            if let Some(i) = idents.iter().position(|g| g.as_str() == ident.as_str()) {
                if let Some(Some(k)) = bound.get(i) {
                    *kind = k.clone();
                }
            }
        }
        TypeKind::Ref(elem) | TypeKind::Slc(elem) => substitute_generics(elem, idents, bound),
        TypeKind::Ptr(ptr) => {
            if let Some(elem) = &mut ptr.elem {
                substitute_generics(elem, idents, bound);
            }
        }
        TypeKind::Arr(arr) => substitute_generics(&mut arr.elem, idents, bound),
        TypeKind::Map(m) => {
            substitute_generics(&mut m.key, idents, bound);
            substitute_generics(&mut m.val, idents, bound);
        }
        TypeKind::Tup(types) => {
            for t in types {
                substitute_generics(t, idents, bound);
            }
        }
        TypeKind::Fn(f) => {
            for p in &mut f.params {
                substitute_generics(&mut p.kind, idents, bound);
            }
            if let Some(result) = &mut f.result {
                substitute_generics(result, idents, bound);
            }
        }
        TypeKind::Strct(s) => {
            for g in &mut s.generics {
                substitute_generics(g, idents, bound);
            }
        }
        _ => {}
    }
}

/// Unifies a declared parameter shape against the shape of a concrete
/// argument kind, learning a substitution for each generic identifier.
/// Walked parameter slots are rewritten in place so subsequent checks use
/// the substituted kinds.
pub(crate) struct DynamicTypeAnnotation<'a> {
    pub s: &'a mut Sema,
    /// Generic idents of the function declaration.
    pub idents: &'a [String],
    /// Binding vector of the call-site instance.
    pub generics: &'a mut [Option<TypeKind>],
    pub error_token: &'a Token,
}

impl DynamicTypeAnnotation<'_> {
    pub fn annotate(&mut self, slot: &mut TypeKind, concrete: &TypeKind) -> bool {
        self.annotate_kind(slot, concrete)
    }

    fn annotate_kind(&mut self, slot: &mut TypeKind, k: &TypeKind) -> bool {
        match slot {
            TypeKind::Generic(_) => self.annotate_generic(slot, k),
            TypeKind::Slc(elem) => match k {
                TypeKind::Slc(kelem) => self.annotate_kind(elem, kelem),
                _ => false,
            },
            TypeKind::Map(m) => match k {
                TypeKind::Map(km) => {
                    self.annotate_kind(&mut m.key, &km.key) && self.annotate_kind(&mut m.val, &km.val)
                }
                _ => false,
            },
            TypeKind::Fn(f) => self.annotate_fn(f, k),
            // Any other shape is not descended; compatibility is decided
            // later by the assignment check after substitution.
            _ => true,
        }
    }

    fn annotate_generic(&mut self, slot: &mut TypeKind, k: &TypeKind) -> bool {
        let TypeKind::Generic(ident) = slot else {
            return false;
        };
        let Some(i) = self.idents.iter().position(|g| g == ident.as_str()) else {
            return false;
        };

        match &self.generics[i] {
            None => {
                if let TypeKind::Enm(_) = k {
                    self.s
                        .push_err(self.error_token, "enum_not_supports_as_generic", vec![]);
                }
                self.generics[i] = Some(k.clone());
            }
            // Already bound to a different kind; incompatible.
            Some(bound) if bound != k => return false,
            Some(_) => {}
        }

        *slot = k.clone();
        true
    }

    fn annotate_fn(&mut self, pf: &mut FnIns, k: &TypeKind) -> bool {
        let TypeKind::Fn(f) = k else {
            return false;
        };
        if pf.params.len() != f.params.len() || pf.result.is_none() != f.result.is_none() {
            return false;
        }

        let mut ok = true;
        for (pp, ap) in pf.params.iter_mut().zip(f.params.iter()) {
            ok = self.annotate_kind(&mut pp.kind, &ap.kind) && ok;
        }
        if let (Some(pr), Some(ar)) = (&mut pf.result, &f.result) {
            ok = self.annotate_kind(pr, ar) && ok;
        }
        ok
    }
}
