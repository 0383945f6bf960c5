use crate::{
    sema::{Sema, TraitIns, TypeKind},
    token::Token,
    types::types_are_compatible,
};

/// Decides whether a value of kind `src` may flow into a slot of kind
/// `dest`. Deref mode allows unwrapping a reference on the source side.
pub(crate) struct TypeCompatibilityChecker<'a> {
    pub s: &'a mut Sema,
    pub error_token: &'a Token,
    pub deref: bool,
    /// Set when a specific diagnostic was already pushed so the caller
    /// does not stack a generic incompatibility on top.
    pub error_logged: bool,
}

impl TypeCompatibilityChecker<'_> {
    pub fn check(&mut self, dest: &TypeKind, src: &TypeKind) -> bool {
        if let TypeKind::Ref(_) = dest {
            return self.check_ref(dest, src);
        }
        // Trait admission must see a reference-wrapped source to apply
        // the receiver rule, so it dispatches before the deref unwrap.
        if let TypeKind::Trt(t) = dest {
            return self.check_trait(t, src);
        }

        let src = match src {
            TypeKind::Ref(elem) if self.deref => elem.as_ref(),
            _ => src,
        };

        match dest {
            TypeKind::Ptr(p) => src.is_nil() || p.is_unsafe() || dest == src,
            TypeKind::Slc(_) | TypeKind::Map(_) | TypeKind::Fn(_) => src.is_nil() || dest == src,
            TypeKind::Arr(darr) => match src {
                TypeKind::Arr(sarr) => darr.n == sarr.n && self.check(&darr.elem, &sarr.elem),
                _ => false,
            },
            TypeKind::Enm(de) => matches!(src, TypeKind::Enm(se) if se.decl == de.decl),
            TypeKind::Strct(ds) => match src {
                TypeKind::Strct(ss) => ds.decl == ss.decl && ds.generics == ss.generics,
                _ => false,
            },
            TypeKind::Nil => src.is_nil(),
            TypeKind::Prim(dp) => match src {
                TypeKind::Prim(sp) => types_are_compatible(*dp, *sp, self.s.config.ignore_any),
                _ => false,
            },
            // Generics and tuples compare structurally.
            _ => dest == src,
        }
    }

    fn check_ref(&mut self, dest: &TypeKind, src: &TypeKind) -> bool {
        if dest == src {
            return true;
        }
        if !self.deref {
            return false;
        }
        let TypeKind::Ref(delem) = dest else {
            return false;
        };
        match src {
            TypeKind::Ref(selem) => self.check(dest, selem),
            _ => self.check(delem, src),
        }
    }

    fn check_trait(&mut self, t: &TraitIns, src: &TypeKind) -> bool {
        if src.is_nil() {
            return true;
        }

        let (src, by_ref) = match src {
            TypeKind::Ref(elem) => (elem.as_ref(), true),
            _ => (src, false),
        };

        match src {
            TypeKind::Strct(si) => {
                if !self.s.struct_implements(si.decl, t.decl) {
                    return false;
                }
                if self.s.trait_decl(t.decl).has_reference_receiver() && !by_ref {
                    self.s.push_err(
                        self.error_token,
                        "trait_has_reference_parametered_function",
                        vec![],
                    );
                    self.error_logged = true;
                    return false;
                }
                true
            }
            TypeKind::Trt(ti) => ti.decl == t.decl,
            _ => false,
        }
    }
}

impl Sema {
    /// Structural compatibility entry point. Reports incompatible_types on
    /// failure unless a more specific diagnostic was already pushed.
    pub fn check_type_compatibility(
        &mut self,
        dest: &TypeKind,
        src: &TypeKind,
        error_token: &Token,
        deref: bool,
    ) -> bool {
        let (ok, logged) = {
            let mut tcc = TypeCompatibilityChecker {
                s: self,
                error_token,
                deref,
                error_logged: false,
            };
            (tcc.check(dest, src), tcc.error_logged)
        };

        if !ok && !logged {
            self.push_err(
                error_token,
                "incompatible_types",
                vec![dest.to_string(), src.to_string()],
            );
        }
        ok
    }
}
