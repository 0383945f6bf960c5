use tracing::debug;

use crate::{
    ast,
    sema::{
        substitute_generics, AliasId, Arr, CheckState, EnumIns, FnId, FnIns, Map, ParamIns, Ptr,
        Sema, StructId, StructIns, SymbolRef, TraitIns, TypeKind,
    },
    token::Token,
    types::Prim,
};

/// Identifier scope visible while building a type declaration: the generic
/// parameter idents of the enclosing declaration and any function-local
/// aliases. Package symbols and cpp-linked symbols come after these in
/// lookup order.
#[derive(Debug, Clone)]
pub struct Scope {
    pub generics: Vec<String>,
    pub aliases: Vec<AliasId>,
}

impl Scope {
    pub fn empty() -> Scope {
        Scope {
            generics: Vec::new(),
            aliases: Vec::new(),
        }
    }

    pub fn generics(generics: Vec<String>) -> Scope {
        Scope {
            generics,
            aliases: Vec::new(),
        }
    }
}

/// Lowers syntactic type declarations to kinds. Detects declaration cycles
/// with the tri-color state on each declaration: reaching an in-check
/// declaration by value is a cycle, reaching it behind an indirection
/// (reference, pointer, slice, map, function) is not.
pub(crate) struct TypeBuilder<'a> {
    s: &'a mut Sema,
    scope: Scope,
    error_token: Token,
    indirections: usize,
}

impl<'a> TypeBuilder<'a> {
    pub fn new(s: &'a mut Sema, scope: Scope) -> TypeBuilder<'a> {
        TypeBuilder {
            s,
            scope,
            error_token: Token::default(),
            indirections: 0,
        }
    }

    fn push_err(&mut self, key: &'static str, args: Vec<String>) {
        let token = self.error_token.clone();
        self.s.push_err(&token, key, args);
    }

    /// Build a kind from a syntactic declaration, anchoring diagnostics at
    /// the declaration's token. Returns None after reporting on failure.
    pub fn build(&mut self, decl: &ast::TypeDecl) -> Option<TypeKind> {
        let saved = std::mem::replace(&mut self.error_token, decl.token.clone());
        let kind = self.build_kind(&decl.kind);
        self.error_token = saved;
        kind
    }

    fn build_kind(&mut self, expr: &ast::TypeExpr) -> Option<TypeKind> {
        match expr {
            ast::TypeExpr::Ident(decl) => self.build_ident(decl),
            ast::TypeExpr::Ref(elem) => self.build_ref(elem),
            ast::TypeExpr::Ptr(elem) => self.build_ptr(elem.as_deref()),
            ast::TypeExpr::Slice(elem) => self.build_slice(elem),
            ast::TypeExpr::Array(arr) => self.build_array(arr),
            ast::TypeExpr::Map(key, val) => self.build_map(key, val),
            ast::TypeExpr::Tuple(types) => self.build_tuple(types),
            ast::TypeExpr::Func(f) => self.build_fn(f),
        }
    }

    // ---------------------------- Identifiers ---------------------------- //

    fn build_ident(&mut self, decl: &ast::IdentExpr) -> Option<TypeKind> {
        if let Some(p) = Prim::from_ident(&decl.ident) {
            if !decl.generics.is_empty() {
                self.push_err("type_not_supports_generics", vec![decl.ident.clone()]);
                return None;
            }
            return Some(TypeKind::Prim(p));
        }

        if self.scope.generics.iter().any(|g| g == &decl.ident) {
            if !decl.generics.is_empty() {
                self.push_err("type_not_supports_generics", vec![decl.ident.clone()]);
                return None;
            }
            return Some(TypeKind::Generic(decl.ident.clone()));
        }

        let local_alias = self
            .scope
            .aliases
            .iter()
            .copied()
            .find(|&id| self.s.alias(id).ident == decl.ident);

        let sym = local_alias
            .map(SymbolRef::Alias)
            .or_else(|| self.s.find_symbol(&decl.ident, decl.cpp_linked));

        match sym {
            Some(SymbolRef::Alias(id)) => {
                if !decl.generics.is_empty() {
                    self.push_err("type_not_supports_generics", vec![decl.ident.clone()]);
                    return None;
                }
                self.build_alias(id)
            }
            Some(SymbolRef::Struct(id)) => self.build_struct(id, &decl.generics),
            Some(SymbolRef::Enum(id)) => {
                if !decl.generics.is_empty() {
                    self.push_err("type_not_supports_generics", vec![decl.ident.clone()]);
                    return None;
                }
                self.build_enum(id)
            }
            Some(SymbolRef::Trait(id)) => {
                if !decl.generics.is_empty() {
                    self.push_err("type_not_supports_generics", vec![decl.ident.clone()]);
                    return None;
                }
                self.s.check_trait_decl(id);
                Some(TypeKind::Trt(TraitIns {
                    decl: id,
                    ident: self.s.trait_decl(id).ident.clone(),
                }))
            }
            Some(SymbolRef::Fn(id)) => self.build_fn_ident(id, &decl.generics),
            None => {
                self.push_err("invalid_type", vec![]);
                None
            }
        }
    }

    /// Resolve an alias to its kind, building it if this is the first
    /// visit. Reaching an alias that is already being built is a cycle.
    pub(crate) fn build_alias(&mut self, id: AliasId) -> Option<TypeKind> {
        match self.s.alias(id).state {
            CheckState::InCheck => {
                let ident = self.s.alias(id).ident.clone();
                self.push_err("illegal_cycle_in_declaration", vec![ident]);
                None
            }
            CheckState::Checked => match self.s.alias(id).kind.clone() {
                Some(kind) => Some(kind),
                None => {
                    // Broken declaration; reported at its own site already.
                    self.push_err("invalid_type", vec![]);
                    None
                }
            },
            CheckState::Fresh => {
                debug!("building alias: {}", self.s.alias(id).ident);
                self.s.alias_mut(id).state = CheckState::InCheck;
                let rhs = self.s.alias(id).decl.clone();

                // Alias right-hand sides see no local generics.
                let saved = std::mem::replace(&mut self.scope, Scope::empty());
                let kind = self.build(&rhs);
                self.scope = saved;

                self.s.alias_mut(id).kind = kind.clone();
                self.s.alias_mut(id).state = CheckState::Checked;
                kind
            }
        }
    }

    fn build_struct(&mut self, id: StructId, generics: &[ast::TypeDecl]) -> Option<TypeKind> {
        match self.s.struct_decl(id).state {
            CheckState::InCheck if self.indirections == 0 => {
                let ident = self.s.struct_decl(id).ident.clone();
                self.push_err("illegal_cycle_in_declaration", vec![ident]);
                return None;
            }
            CheckState::InCheck | CheckState::Checked => {}
            CheckState::Fresh => self.s.check_struct_decl(id),
        }

        let ident = self.s.struct_decl(id).ident.clone();
        let expected = self.s.struct_decl(id).generics.len();
        if generics.len() > expected {
            self.push_err("generics_overflow", vec![]);
            return None;
        }
        if generics.len() < expected {
            self.push_err("missing_generics", vec![]);
            return None;
        }

        let mut bound = Vec::with_capacity(generics.len());
        for g in generics {
            bound.push(self.build(g)?);
        }

        Some(TypeKind::Strct(StructIns {
            decl: id,
            ident,
            generics: bound,
        }))
    }

    fn build_enum(&mut self, id: usize) -> Option<TypeKind> {
        self.s.check_enum_decl(id);
        Some(TypeKind::Enm(EnumIns {
            decl: id,
            ident: self.s.enum_decl(id).ident.clone(),
        }))
    }

    fn build_fn_ident(&mut self, id: FnId, generics: &[ast::TypeDecl]) -> Option<TypeKind> {
        match self.s.fn_decl(id).state {
            CheckState::InCheck => {
                let ident = self.s.fn_decl(id).ident.clone();
                self.push_err("illegal_cycle_in_declaration", vec![ident]);
                return None;
            }
            CheckState::Fresh => self.s.check_fn_decl(id),
            CheckState::Checked => {}
        }

        let Some(mut ins) = self.s.fn_decl(id).ins.clone() else {
            self.push_err("invalid_type", vec![]);
            return None;
        };

        let idents = self.s.fn_decl(id).generics.clone();
        if generics.len() > idents.len() {
            self.push_err("generics_overflow", vec![]);
            return None;
        }
        // A bare reference to a generic function stays unbound so a call
        // site can annotate it dynamically.
        if !generics.is_empty() && generics.len() < idents.len() {
            self.push_err("missing_generics", vec![]);
            return None;
        }

        if !generics.is_empty() {
            for (i, g) in generics.iter().enumerate() {
                ins.generics[i] = Some(self.build(g)?);
            }
            for p in &mut ins.params {
                substitute_generics(&mut p.kind, &idents, &ins.generics);
            }
            if let Some(result) = &mut ins.result {
                substitute_generics(result, &idents, &ins.generics);
            }
        }

        Some(TypeKind::Fn(ins))
    }

    // ---------------------------- Composites ---------------------------- //

    fn build_indirect(&mut self, decl: &ast::TypeDecl) -> Option<TypeKind> {
        self.indirections += 1;
        let kind = self.build(decl);
        self.indirections -= 1;
        kind
    }

    fn build_ref(&mut self, elem: &ast::TypeDecl) -> Option<TypeKind> {
        let elem = self.build_indirect(elem)?;
        match &elem {
            TypeKind::Ref(_) => {
                self.push_err("ref_refs_ref", vec![]);
                None
            }
            TypeKind::Ptr(_) => {
                self.push_err("ref_refs_ptr", vec![]);
                None
            }
            TypeKind::Enm(_) => {
                self.push_err("ref_refs_enum", vec![]);
                None
            }
            TypeKind::Trt(_) => {
                self.push_err("ref_refs_trait", vec![]);
                None
            }
            _ => Some(TypeKind::Ref(Box::new(elem))),
        }
    }

    fn build_ptr(&mut self, elem: Option<&ast::TypeDecl>) -> Option<TypeKind> {
        let Some(elem) = elem else {
            return Some(TypeKind::Ptr(Ptr { elem: None }));
        };
        let elem = self.build_indirect(elem)?;
        if let TypeKind::Ref(_) = elem {
            self.push_err("ptr_points_ref", vec![]);
            return None;
        }
        Some(TypeKind::Ptr(Ptr {
            elem: Some(Box::new(elem)),
        }))
    }

    fn build_slice(&mut self, elem: &ast::TypeDecl) -> Option<TypeKind> {
        let elem = self.build_indirect(elem)?;
        Some(TypeKind::Slc(Box::new(elem)))
    }

    fn build_array(&mut self, arr: &ast::ArrayExpr) -> Option<TypeKind> {
        let Some(n) = arr.size else {
            self.push_err("auto_sized_array", vec![]);
            return None;
        };
        if n < 0 {
            self.push_err("invalid_numeric_range", vec![]);
            return None;
        }
        let elem = self.build(&arr.elem)?;
        Some(TypeKind::Arr(Arr {
            elem: Box::new(elem),
            n: n as usize,
        }))
    }

    fn build_map(&mut self, key: &ast::TypeDecl, val: &ast::TypeDecl) -> Option<TypeKind> {
        let key = self.build_indirect(key)?;
        if !self.s.supports_equality(&key) {
            self.push_err("invalid_map_key_type", vec![key.to_string()]);
            return None;
        }
        let val = self.build_indirect(val)?;
        Some(TypeKind::Map(Box::new(Map { key, val })))
    }

    fn build_tuple(&mut self, types: &[ast::TypeDecl]) -> Option<TypeKind> {
        if types.len() < 2 {
            self.push_err("invalid_type", vec![]);
            return None;
        }
        let mut kinds = Vec::with_capacity(types.len());
        for t in types {
            kinds.push(self.build(t)?);
        }
        Some(TypeKind::Tup(kinds))
    }

    fn build_fn(&mut self, f: &ast::FuncExpr) -> Option<TypeKind> {
        self.indirections += 1;
        let kind = self.build_fn_expr(f);
        self.indirections -= 1;
        kind
    }

    fn build_fn_expr(&mut self, f: &ast::FuncExpr) -> Option<TypeKind> {
        let mut params = Vec::with_capacity(f.params.len());
        for (i, p) in f.params.iter().enumerate() {
            if p.variadic && i + 1 != f.params.len() {
                self.push_err("variadic_parameter_not_last", vec![]);
                return None;
            }
            let kind = self.build(&p.kind)?;
            params.push(ParamIns {
                ident: p.ident.clone(),
                mutable: p.mutable,
                variadic: p.variadic,
                self_param: false,
                kind,
            });
        }

        let result = match &f.result {
            Some(decl) => Some(Box::new(self.build(decl)?)),
            None => None,
        };

        Some(TypeKind::Fn(FnIns {
            decl: None,
            builtin: false,
            generics: Vec::new(),
            params,
            result,
        }))
    }
}

impl Sema {
    /// Lower a syntactic type declaration to its kind under the given
    /// scope. The single entry point for all kind construction.
    pub fn build_type(&mut self, decl: &ast::TypeDecl, scope: Scope) -> Option<TypeKind> {
        TypeBuilder::new(self, scope).build(decl)
    }

    pub(crate) fn check_alias_decl(&mut self, id: AliasId) {
        if self.aliases[id].state != CheckState::Fresh {
            return;
        }
        let _ = TypeBuilder::new(self, Scope::empty()).build_alias(id);
    }

    pub(crate) fn check_struct_decl(&mut self, id: StructId) {
        if self.structs[id].state != CheckState::Fresh {
            return;
        }
        debug!("checking struct: {}", self.structs[id].ident);
        self.structs[id].state = CheckState::InCheck;

        let scope = Scope::generics(self.structs[id].generics.clone());
        for i in 0..self.structs[id].fields.len() {
            let decl = self.structs[id].fields[i].decl.clone();
            let kind = self.build_type(&decl, scope.clone());
            self.structs[id].fields[i].kind = kind;
        }

        self.structs[id].state = CheckState::Checked;
    }

    pub(crate) fn check_enum_decl(&mut self, id: usize) {
        if self.enums[id].state != CheckState::Fresh {
            return;
        }
        debug!("checking enum: {}", self.enums[id].ident);
        self.enums[id].state = CheckState::InCheck;

        if let Some(decl) = self.enums[id].decl.clone() {
            match self.build_type(&decl, Scope::empty()) {
                Some(TypeKind::Prim(p)) if p.is_int() => self.enums[id].kind = p,
                Some(_) => {
                    let token = decl.token.clone();
                    self.push_err(&token, "invalid_type", vec![]);
                }
                None => {}
            }
        }

        self.enums[id].state = CheckState::Checked;
    }

    pub(crate) fn check_trait_decl(&mut self, id: usize) {
        // Traits carry no buildable types at this level; receiver flags
        // were captured at registration.
        self.traits[id].state = CheckState::Checked;
    }

    pub(crate) fn check_fn_decl(&mut self, id: FnId) {
        if self.fns[id].state != CheckState::Fresh {
            return;
        }
        debug!("checking function: {}", self.fns[id].ident);
        self.fns[id].state = CheckState::InCheck;

        let scope = Scope::generics(self.fns[id].generics.clone());
        let mut params = Vec::new();
        let mut broken = false;

        for i in 0..self.fns[id].params.len() {
            let (token, ident, mutable, variadic, self_param, decl) = {
                let p = &self.fns[id].params[i];
                (
                    p.token.clone(),
                    p.ident.clone(),
                    p.mutable,
                    p.variadic,
                    p.self_param,
                    p.decl.clone(),
                )
            };

            if variadic && i + 1 != self.fns[id].params.len() {
                self.push_err(&token, "variadic_parameter_not_last", vec![]);
                broken = true;
                continue;
            }

            let kind = if self_param {
                Some(self.self_param_kind(id))
            } else {
                match decl {
                    Some(decl) => self.build_type(&decl, scope.clone()),
                    None => None,
                }
            };

            match kind {
                Some(kind) => params.push(ParamIns {
                    ident,
                    mutable,
                    variadic,
                    self_param,
                    kind,
                }),
                None => broken = true,
            }
        }

        let result = match self.fns[id].result.clone() {
            Some(decl) => match self.build_type(&decl, scope) {
                Some(kind) => Some(Box::new(kind)),
                None => {
                    broken = true;
                    None
                }
            },
            None => None,
        };

        if !broken {
            let n = self.fns[id].generics.len();
            self.fns[id].ins = Some(FnIns {
                decl: Some(id),
                builtin: false,
                generics: vec![None; n],
                params,
                result,
            });
        }

        self.fns[id].state = CheckState::Checked;
    }

    /// Reports whether values of the kind can be compared for equality,
    /// which map keys require. Generics are admitted; their concrete
    /// bindings are what ultimately decide.
    pub fn supports_equality(&self, kind: &TypeKind) -> bool {
        match kind {
            TypeKind::Prim(p) => *p != Prim::Any,
            TypeKind::Enm(_) | TypeKind::Generic(_) => true,
            TypeKind::Arr(arr) => self.supports_equality(&arr.elem),
            TypeKind::Tup(types) => types.iter().all(|t| self.supports_equality(t)),
            TypeKind::Strct(ins) => self.structs[ins.decl]
                .fields
                .iter()
                .all(|f| f.kind.as_ref().map_or(true, |k| self.supports_equality(k))),
            _ => false,
        }
    }

    /// Kind of a method's self parameter: the owner struct with its own
    /// generic parameters left symbolic.
    fn self_param_kind(&self, id: FnId) -> TypeKind {
        match self.fns[id].owner {
            Some(owner) => {
                let decl = &self.structs[owner];
                TypeKind::Strct(StructIns {
                    decl: owner,
                    ident: decl.ident.clone(),
                    generics: decl
                        .generics
                        .iter()
                        .map(|g| TypeKind::Generic(g.clone()))
                        .collect(),
                })
            }
            None => TypeKind::Nil,
        }
    }
}
