use std::collections::HashMap;

use tracing::{debug, info};

use crate::{
    ast,
    config::Config,
    error::{Diag, Diagnostics},
    sema::{
        AliasDecl, AliasId, CheckState, EnumDecl, EnumId, FnDecl, FnId, FnIns, ParamDecl,
        StructDecl, StructId, SymbolRef, TraitDecl, TraitId, TraitMethod, TypeKind,
    },
    token::Token,
    types::Prim,
};

/// A semantic checking session. Owns the declaration arenas, the symbol
/// tables and the diagnostic buffer for one translation unit. All checks
/// are synchronous; a failed check appends a diagnostic and the walk
/// continues so downstream diagnostics stay informative.
pub struct Sema {
    pub config: Config,

    pub(crate) aliases: Vec<AliasDecl>,
    pub(crate) structs: Vec<StructDecl>,
    pub(crate) enums: Vec<EnumDecl>,
    pub(crate) traits: Vec<TraitDecl>,
    pub(crate) fns: Vec<FnDecl>,

    /// Package-scope symbols by ident.
    symbols: HashMap<String, SymbolRef>,
    /// Symbols linked from cpp headers, in their own namespace.
    cpp_symbols: HashMap<String, SymbolRef>,
    /// Registration order, preserved for deterministic checking.
    order: Vec<SymbolRef>,

    diags: Diagnostics,
}

impl Sema {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            aliases: Vec::new(),
            structs: Vec::new(),
            enums: Vec::new(),
            traits: Vec::new(),
            fns: Vec::new(),
            symbols: HashMap::new(),
            cpp_symbols: HashMap::new(),
            order: Vec::new(),
            diags: Diagnostics::new(),
        }
    }

    // ---------------------------- Diagnostics ---------------------------- //

    pub(crate) fn push_err(&mut self, token: &Token, key: &'static str, args: Vec<String>) {
        debug!("error '{}' at {}:{}", key, token.path, token.row + 1);
        self.diags.push(Diag::error(token, key, args));
    }

    pub fn diags(&self) -> &Diagnostics {
        &self.diags
    }

    pub fn into_diags(self) -> Diagnostics {
        self.diags
    }

    /// A translation unit with any error is failed; the emitter refuses
    /// to run on it.
    pub fn failed(&self) -> bool {
        !self.diags.is_empty()
    }

    // ---------------------------- Registration ---------------------------- //

    fn register_symbol(&mut self, token: &Token, ident: &str, cpp_linked: bool, sym: SymbolRef) -> bool {
        let exists = if cpp_linked {
            self.cpp_symbols.contains_key(ident)
        } else {
            self.symbols.contains_key(ident)
        };
        if exists {
            self.push_err(token, "exist_id", vec![ident.to_owned()]);
            return false;
        }
        if cpp_linked {
            self.cpp_symbols.insert(ident.to_owned(), sym);
        } else {
            self.symbols.insert(ident.to_owned(), sym);
        }
        self.order.push(sym);
        true
    }

    pub fn register_alias(&mut self, node: ast::AliasDeclNode) -> Option<AliasId> {
        let id = self.aliases.len();
        if !self.register_symbol(&node.token, &node.ident, node.cpp_linked, SymbolRef::Alias(id)) {
            return None;
        }
        debug!("declaring alias: {}", node.ident);
        self.aliases.push(AliasDecl {
            token: node.token,
            ident: node.ident,
            public: node.public,
            cpp_linked: node.cpp_linked,
            decl: node.kind,
            state: CheckState::Fresh,
            kind: None,
        });
        Some(id)
    }

    pub fn register_struct(&mut self, node: ast::StructDeclNode) -> Option<StructId> {
        let id = self.structs.len();
        if !self.register_symbol(&node.token, &node.ident, node.cpp_linked, SymbolRef::Struct(id)) {
            return None;
        }
        debug!("declaring struct: {}", node.ident);

        let fields = node
            .fields
            .into_iter()
            .map(|f| crate::sema::FieldDecl {
                token: f.token,
                ident: f.ident,
                public: f.public,
                mutable: f.mutable,
                decl: f.kind,
                kind: None,
            })
            .collect();

        self.structs.push(StructDecl {
            token: node.token,
            ident: node.ident,
            public: node.public,
            cpp_linked: node.cpp_linked,
            generics: node.generics,
            fields,
            methods: Vec::new(),
            implement_idents: node.implements,
            implements: Vec::new(),
            state: CheckState::Fresh,
        });

        for method in node.methods {
            let fid = self.register_method(id, method);
            self.structs[id].methods.push(fid);
        }

        Some(id)
    }

    fn register_method(&mut self, owner: StructId, node: ast::FnDeclNode) -> FnId {
        let id = self.fns.len();
        debug!("declaring method: {}.{}", self.structs[owner].ident, node.ident);
        self.fns.push(Self::fn_decl_of(node, true, Some(owner)));
        id
    }

    pub fn register_fn(&mut self, node: ast::FnDeclNode) -> Option<FnId> {
        let id = self.fns.len();
        if !self.register_symbol(&node.token, &node.ident, node.cpp_linked, SymbolRef::Fn(id)) {
            return None;
        }
        debug!("declaring function: {}", node.ident);
        self.fns.push(Self::fn_decl_of(node, false, None));
        Some(id)
    }

    fn fn_decl_of(node: ast::FnDeclNode, is_method: bool, owner: Option<StructId>) -> FnDecl {
        FnDecl {
            token: node.token,
            ident: node.ident,
            public: node.public,
            cpp_linked: node.cpp_linked,
            is_method,
            owner,
            generics: node.generics,
            params: node
                .params
                .into_iter()
                .map(|p| ParamDecl {
                    token: p.token,
                    ident: p.ident,
                    mutable: p.mutable,
                    variadic: p.variadic,
                    self_param: p.self_param,
                    reference: p.reference,
                    decl: p.kind,
                })
                .collect(),
            result: node.result,
            result_idents: node.result_idents,
            state: CheckState::Fresh,
            ins: None,
        }
    }

    pub fn register_enum(&mut self, node: ast::EnumDeclNode) -> Option<EnumId> {
        let id = self.enums.len();
        if !self.register_symbol(&node.token, &node.ident, false, SymbolRef::Enum(id)) {
            return None;
        }
        debug!("declaring enum: {}", node.ident);
        self.enums.push(EnumDecl {
            token: node.token,
            ident: node.ident,
            public: node.public,
            decl: node.kind,
            kind: Prim::Int,
            items: node.items,
            state: CheckState::Fresh,
        });
        Some(id)
    }

    pub fn register_trait(&mut self, node: ast::TraitDeclNode) -> Option<TraitId> {
        let id = self.traits.len();
        if !self.register_symbol(&node.token, &node.ident, false, SymbolRef::Trait(id)) {
            return None;
        }
        debug!("declaring trait: {}", node.ident);
        self.traits.push(TraitDecl {
            token: node.token,
            ident: node.ident,
            public: node.public,
            methods: node
                .methods
                .into_iter()
                .map(|m| TraitMethod {
                    token: m.token,
                    ident: m.ident,
                    ref_receiver: m.ref_receiver,
                })
                .collect(),
            state: CheckState::Fresh,
        });
        Some(id)
    }

    // ---------------------------- Lookup ---------------------------- //

    /// Resolve an identifier against the package symbol tables. Generics
    /// and local aliases are resolved by the builder's scope before this.
    pub fn find_symbol(&self, ident: &str, cpp_linked: bool) -> Option<SymbolRef> {
        if cpp_linked {
            return self.cpp_symbols.get(ident).copied();
        }
        self.symbols
            .get(ident)
            .or_else(|| self.cpp_symbols.get(ident))
            .copied()
    }

    pub fn alias(&self, id: AliasId) -> &AliasDecl {
        &self.aliases[id]
    }

    pub(crate) fn alias_mut(&mut self, id: AliasId) -> &mut AliasDecl {
        &mut self.aliases[id]
    }

    pub fn struct_decl(&self, id: StructId) -> &StructDecl {
        &self.structs[id]
    }

    pub fn enum_decl(&self, id: EnumId) -> &EnumDecl {
        &self.enums[id]
    }

    pub fn trait_decl(&self, id: TraitId) -> &TraitDecl {
        &self.traits[id]
    }

    pub fn fn_decl(&self, id: FnId) -> &FnDecl {
        &self.fns[id]
    }

    /// Clone of the declaration instance of a function, ready for a call
    /// site. The returned instance owns its generic binding vector.
    pub fn fn_ins(&self, id: FnId) -> Option<FnIns> {
        self.fns[id].ins.clone()
    }

    pub fn struct_implements(&self, s: StructId, t: TraitId) -> bool {
        self.structs[s].implements.contains(&t)
    }

    // ---------------------------- Check pass ---------------------------- //

    /// Validate every registered declaration in registration order, then
    /// run declaration-level completeness checks. Reports whether the
    /// translation unit is error free.
    pub fn check(&mut self) -> bool {
        info!("checking {} declarations", self.order.len());

        for sym in self.order.clone() {
            match sym {
                SymbolRef::Alias(id) => self.check_alias_decl(id),
                SymbolRef::Struct(id) => self.check_struct_decl(id),
                SymbolRef::Enum(id) => self.check_enum_decl(id),
                SymbolRef::Trait(id) => self.check_trait_decl(id),
                SymbolRef::Fn(id) => self.check_fn_decl(id),
            }
        }

        // Methods are not package symbols and get checked through their
        // owner; sweep any the owner pass missed.
        for id in 0..self.fns.len() {
            self.check_fn_decl(id);
        }

        for id in 0..self.structs.len() {
            self.check_impls(id);
        }

        if self.config.dump_symbols {
            info!("{}", self.dump_symbols());
        }

        !self.failed()
    }

    /// Resolve declared trait impls of a struct and verify each trait
    /// method has an implementation.
    fn check_impls(&mut self, id: StructId) {
        for i in 0..self.structs[id].implement_idents.len() {
            let token = self.structs[id].implement_idents[i].clone();
            let tid = match self.find_symbol(&token.lexeme, false) {
                Some(SymbolRef::Trait(tid)) => tid,
                _ => {
                    self.push_err(&token, "ident_not_exist", vec![token.lexeme.clone()]);
                    continue;
                }
            };
            self.structs[id].implements.push(tid);

            for m in 0..self.traits[tid].methods.len() {
                let method_ident = self.traits[tid].methods[m].ident.clone();
                let implemented = self.structs[id]
                    .methods
                    .iter()
                    .any(|&fid| self.fns[fid].ident == method_ident);
                if !implemented {
                    let trait_ident = self.traits[tid].ident.clone();
                    let token = self.structs[id].token.clone();
                    self.push_err(&token, "not_impl_trait_def", vec![trait_ident, method_ident]);
                }
            }
        }
    }

    /// Deterministic dump of all declarations and their resolved kinds.
    pub fn dump_symbols(&self) -> String {
        let mut s = String::new();
        s += "| Symbols\n";
        s += "|-------------------------------\n";
        for sym in &self.order {
            let line = match *sym {
                SymbolRef::Alias(id) => {
                    let a = &self.aliases[id];
                    format!(
                        "alias  {} = {}",
                        a.ident,
                        a.kind
                            .as_ref()
                            .map_or("<invalid>".to_string(), |k| k.to_string())
                    )
                }
                SymbolRef::Struct(id) => {
                    let d = &self.structs[id];
                    format!("struct {} ({} fields)", d.ident, d.fields.len())
                }
                SymbolRef::Enum(id) => {
                    let d = &self.enums[id];
                    format!("enum   {}: {}", d.ident, d.kind)
                }
                SymbolRef::Trait(id) => {
                    let d = &self.traits[id];
                    format!("trait  {} ({} methods)", d.ident, d.methods.len())
                }
                SymbolRef::Fn(id) => {
                    let d = &self.fns[id];
                    format!(
                        "fn     {} {}",
                        d.ident,
                        d.ins.as_ref().map_or("<invalid>".to_string(), |ins| {
                            TypeKind::Fn(ins.clone()).to_string()
                        })
                    )
                }
            };
            s += &format!("| {}\n", line);
        }
        s
    }
}
