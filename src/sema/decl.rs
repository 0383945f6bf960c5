use crate::{ast, sema::FnIns, sema::TypeKind, token::Token, types::Prim};

pub type AliasId = usize;
pub type StructId = usize;
pub type EnumId = usize;
pub type TraitId = usize;
pub type FnId = usize;

/// Tri-color state of a declaration's validation. Visiting an InCheck
/// declaration again signals a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Fresh,
    InCheck,
    Checked,
}

/// Type alias declaration.
#[derive(Debug)]
pub struct AliasDecl {
    pub token: Token,
    pub ident: String,
    pub public: bool,
    pub cpp_linked: bool,
    /// Syntactic right-hand side.
    pub decl: ast::TypeDecl,
    pub state: CheckState,
    /// Built kind; absent until checked, and kept absent after a failed
    /// build so later references report instead of re-walking.
    pub kind: Option<TypeKind>,
}

#[derive(Debug)]
pub struct FieldDecl {
    pub token: Token,
    pub ident: String,
    pub public: bool,
    pub mutable: bool,
    pub decl: ast::TypeDecl,
    pub kind: Option<TypeKind>,
}

#[derive(Debug)]
pub struct StructDecl {
    pub token: Token,
    pub ident: String,
    pub public: bool,
    pub cpp_linked: bool,
    pub generics: Vec<String>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<FnId>,
    /// Trait idents as declared; resolved during checking.
    pub implement_idents: Vec<Token>,
    pub implements: Vec<TraitId>,
    pub state: CheckState,
}

impl StructDecl {
    pub fn find_field(&self, ident: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.ident == ident)
    }

    pub fn has_ref_field(&self) -> bool {
        self.fields
            .iter()
            .any(|f| matches!(f.kind, Some(TypeKind::Ref(_))))
    }
}

#[derive(Debug)]
pub struct EnumDecl {
    pub token: Token,
    pub ident: String,
    pub public: bool,
    /// Syntactic underlying kind; defaults to `int` when absent.
    pub decl: Option<ast::TypeDecl>,
    /// Resolved underlying primitive kind.
    pub kind: Prim,
    pub items: Vec<Token>,
    pub state: CheckState,
}

#[derive(Debug)]
pub struct TraitDecl {
    pub token: Token,
    pub ident: String,
    pub public: bool,
    pub methods: Vec<TraitMethod>,
    pub state: CheckState,
}

#[derive(Debug)]
pub struct TraitMethod {
    pub token: Token,
    pub ident: String,
    pub ref_receiver: bool,
}

impl TraitDecl {
    pub fn has_reference_receiver(&self) -> bool {
        self.methods.iter().any(|m| m.ref_receiver)
    }
}

#[derive(Debug)]
pub struct FnDecl {
    pub token: Token,
    pub ident: String,
    pub public: bool,
    pub cpp_linked: bool,
    pub is_method: bool,
    /// Owning struct for methods.
    pub owner: Option<StructId>,
    pub generics: Vec<String>,
    pub params: Vec<ParamDecl>,
    pub result: Option<ast::TypeDecl>,
    /// Idents of named result variables; empty when results are unnamed.
    pub result_idents: Vec<String>,
    pub state: CheckState,
    /// Declaration instance with unbound generics. Call sites clone it so
    /// each call owns its generic binding vector.
    pub ins: Option<FnIns>,
}

impl FnDecl {
    /// Reports whether any result variable carries a real name.
    pub fn any_result_var(&self) -> bool {
        self.result_idents.iter().any(|ident| ident != "_")
    }
}

#[derive(Debug)]
pub struct ParamDecl {
    pub token: Token,
    pub ident: String,
    pub mutable: bool,
    pub variadic: bool,
    pub self_param: bool,
    pub reference: bool,
    pub decl: Option<ast::TypeDecl>,
}

/// Reference to a registered declaration, in lookup priority order the
/// session resolves identifiers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolRef {
    Alias(AliasId),
    Struct(StructId),
    Enum(EnumId),
    Trait(TraitId),
    Fn(FnId),
}
