use crate::token::Token;

/// A syntactic type declaration as produced by the parser. Every node
/// carries a token so the semantic core can anchor diagnostics.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub token: Token,
    pub kind: TypeExpr,
}

#[derive(Debug, Clone)]
pub enum TypeExpr {
    /// Identifier with optional generic arguments: `int`, `Pair[str, int]`.
    Ident(IdentExpr),
    /// `&T`
    Ref(Box<TypeDecl>),
    /// `*T`, or `*unsafe` when no element is given.
    Ptr(Option<Box<TypeDecl>>),
    /// `[]T`
    Slice(Box<TypeDecl>),
    /// `[N]T`
    Array(ArrayExpr),
    /// `[K:V]`
    Map(Box<TypeDecl>, Box<TypeDecl>),
    /// `(T1, T2, ...)`
    Tuple(Vec<TypeDecl>),
    /// `fn(...)` with optional result
    Func(FuncExpr),
}

#[derive(Debug, Clone)]
pub struct IdentExpr {
    pub ident: String,
    /// True for identifiers resolved through the cpp-linked namespace.
    pub cpp_linked: bool,
    pub generics: Vec<TypeDecl>,
}

#[derive(Debug, Clone)]
pub struct ArrayExpr {
    pub elem: Box<TypeDecl>,
    /// Compile-time size; None when left to inference.
    pub size: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct FuncExpr {
    pub params: Vec<ParamExpr>,
    pub result: Option<Box<TypeDecl>>,
}

#[derive(Debug, Clone)]
pub struct ParamExpr {
    pub ident: String,
    pub mutable: bool,
    pub variadic: bool,
    pub kind: TypeDecl,
}

/// Type alias declaration: `type Ident = T`.
#[derive(Debug, Clone)]
pub struct AliasDeclNode {
    pub token: Token,
    pub ident: String,
    pub public: bool,
    pub cpp_linked: bool,
    pub kind: TypeDecl,
}

/// Struct declaration with its fields, methods and implemented traits.
#[derive(Debug, Clone)]
pub struct StructDeclNode {
    pub token: Token,
    pub ident: String,
    pub public: bool,
    pub cpp_linked: bool,
    pub generics: Vec<String>,
    pub fields: Vec<FieldNode>,
    pub methods: Vec<FnDeclNode>,
    /// Idents of traits this struct declares to implement.
    pub implements: Vec<Token>,
}

#[derive(Debug, Clone)]
pub struct FieldNode {
    pub token: Token,
    pub ident: String,
    pub public: bool,
    pub mutable: bool,
    pub kind: TypeDecl,
}

/// Enum declaration. The underlying kind defaults to `int` when absent.
#[derive(Debug, Clone)]
pub struct EnumDeclNode {
    pub token: Token,
    pub ident: String,
    pub public: bool,
    pub kind: Option<TypeDecl>,
    pub items: Vec<Token>,
}

#[derive(Debug, Clone)]
pub struct TraitDeclNode {
    pub token: Token,
    pub ident: String,
    pub public: bool,
    pub methods: Vec<TraitMethodNode>,
}

#[derive(Debug, Clone)]
pub struct TraitMethodNode {
    pub token: Token,
    pub ident: String,
    /// True when the method declares its receiver by reference.
    pub ref_receiver: bool,
}

/// Function declaration. Methods carry a leading self parameter.
#[derive(Debug, Clone)]
pub struct FnDeclNode {
    pub token: Token,
    pub ident: String,
    pub public: bool,
    pub cpp_linked: bool,
    pub generics: Vec<String>,
    pub params: Vec<ParamNode>,
    pub result: Option<TypeDecl>,
    /// Idents of named result variables; empty when results are unnamed.
    pub result_idents: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ParamNode {
    pub token: Token,
    pub ident: String,
    pub mutable: bool,
    pub variadic: bool,
    pub self_param: bool,
    /// True for `&self` receivers.
    pub reference: bool,
    /// Absent only for self parameters.
    pub kind: Option<TypeDecl>,
}
