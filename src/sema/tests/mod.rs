mod builder_test;
mod range_test;

use crate::{
    ast,
    config::Config,
    sema::{Arr, CallArg, Const, Data, Map, Ptr, Sema, TypeKind},
    token::Token,
    types::Prim,
};

/// Fresh session for a test. Installs the log subscriber once so
/// RUST_LOG works during test runs.
pub fn sema() -> Sema {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .compact()
        .try_init();
    Sema::new(Config::test())
}

pub fn tok(lexeme: &str) -> Token {
    Token::new("test.jule", 0, 0, lexeme)
}

/// Assert the exact diagnostic key sequence of the session.
pub fn assert_keys(s: &Sema, keys: &[&str]) {
    let got: Vec<&str> = s.diags().iter().map(|d| d.key).collect();
    assert_eq!(got, keys, "diagnostics:\n{}", s.diags().render());
}

// ---------------------------- Kind helpers ---------------------------- //

pub fn prim(p: Prim) -> TypeKind {
    TypeKind::Prim(p)
}

pub fn slice_of(elem: TypeKind) -> TypeKind {
    TypeKind::Slc(Box::new(elem))
}

pub fn array_of(elem: TypeKind, n: usize) -> TypeKind {
    TypeKind::Arr(Arr {
        elem: Box::new(elem),
        n,
    })
}

pub fn map_of(key: TypeKind, val: TypeKind) -> TypeKind {
    TypeKind::Map(Box::new(Map { key, val }))
}

pub fn ref_of(elem: TypeKind) -> TypeKind {
    TypeKind::Ref(Box::new(elem))
}

pub fn ptr_of(elem: TypeKind) -> TypeKind {
    TypeKind::Ptr(Ptr {
        elem: Some(Box::new(elem)),
    })
}

pub fn unsafe_ptr() -> TypeKind {
    TypeKind::Ptr(Ptr { elem: None })
}

pub fn data(kind: TypeKind) -> Data {
    Data::new(kind)
}

pub fn const_data(kind: TypeKind, c: Const) -> Data {
    let mut d = Data::new(kind);
    d.constant = Some(c);
    d
}

pub fn arg(lexeme: &str, d: Data) -> CallArg {
    CallArg {
        token: tok(lexeme),
        data: d,
    }
}

// ---------------------------- AST helpers ---------------------------- //

pub fn ty(ident: &str) -> ast::TypeDecl {
    ast::TypeDecl {
        token: tok(ident),
        kind: ast::TypeExpr::Ident(ast::IdentExpr {
            ident: ident.to_owned(),
            cpp_linked: false,
            generics: Vec::new(),
        }),
    }
}

pub fn ty_cpp(ident: &str) -> ast::TypeDecl {
    ast::TypeDecl {
        token: tok(ident),
        kind: ast::TypeExpr::Ident(ast::IdentExpr {
            ident: ident.to_owned(),
            cpp_linked: true,
            generics: Vec::new(),
        }),
    }
}

pub fn ty_generics(ident: &str, generics: Vec<ast::TypeDecl>) -> ast::TypeDecl {
    ast::TypeDecl {
        token: tok(ident),
        kind: ast::TypeExpr::Ident(ast::IdentExpr {
            ident: ident.to_owned(),
            cpp_linked: false,
            generics,
        }),
    }
}

pub fn ty_ref(elem: ast::TypeDecl) -> ast::TypeDecl {
    ast::TypeDecl {
        token: tok("&"),
        kind: ast::TypeExpr::Ref(Box::new(elem)),
    }
}

pub fn ty_ptr(elem: ast::TypeDecl) -> ast::TypeDecl {
    ast::TypeDecl {
        token: tok("*"),
        kind: ast::TypeExpr::Ptr(Some(Box::new(elem))),
    }
}

pub fn ty_unsafe_ptr() -> ast::TypeDecl {
    ast::TypeDecl {
        token: tok("*"),
        kind: ast::TypeExpr::Ptr(None),
    }
}

pub fn ty_slice(elem: ast::TypeDecl) -> ast::TypeDecl {
    ast::TypeDecl {
        token: tok("[]"),
        kind: ast::TypeExpr::Slice(Box::new(elem)),
    }
}

pub fn ty_array(elem: ast::TypeDecl, size: Option<i64>) -> ast::TypeDecl {
    ast::TypeDecl {
        token: tok("["),
        kind: ast::TypeExpr::Array(ast::ArrayExpr {
            elem: Box::new(elem),
            size,
        }),
    }
}

pub fn ty_map(key: ast::TypeDecl, val: ast::TypeDecl) -> ast::TypeDecl {
    ast::TypeDecl {
        token: tok("["),
        kind: ast::TypeExpr::Map(Box::new(key), Box::new(val)),
    }
}

pub fn ty_tuple(types: Vec<ast::TypeDecl>) -> ast::TypeDecl {
    ast::TypeDecl {
        token: tok("("),
        kind: ast::TypeExpr::Tuple(types),
    }
}

pub fn ty_fn(params: Vec<ast::ParamExpr>, result: Option<ast::TypeDecl>) -> ast::TypeDecl {
    ast::TypeDecl {
        token: tok("fn"),
        kind: ast::TypeExpr::Func(ast::FuncExpr {
            params,
            result: result.map(Box::new),
        }),
    }
}

pub fn param_expr(ident: &str, kind: ast::TypeDecl) -> ast::ParamExpr {
    ast::ParamExpr {
        ident: ident.to_owned(),
        mutable: false,
        variadic: false,
        kind,
    }
}

pub fn alias_node(ident: &str, kind: ast::TypeDecl) -> ast::AliasDeclNode {
    ast::AliasDeclNode {
        token: tok(ident),
        ident: ident.to_owned(),
        public: true,
        cpp_linked: false,
        kind,
    }
}

pub fn field(ident: &str, kind: ast::TypeDecl) -> ast::FieldNode {
    ast::FieldNode {
        token: tok(ident),
        ident: ident.to_owned(),
        public: true,
        mutable: false,
        kind,
    }
}

pub fn struct_node(
    ident: &str,
    generics: Vec<&str>,
    fields: Vec<ast::FieldNode>,
) -> ast::StructDeclNode {
    ast::StructDeclNode {
        token: tok(ident),
        ident: ident.to_owned(),
        public: true,
        cpp_linked: false,
        generics: generics.into_iter().map(String::from).collect(),
        fields,
        methods: Vec::new(),
        implements: Vec::new(),
    }
}

pub fn enum_node(ident: &str) -> ast::EnumDeclNode {
    ast::EnumDeclNode {
        token: tok(ident),
        ident: ident.to_owned(),
        public: true,
        kind: None,
        items: Vec::new(),
    }
}

pub fn trait_node(ident: &str, methods: Vec<(&str, bool)>) -> ast::TraitDeclNode {
    ast::TraitDeclNode {
        token: tok(ident),
        ident: ident.to_owned(),
        public: true,
        methods: methods
            .into_iter()
            .map(|(ident, ref_receiver)| ast::TraitMethodNode {
                token: tok(ident),
                ident: ident.to_owned(),
                ref_receiver,
            })
            .collect(),
    }
}

pub fn fn_node(
    ident: &str,
    generics: Vec<&str>,
    params: Vec<ast::ParamNode>,
    result: Option<ast::TypeDecl>,
) -> ast::FnDeclNode {
    ast::FnDeclNode {
        token: tok(ident),
        ident: ident.to_owned(),
        public: true,
        cpp_linked: false,
        generics: generics.into_iter().map(String::from).collect(),
        params,
        result,
        result_idents: Vec::new(),
    }
}

pub fn param(ident: &str, kind: ast::TypeDecl) -> ast::ParamNode {
    ast::ParamNode {
        token: tok(ident),
        ident: ident.to_owned(),
        mutable: false,
        variadic: false,
        self_param: false,
        reference: false,
        kind: Some(kind),
    }
}

pub fn mut_param(ident: &str, kind: ast::TypeDecl) -> ast::ParamNode {
    let mut p = param(ident, kind);
    p.mutable = true;
    p
}

pub fn vparam(ident: &str, kind: ast::TypeDecl) -> ast::ParamNode {
    let mut p = param(ident, kind);
    p.variadic = true;
    p
}

pub fn self_param_node() -> ast::ParamNode {
    ast::ParamNode {
        token: tok("self"),
        ident: "self".to_owned(),
        mutable: false,
        variadic: false,
        self_param: true,
        reference: false,
        kind: None,
    }
}
