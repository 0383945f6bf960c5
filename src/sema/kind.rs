use std::fmt;

use crate::{
    sema::{EnumId, FnId, StructId, TraitId},
    types::Prim,
};

/// Canonical representation of a type after semantic analysis. Built once
/// per declaration by the type builder; partially-built kinds never escape.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Prim(Prim),
    /// Unsubstituted generic parameter occurrence.
    Generic(String),
    /// Kind of the `nil` literal. Only ever appears as a source kind.
    Nil,
    Ref(Box<TypeKind>),
    Ptr(Ptr),
    Slc(Box<TypeKind>),
    Arr(Arr),
    Map(Box<Map>),
    Tup(Vec<TypeKind>),
    Fn(FnIns),
    Strct(StructIns),
    Enm(EnumIns),
    Trt(TraitIns),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ptr {
    /// Pointed element; None is the unsafe pointer, which erases
    /// element-type matching.
    pub elem: Option<Box<TypeKind>>,
}

impl Ptr {
    pub fn is_unsafe(&self) -> bool {
        self.elem.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arr {
    pub elem: Box<TypeKind>,
    /// Compile-time element count.
    pub n: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    pub key: TypeKind,
    pub val: TypeKind,
}

/// Function instance. The generic binding vector is owned per call site;
/// the dynamic annotator takes exclusive access for the duration of
/// argument checking.
#[derive(Debug, Clone)]
pub struct FnIns {
    /// Backing declaration; None for structural function types.
    pub decl: Option<FnId>,
    /// True for compiler-provided functions.
    pub builtin: bool,
    /// Bindings parallel to the declaration's generic list.
    pub generics: Vec<Option<TypeKind>>,
    pub params: Vec<ParamIns>,
    /// None when the function is void.
    pub result: Option<Box<TypeKind>>,
}

impl FnIns {
    /// Reports whether any generic parameter is still unbound.
    pub fn has_unbound_generics(&self) -> bool {
        self.generics.iter().any(Option::is_none)
    }
}

// Function type identity is structural: parameter shapes and result only.
// The backing declaration and binding state play no role.
impl PartialEq for FnIns {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params && self.result == other.result
    }
}

#[derive(Debug, Clone)]
pub struct ParamIns {
    pub ident: String,
    pub mutable: bool,
    pub variadic: bool,
    pub self_param: bool,
    /// For variadic parameters this is the element kind.
    pub kind: TypeKind,
}

// Parameter idents are documentation, not type identity.
impl PartialEq for ParamIns {
    fn eq(&self, other: &Self) -> bool {
        self.mutable == other.mutable
            && self.variadic == other.variadic
            && self.self_param == other.self_param
            && self.kind == other.kind
    }
}

/// Struct kind: identity by declaration site plus the concrete generics
/// bound to its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct StructIns {
    pub decl: StructId,
    pub ident: String,
    pub generics: Vec<TypeKind>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumIns {
    pub decl: EnumId,
    pub ident: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraitIns {
    pub decl: TraitId,
    pub ident: String,
}

impl TypeKind {
    pub fn is_nil(&self) -> bool {
        matches!(self, TypeKind::Nil)
    }

    pub fn as_prim(&self) -> Option<Prim> {
        match self {
            TypeKind::Prim(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_fn(&self) -> Option<&FnIns> {
        match self {
            TypeKind::Fn(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_strct(&self) -> Option<&StructIns> {
        match self {
            TypeKind::Strct(s) => Some(s),
            _ => None,
        }
    }

    /// Reports whether nil is an admissible value for this kind.
    pub fn is_nil_compatible(&self) -> bool {
        matches!(
            self,
            TypeKind::Nil
                | TypeKind::Ptr(_)
                | TypeKind::Slc(_)
                | TypeKind::Map(_)
                | TypeKind::Fn(_)
                | TypeKind::Trt(_)
        )
    }

    /// Reports whether the kind is transitively mutable, meaning it owns
    /// shared storage a copy would alias (contains a slice or pointer).
    pub fn is_mut(&self) -> bool {
        match self {
            TypeKind::Slc(_) | TypeKind::Ptr(_) => true,
            TypeKind::Ref(elem) => elem.is_mut(),
            TypeKind::Arr(arr) => arr.elem.is_mut(),
            TypeKind::Map(m) => m.key.is_mut() || m.val.is_mut(),
            TypeKind::Tup(types) => types.iter().any(TypeKind::is_mut),
            _ => false,
        }
    }
}

// Printed form: deterministic and injective on distinct kinds. Equal kinds
// print identically; diagnostics reuse it as the user-facing type string.
impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Prim(p) => write!(f, "{}", p),
            TypeKind::Generic(ident) => write!(f, "{}", ident),
            TypeKind::Nil => write!(f, "nil"),
            TypeKind::Ref(elem) => write!(f, "&{}", elem),
            TypeKind::Ptr(ptr) => match &ptr.elem {
                Some(elem) => write!(f, "*{}", elem),
                None => write!(f, "*unsafe"),
            },
            TypeKind::Slc(elem) => write!(f, "[]{}", elem),
            TypeKind::Arr(arr) => write!(f, "[{}]{}", arr.n, arr.elem),
            TypeKind::Map(m) => write!(f, "[{}:{}]", m.key, m.val),
            TypeKind::Tup(types) => {
                write!(f, "(")?;
                for (i, t) in types.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", t)?;
                }
                write!(f, ")")
            }
            TypeKind::Fn(func) => {
                write!(f, "fn(")?;
                for (i, p) in func.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    if p.self_param {
                        write!(f, "self")?;
                        continue;
                    }
                    if p.mutable {
                        write!(f, "mut ")?;
                    }
                    if p.variadic {
                        write!(f, "...")?;
                    }
                    write!(f, "{}", p.kind)?;
                }
                write!(f, ")")?;
                if let Some(result) = &func.result {
                    write!(f, ": {}", result)?;
                }
                Ok(())
            }
            TypeKind::Strct(s) => {
                write!(f, "{}", s.ident)?;
                if !s.generics.is_empty() {
                    write!(f, "[")?;
                    for (i, g) in s.generics.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", g)?;
                    }
                    write!(f, "]")?;
                }
                Ok(())
            }
            TypeKind::Enm(e) => write!(f, "{}", e.ident),
            TypeKind::Trt(t) => write!(f, "{}", t.ident),
        }
    }
}
