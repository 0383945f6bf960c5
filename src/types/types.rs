use std::fmt;
use strum_macros::EnumIter;

/// Primitive type kinds of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Prim {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Int,
    Uint,
    Uintptr,
    Bool,
    Str,
    Any,
}

impl Prim {
    /// Resolve a primitive keyword to its kind. Returns None for any
    /// identifier that is not a primitive keyword.
    pub fn from_ident(ident: &str) -> Option<Prim> {
        Some(match ident {
            "i8" => Prim::I8,
            "i16" => Prim::I16,
            "i32" => Prim::I32,
            "i64" => Prim::I64,
            "u8" => Prim::U8,
            "u16" => Prim::U16,
            "u32" => Prim::U32,
            "u64" => Prim::U64,
            "f32" => Prim::F32,
            "f64" => Prim::F64,
            "int" => Prim::Int,
            "uint" => Prim::Uint,
            "uintptr" => Prim::Uintptr,
            "bool" => Prim::Bool,
            "str" => Prim::Str,
            "any" => Prim::Any,
            _ => return None,
        })
    }

    pub fn is_sig_int(self) -> bool {
        matches!(self, Prim::I8 | Prim::I16 | Prim::I32 | Prim::I64 | Prim::Int)
    }

    pub fn is_unsig_int(self) -> bool {
        matches!(
            self,
            Prim::U8 | Prim::U16 | Prim::U32 | Prim::U64 | Prim::Uint | Prim::Uintptr
        )
    }

    pub fn is_int(self) -> bool {
        self.is_sig_int() || self.is_unsig_int()
    }

    pub fn is_float(self) -> bool {
        matches!(self, Prim::F32 | Prim::F64)
    }

    pub fn is_num(self) -> bool {
        self.is_int() || self.is_float()
    }

    /// Bit width used for compatibility decisions. Platform-width kinds
    /// count as their widest concrete counterpart.
    pub fn bit_size(self) -> u32 {
        match self {
            Prim::I8 | Prim::U8 => 8,
            Prim::I16 | Prim::U16 => 16,
            Prim::I32 | Prim::U32 | Prim::F32 => 32,
            Prim::I64 | Prim::U64 | Prim::F64 => 64,
            Prim::Int | Prim::Uint | Prim::Uintptr => 64,
            Prim::Bool | Prim::Str | Prim::Any => 0,
        }
    }
}

impl fmt::Display for Prim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}
