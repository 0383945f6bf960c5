use crate::types::Prim;

/// Minimum value representable by the integer kind. Zero for unsigned and
/// non-integer kinds.
pub fn min_of(p: Prim) -> f64 {
    match p {
        Prim::I8 => i8::MIN as f64,
        Prim::I16 => i16::MIN as f64,
        Prim::I32 => i32::MIN as f64,
        Prim::I64 | Prim::Int => i64::MIN as f64,
        _ => 0.0,
    }
}

/// Maximum value representable by the integer kind. Zero for non-integer
/// kinds.
pub fn max_of(p: Prim) -> f64 {
    match p {
        Prim::I8 => i8::MAX as f64,
        Prim::I16 => i16::MAX as f64,
        Prim::I32 => i32::MAX as f64,
        Prim::I64 | Prim::Int => i64::MAX as f64,
        Prim::U8 => u8::MAX as f64,
        Prim::U16 => u16::MAX as f64,
        Prim::U32 => u32::MAX as f64,
        Prim::U64 | Prim::Uint | Prim::Uintptr => u64::MAX as f64,
        _ => 0.0,
    }
}

/// Reports whether the float constant is representable by the float kind
/// without overflowing its exponent range.
pub fn fits_float(p: Prim, value: f64) -> bool {
    match p {
        Prim::F32 => (value as f32).is_finite(),
        Prim::F64 => value.is_finite(),
        _ => false,
    }
}
