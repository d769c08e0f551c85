use std::fmt;

/// Element types a graph engine may hand back or accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit floating point.
    F32,
    /// 64-bit floating point.
    F64,
    /// 16-bit floating point (IEEE 754 half-precision, via the `half` crate).
    F16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// Unsigned byte.
    U8,
    /// Boolean.
    Bool,
    /// Variable-length UTF-8 string, one per element.
    String,
}

impl DType {
    /// Returns true if values of this dtype can be flattened into an f32
    /// result array.
    ///
    /// Only F32 (copied directly) and the two integer kinds (widened) qualify.
    /// Everything else degrades to an empty slot when flattened.
    pub fn is_decodable(&self) -> bool {
        matches!(self, DType::F32 | DType::I32 | DType::I64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::F32 => write!(f, "f32"),
            DType::F64 => write!(f, "f64"),
            DType::F16 => write!(f, "f16"),
            DType::I32 => write!(f, "i32"),
            DType::I64 => write!(f, "i64"),
            DType::U8 => write!(f, "u8"),
            DType::Bool => write!(f, "bool"),
            DType::String => write!(f, "string"),
        }
    }
}
