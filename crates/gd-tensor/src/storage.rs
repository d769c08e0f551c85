use half::f16;

use crate::dtype::DType;

/// Host-side tensor storage, one variant per element kind.
///
/// Feeds are always built as `F32` (batch buffers) or `Str` (checkpoint
/// paths); the other variants exist because engines return whatever their
/// graph produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
    F32(Vec<f32>),
    F64(Vec<f64>),
    F16(Vec<f16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    Bool(Vec<bool>),
    Str(Vec<String>),
}

impl Storage {
    /// Number of elements in this storage.
    pub fn len(&self) -> usize {
        match self {
            Storage::F32(v) => v.len(),
            Storage::F64(v) => v.len(),
            Storage::F16(v) => v.len(),
            Storage::I32(v) => v.len(),
            Storage::I64(v) => v.len(),
            Storage::U8(v) => v.len(),
            Storage::Bool(v) => v.len(),
            Storage::Str(v) => v.len(),
        }
    }

    /// Returns true if the storage contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the dtype of this storage.
    pub fn dtype(&self) -> DType {
        match self {
            Storage::F32(_) => DType::F32,
            Storage::F64(_) => DType::F64,
            Storage::F16(_) => DType::F16,
            Storage::I32(_) => DType::I32,
            Storage::I64(_) => DType::I64,
            Storage::U8(_) => DType::U8,
            Storage::Bool(_) => DType::Bool,
            Storage::Str(_) => DType::String,
        }
    }

    /// Returns the data as an f32 slice, if this is F32 storage.
    pub fn as_f32_slice(&self) -> Option<&[f32]> {
        match self {
            Storage::F32(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Returns the data as a string slice, if this is string storage.
    pub fn as_str_slice(&self) -> Option<&[String]> {
        match self {
            Storage::Str(v) => Some(v.as_slice()),
            _ => None,
        }
    }
}
