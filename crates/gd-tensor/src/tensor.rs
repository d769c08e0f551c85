use crate::dtype::DType;
use crate::error::Result;
use crate::shape::Shape;
use crate::storage::Storage;

/// A host tensor exchanged with a graph engine.
///
/// Holds contiguous, row-major data with an associated shape. The element
/// type is carried by the storage variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    storage: Storage,
    shape: Shape,
}

impl Tensor {
    /// Create a tensor from arbitrary storage and a shape.
    ///
    /// Fails with `ShapeMismatch` if the storage length does not equal
    /// `shape.numel()`.
    pub fn new(storage: Storage, shape: Shape) -> Result<Self> {
        shape.expect_numel(storage.len())?;
        Ok(Tensor { storage, shape })
    }

    /// Create an f32 tensor from data and a shape.
    pub fn from_f32(data: Vec<f32>, shape: Shape) -> Result<Self> {
        Tensor::new(Storage::F32(data), shape)
    }

    /// Create an i64 tensor from data and a shape.
    pub fn from_i64(data: Vec<i64>, shape: Shape) -> Result<Self> {
        Tensor::new(Storage::I64(data), shape)
    }

    /// Create an i32 tensor from data and a shape.
    pub fn from_i32(data: Vec<i32>, shape: Shape) -> Result<Self> {
        Tensor::new(Storage::I32(data), shape)
    }

    /// Create a string tensor with every slot holding `value`.
    ///
    /// The checkpoint endpoints take their path this way: one value broadcast
    /// across the whole capacity of the tensor.
    pub fn filled_string(value: &str, shape: Shape) -> Self {
        let n = shape.numel();
        Tensor {
            storage: Storage::Str(vec![value.to_string(); n]),
            shape,
        }
    }

    /// Returns a reference to the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the tensor's data type.
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Number of elements.
    pub fn numel(&self) -> usize {
        self.storage.len()
    }

    /// Returns the underlying storage reference.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}
