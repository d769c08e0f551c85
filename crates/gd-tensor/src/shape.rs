use crate::error::{Result, TensorError};
use std::fmt;

/// A tensor shape, wrapping a vector of dimension sizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    /// Create a new shape from a vector of dimensions.
    pub fn new(dims: Vec<usize>) -> Self {
        Shape { dims }
    }

    /// Rank-2 `[rows, cols]` shape, the layout of every batch feed.
    pub fn matrix(rows: usize, cols: usize) -> Self {
        Shape {
            dims: vec![rows, cols],
        }
    }

    /// Rank-1 `[len]` shape.
    pub fn vector(len: usize) -> Self {
        Shape { dims: vec![len] }
    }

    /// Number of dimensions (rank).
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements (product of all dimension sizes).
    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    /// Returns a reference to the underlying dimension sizes.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Checks that this shape has exactly `rank` dimensions.
    pub fn expect_rank(&self, rank: usize) -> Result<()> {
        if self.ndim() != rank {
            return Err(TensorError::Rank {
                expected: rank,
                got: self.ndim(),
            });
        }
        Ok(())
    }

    /// Checks that this shape describes exactly `len` elements.
    pub fn expect_numel(&self, len: usize) -> Result<()> {
        if self.numel() != len {
            return Err(TensorError::ShapeMismatch {
                expected: self.dims.clone(),
                got: vec![len],
            });
        }
        Ok(())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]")
    }
}
