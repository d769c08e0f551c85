//! `gd-tensor` - Tensor values and flat-buffer marshalling for graph-driver.
//!
//! This crate provides:
//! - A `Tensor` type with typed host storage
//! - Shape utilities and validated batch derivation
//! - Data type definitions (F32, integer, string and other engine kinds)
//! - Feed encoding and output flattening (`marshal`)

pub mod dtype;
pub mod error;
pub mod marshal;
pub mod shape;
pub mod storage;
pub mod tensor;

// Re-export primary types at the crate root for convenience.
pub use dtype::DType;
pub use error::{Result, TensorError};
pub use marshal::{Decoded, FeedBuffer, FeedSet, Flattened};
pub use shape::Shape;
pub use storage::Storage;
pub use tensor::Tensor;
