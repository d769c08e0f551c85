use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TensorError {
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },
    #[error("buffer of {len} elements is not a whole number of {width}-element rows")]
    Batch { len: usize, width: usize },
    #[error("label buffer of {len} elements does not split into {batch} rows")]
    LabelBatch { len: usize, batch: usize },
    #[error("rank mismatch: expected rank {expected}, got {got}")]
    Rank { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, TensorError>;
