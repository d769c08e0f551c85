use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("model not found: {key}")]
    NotFound { key: String },
    #[error("invalid endpoint metadata: {0}")]
    Metadata(#[from] serde_json::Error),
    #[error("missing endpoint: {0}")]
    MissingEndpoint(String),
    #[error("invalid dataset geometry {width}x{height}x{channels}: every dimension must be non-zero")]
    InvalidGeometry {
        width: usize,
        height: usize,
        channels: usize,
    },
    #[error("empty graph file: {0}")]
    EmptyGraph(PathBuf),
}

pub type Result<T> = std::result::Result<T, ModelError>;
