use gd_model::ModelError;
use gd_tensor::TensorError;
use thiserror::Error;

use crate::engine::EngineStatus;

/// Fatal failures while building a model.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("model resolution failed: {0}")]
    Model(#[from] ModelError),
    #[error("failed to create session: {0}")]
    GraphLoad(EngineStatus),
    #[error("init run failed: {0}")]
    Init(EngineStatus),
}

/// Failures of a single run. These never escape the `BackendTrain` surface;
/// they degrade to an empty result there.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunError {
    #[error("engine run failed: {0}")]
    Engine(EngineStatus),
    #[error("malformed batch: {0}")]
    Shape(#[from] TensorError),
    #[error("session is closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, BackendError>;
