use std::fmt;

use gd_model::GraphDef;
use gd_tensor::{FeedSet, Tensor};
use thiserror::Error;

use crate::options::SessionOptions;

/// Engine status codes surfaced by a failed create or run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    InvalidArgument,
    NotFound,
    FailedPrecondition,
    Internal,
    Unavailable,
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusCode::InvalidArgument => "invalid argument",
            StatusCode::NotFound => "not found",
            StatusCode::FailedPrecondition => "failed precondition",
            StatusCode::Internal => "internal",
            StatusCode::Unavailable => "unavailable",
        };
        f.write_str(s)
    }
}

/// A non-ok status reported by the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct EngineStatus {
    pub code: StatusCode,
    pub message: String,
}

impl EngineStatus {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(StatusCode::InvalidArgument, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::Internal, message)
    }
}

/// One live engine session bound to one graph.
///
/// A run binds `feeds` to input endpoints, executes `targets` for their side
/// effects, and returns one tensor per name in `fetches`, in that order.
pub trait Session: Send {
    fn run(
        &mut self,
        feeds: &FeedSet,
        fetches: &[String],
        targets: &[String],
    ) -> Result<Vec<Tensor>, EngineStatus>;

    /// Release the engine-side resources. Called at most once.
    fn close(&mut self);
}

/// A computation-graph engine able to open sessions on serialized graphs.
pub trait Engine: Send + Sync {
    type Session: Session;

    /// Returns the name of this engine (e.g., "tensorflow").
    fn name(&self) -> &str;

    fn create_session(
        &self,
        graph: &GraphDef,
        options: &SessionOptions,
    ) -> Result<Self::Session, EngineStatus>;
}
