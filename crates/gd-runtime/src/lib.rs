//! `gd-runtime` - Session lifecycle and execution driver for graph-driver.
//!
//! A [`GraphBackend`] resolves a model from a [`ModelRepository`], opens one
//! [`ExecutionSession`] on an [`Engine`] for it, and then drives that session
//! with flat `f32` batches through the [`BackendTrain`] contract.
//!
//! [`ModelRepository`]: gd_model::ModelRepository

pub mod backend;
pub mod driver;
pub mod engine;
pub mod error;
pub mod options;
pub mod session;
#[cfg(test)]
mod testing;

pub use backend::{BackendTrain, GraphBackend, GraphModel};
pub use driver::{ExecutionDriver, Mode, RunPlan};
pub use engine::{Engine, EngineStatus, Session, StatusCode};
pub use error::{BackendError, Result, RunError};
pub use options::{BackendParams, Device, RuntimeOptions, SessionOptions};
pub use session::ExecutionSession;
