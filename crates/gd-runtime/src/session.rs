use gd_model::ModelDescriptor;
use gd_tensor::{FeedSet, Tensor};
use tracing::{debug, info, warn};

use crate::driver::{Mode, RunPlan};
use crate::engine::{Engine, Session};
use crate::error::{BackendError, Result, RunError};
use crate::options::SessionOptions;

/// Owns the one engine session of a built model.
///
/// Opened by [`ExecutionSession::open`], which also runs the init targets,
/// and closed exactly once by [`close`](Self::close). A session dropped
/// while still open is closed then, with a warning.
pub struct ExecutionSession<S: Session> {
    inner: S,
    model: String,
    closed: bool,
}

impl<S: Session> ExecutionSession<S> {
    /// Create a session on `descriptor.graph` and run its init targets with
    /// no feeds and no fetches.
    ///
    /// Both steps are fatal on failure: `GraphLoad` if the engine cannot
    /// create the session, `Init` if the init run reports a non-ok status.
    pub fn open<E>(
        engine: &E,
        descriptor: &ModelDescriptor,
        options: &SessionOptions,
    ) -> Result<ExecutionSession<S>>
    where
        E: Engine<Session = S>,
    {
        let inner = engine
            .create_session(&descriptor.graph, options)
            .map_err(BackendError::GraphLoad)?;
        let mut session = ExecutionSession {
            inner,
            model: descriptor.name.clone(),
            closed: false,
        };

        let plan = RunPlan::for_mode(Mode::Init, &descriptor.meta);
        debug!(model = %session.model, targets = ?plan.targets, "running init targets");
        if let Err(status) = session.inner.run(&FeedSet::new(), &plan.fetches, &plan.targets) {
            session.close();
            return Err(BackendError::Init(status));
        }

        info!(
            model = %session.model,
            engine = engine.name(),
            device = ?options.device,
            "session opened"
        );
        Ok(session)
    }

    /// Run against the engine session. Fails with `Closed` after
    /// [`close`](Self::close) without touching the engine.
    pub fn run(
        &mut self,
        feeds: &FeedSet,
        fetches: &[String],
        targets: &[String],
    ) -> std::result::Result<Vec<Tensor>, RunError> {
        if self.closed {
            return Err(RunError::Closed);
        }
        self.inner
            .run(feeds, fetches, targets)
            .map_err(RunError::Engine)
    }

    /// Release the engine session. Later calls are no-ops.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.inner.close();
        self.closed = true;
        info!(model = %self.model, "session closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Name of the model this session was opened for.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl<S: Session> Drop for ExecutionSession<S> {
    fn drop(&mut self) {
        if !self.closed {
            warn!(model = %self.model, "session dropped without delete, closing");
            self.close();
        }
    }
}
