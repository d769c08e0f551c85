//! Per-mode feed/fetch/target binding and run execution.
//!
//! Every public operation is one synchronous run against the model's
//! session. The endpoint names come from [`EndpointMetadata`]:
//!
//! | Mode                | Feeds                | Targets     | Fetches                     |
//! |---------------------|----------------------|-------------|-----------------------------|
//! | `Init`              | none                 | `init`      | none                        |
//! | `Train`             | `inputs`, `labels`   | `train_op`  | `accuracy`, `total_loss`    |
//! | `PredictWithLabels` | `inputs`, `labels`   | none        | `accuracy`                  |
//! | `Predict`           | `inputs`             | none        | `predict_op`                |
//! | `Save`              | `save_const`         | none        | `save_control_dependency`   |
//! | `Restore`           | `save_const`         | none        | `restore_all`               |

use std::fmt;
use std::num::NonZeroUsize;

use gd_model::EndpointMetadata;
use gd_tensor::marshal::{self, FeedBuffer};
use gd_tensor::{FeedSet, Shape};
use tracing::{debug, error};

use crate::engine::Session;
use crate::error::RunError;
use crate::session::ExecutionSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Init,
    Train,
    PredictWithLabels,
    Predict,
    Save,
    Restore,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Init => "init",
            Mode::Train => "train",
            Mode::PredictWithLabels => "predict+labels",
            Mode::Predict => "predict",
            Mode::Save => "save",
            Mode::Restore => "restore",
        };
        f.write_str(s)
    }
}

/// Endpoint names bound by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub mode: Mode,
    /// Feed endpoints, in the order their buffers are supplied.
    pub feeds: Vec<String>,
    pub fetches: Vec<String>,
    pub targets: Vec<String>,
}

impl RunPlan {
    /// Bindings for `mode`.
    ///
    /// Save and restore name their checkpoint ops as fetches; an engine whose
    /// checkpoint ops produce no value should run them as targets instead.
    pub fn for_mode(mode: Mode, meta: &EndpointMetadata) -> RunPlan {
        let (feeds, fetches, targets) = match mode {
            Mode::Init => (vec![], vec![], meta.init.clone()),
            Mode::Train => (
                vec![meta.inputs.clone(), meta.labels.clone()],
                vec![meta.accuracy.clone(), meta.total_loss.clone()],
                vec![meta.train_op.clone()],
            ),
            Mode::PredictWithLabels => (
                vec![meta.inputs.clone(), meta.labels.clone()],
                vec![meta.accuracy.clone()],
                vec![],
            ),
            Mode::Predict => (
                vec![meta.inputs.clone()],
                vec![meta.predict_op.clone()],
                vec![],
            ),
            Mode::Save => (
                vec![meta.save_const.clone()],
                vec![meta.save_control_dependency.clone()],
                vec![],
            ),
            Mode::Restore => (
                vec![meta.save_const.clone()],
                vec![meta.restore_all.clone()],
                vec![],
            ),
        };
        RunPlan {
            mode,
            feeds,
            fetches,
            targets,
        }
    }
}

/// Encode `[batch, frame_size]` data (and `[batch, label_width]` labels)
/// onto the plan's feed endpoints.
///
/// Batch size and label width are derived from the buffer lengths and
/// validated before anything is copied.
pub fn batch_feeds(
    plan: &RunPlan,
    frame_size: NonZeroUsize,
    data: &[f32],
    labels: Option<&[f32]>,
) -> Result<FeedSet, RunError> {
    let frame = frame_size.get();
    let batch = marshal::derive_batch(data.len(), frame)?;
    let mut buffers = vec![FeedBuffer::new(&plan.feeds[0], data, Shape::matrix(batch, frame))];
    if let Some(labels) = labels {
        let width = marshal::label_width(labels.len(), batch)?;
        buffers.push(FeedBuffer::new(&plan.feeds[1], labels, Shape::matrix(batch, width)));
    }
    Ok(marshal::encode(&buffers)?)
}

/// Drives one model's session through the per-mode runs.
///
/// The `try_*` methods report why a run failed; the plain methods follow the
/// degrade policy and log the error, returning an empty result instead.
pub struct ExecutionDriver<'a, S: Session> {
    session: &'a mut ExecutionSession<S>,
    meta: &'a EndpointMetadata,
    frame_size: NonZeroUsize,
}

impl<'a, S: Session> ExecutionDriver<'a, S> {
    pub fn new(
        session: &'a mut ExecutionSession<S>,
        meta: &'a EndpointMetadata,
        frame_size: NonZeroUsize,
    ) -> Self {
        Self {
            session,
            meta,
            frame_size,
        }
    }

    pub fn plan(&self, mode: Mode) -> RunPlan {
        RunPlan::for_mode(mode, self.meta)
    }

    fn execute(&mut self, plan: &RunPlan, feeds: &FeedSet) -> Result<Vec<f32>, RunError> {
        debug!(
            model = self.session.model(),
            mode = %plan.mode,
            feeds = ?feeds.names(),
            fetches = ?plan.fetches,
            targets = ?plan.targets,
            "run"
        );
        let outputs = self.session.run(feeds, &plan.fetches, &plan.targets)?;
        Ok(marshal::flatten(&outputs))
    }

    fn run_batch(
        &mut self,
        mode: Mode,
        data: &[f32],
        labels: Option<&[f32]>,
    ) -> Result<Vec<f32>, RunError> {
        let plan = self.plan(mode);
        let feeds = batch_feeds(&plan, self.frame_size, data, labels)?;
        self.execute(&plan, &feeds)
    }

    fn run_path(&mut self, mode: Mode, path: &str) -> Result<(), RunError> {
        let plan = self.plan(mode);
        let feeds = marshal::path_feed(&plan.feeds[0], path);
        self.execute(&plan, &feeds).map(|_| ())
    }

    /// One training step. Returns `[accuracy..., total_loss...]`.
    pub fn try_train(&mut self, data: &[f32], labels: &[f32]) -> Result<Vec<f32>, RunError> {
        self.run_batch(Mode::Train, data, Some(labels))
    }

    /// Evaluate accuracy on a labelled batch without updating weights.
    pub fn try_predict_with_labels(
        &mut self,
        data: &[f32],
        labels: &[f32],
    ) -> Result<Vec<f32>, RunError> {
        self.run_batch(Mode::PredictWithLabels, data, Some(labels))
    }

    pub fn try_predict(&mut self, data: &[f32]) -> Result<Vec<f32>, RunError> {
        self.run_batch(Mode::Predict, data, None)
    }

    /// Write a checkpoint to `path` through the graph's save endpoints.
    pub fn try_save(&mut self, path: &str) -> Result<(), RunError> {
        self.run_path(Mode::Save, path)
    }

    /// Overwrite the session's weights in place from the checkpoint at `path`.
    pub fn try_restore(&mut self, path: &str) -> Result<(), RunError> {
        self.run_path(Mode::Restore, path)
    }

    fn degrade<T: Default>(&self, mode: Mode, res: Result<T, RunError>) -> T {
        res.unwrap_or_else(|e| {
            error!(model = self.session.model(), %mode, error = %e, "run failed");
            T::default()
        })
    }

    pub fn train(&mut self, data: &[f32], labels: &[f32]) -> Vec<f32> {
        let res = self.try_train(data, labels);
        self.degrade(Mode::Train, res)
    }

    pub fn predict_with_labels(&mut self, data: &[f32], labels: &[f32]) -> Vec<f32> {
        let res = self.try_predict_with_labels(data, labels);
        self.degrade(Mode::PredictWithLabels, res)
    }

    pub fn predict(&mut self, data: &[f32]) -> Vec<f32> {
        let res = self.try_predict(data);
        self.degrade(Mode::Predict, res)
    }

    pub fn save(&mut self, path: &str) {
        let res = self.try_save(path);
        self.degrade(Mode::Save, res)
    }

    pub fn restore(&mut self, path: &str) {
        let res = self.try_restore(path);
        self.degrade(Mode::Restore, res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineStatus;
    use crate::options::SessionOptions;
    use crate::testing::{descriptor, meta, scalar, ScriptedEngine};
    use gd_tensor::{DType, TensorError};

    fn frame(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_plan_table() {
        let m = meta();
        let train = RunPlan::for_mode(Mode::Train, &m);
        assert_eq!(train.feeds, vec!["x:0", "y:0"]);
        assert_eq!(train.fetches, vec!["accuracy:0", "total_loss:0"]);
        assert_eq!(train.targets, vec!["train"]);

        let eval = RunPlan::for_mode(Mode::PredictWithLabels, &m);
        assert_eq!(eval.feeds, vec!["x:0", "y:0"]);
        assert_eq!(eval.fetches, vec!["accuracy:0"]);
        assert!(eval.targets.is_empty());

        let predict = RunPlan::for_mode(Mode::Predict, &m);
        assert_eq!(predict.feeds, vec!["x:0"]);
        assert_eq!(predict.fetches, vec!["predict:0"]);
        assert!(predict.targets.is_empty());

        let init = RunPlan::for_mode(Mode::Init, &m);
        assert!(init.feeds.is_empty() && init.fetches.is_empty());
        assert_eq!(init.targets, vec!["init", "init_tables"]);
    }

    #[test]
    fn test_checkpoint_plans_share_feed() {
        let m = meta();
        let save = RunPlan::for_mode(Mode::Save, &m);
        let restore = RunPlan::for_mode(Mode::Restore, &m);
        assert_eq!(save.feeds, vec!["save/Const:0"]);
        assert_eq!(save.feeds, restore.feeds);
        assert_eq!(save.fetches, vec!["save/control_dependency:0"]);
        assert_eq!(restore.fetches, vec!["save/restore_all"]);
        assert!(save.targets.is_empty() && restore.targets.is_empty());
    }

    #[test]
    fn test_batch_feeds_shapes() {
        let plan = RunPlan::for_mode(Mode::Train, &meta());
        let data = vec![0.5; 24];
        let labels = vec![1.0, 0.0, 0.0, 1.0];
        let feeds = batch_feeds(&plan, frame(12), &data, Some(labels.as_slice())).unwrap();
        assert_eq!(feeds.get("x:0").unwrap().shape().dims(), &[2, 12]);
        assert_eq!(feeds.get("y:0").unwrap().shape().dims(), &[2, 2]);
    }

    #[test]
    fn test_batch_feeds_rejects_malformed() {
        let plan = RunPlan::for_mode(Mode::Train, &meta());
        let err = batch_feeds(&plan, frame(12), &[0.0; 23], Some(&[1.0; 2][..])).unwrap_err();
        assert_eq!(err, RunError::Shape(TensorError::Batch { len: 23, width: 12 }));

        let err = batch_feeds(&plan, frame(12), &[0.0; 24], Some(&[1.0; 3][..])).unwrap_err();
        assert_eq!(err, RunError::Shape(TensorError::LabelBatch { len: 3, batch: 2 }));
    }

    #[test]
    fn test_try_train_returns_accuracy_then_loss() {
        let engine = ScriptedEngine::new();
        let desc = descriptor("m");
        let mut session = ExecutionSession::open(&engine, &desc, &SessionOptions::default()).unwrap();
        engine.push_outputs(vec![scalar(0.5), scalar(2.25)]);

        let mut driver = ExecutionDriver::new(&mut session, &desc.meta, frame(3));
        let out = driver.try_train(&[0.0; 6], &[1.0, 0.0]).unwrap();
        assert_eq!(out, vec![0.5, 2.25]);
    }

    #[test]
    fn test_engine_failure_reported_then_degraded() {
        let engine = ScriptedEngine::new();
        let desc = descriptor("m");
        let mut session = ExecutionSession::open(&engine, &desc, &SessionOptions::default()).unwrap();
        let mut driver = ExecutionDriver::new(&mut session, &desc.meta, frame(3));

        engine.push_failure(EngineStatus::invalid_argument("shape [2,4] vs [2,3]"));
        assert!(matches!(driver.try_predict(&[0.0; 6]), Err(RunError::Engine(_))));

        engine.push_failure(EngineStatus::internal("oom"));
        assert!(driver.predict(&[0.0; 6]).is_empty());
    }

    #[test]
    fn test_save_feeds_path_string() {
        let engine = ScriptedEngine::new();
        let desc = descriptor("m");
        let mut session = ExecutionSession::open(&engine, &desc, &SessionOptions::default()).unwrap();
        let mut driver = ExecutionDriver::new(&mut session, &desc.meta, frame(3));
        driver.try_save("/tmp/ckpt").unwrap();

        let run = engine.runs().pop().unwrap();
        assert_eq!(run.feeds, vec![("save/Const:0".to_string(), vec![1], DType::String)]);
        assert_eq!(run.strings, vec!["/tmp/ckpt".to_string()]);
    }
}
