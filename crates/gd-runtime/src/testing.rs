//! In-memory engine double: records every run and replays queued responses.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use gd_model::{EndpointMetadata, GraphDef, ModelDescriptor};
use gd_tensor::{DType, FeedSet, Shape, Storage, Tensor};

use crate::engine::{Engine, EngineStatus, Session};
use crate::options::SessionOptions;

/// What one `Session::run` call was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    /// `(endpoint, dims, dtype)` per feed, in feed order.
    pub feeds: Vec<(String, Vec<usize>, DType)>,
    /// Contents of every f32 feed, in feed order.
    pub floats: Vec<Vec<f32>>,
    /// Contents of every string feed, concatenated.
    pub strings: Vec<String>,
    pub fetches: Vec<String>,
    pub targets: Vec<String>,
}

#[derive(Default)]
struct State {
    runs: Vec<RunRecord>,
    responses: VecDeque<Result<Vec<Tensor>, EngineStatus>>,
    create_error: Option<EngineStatus>,
    created: usize,
    closed: usize,
    last_options: Option<SessionOptions>,
}

/// Engine whose sessions record runs into shared state.
///
/// Runs pop the next queued response; with nothing queued a run succeeds
/// and returns one `[1]` f32 zero per fetch.
#[derive(Clone, Default)]
pub struct ScriptedEngine {
    state: Arc<Mutex<State>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Make the next `create_session` fail with `status`.
    pub fn fail_create(&self, status: EngineStatus) {
        self.lock().create_error = Some(status);
    }

    pub fn push_outputs(&self, outputs: Vec<Tensor>) {
        self.lock().responses.push_back(Ok(outputs));
    }

    pub fn push_failure(&self, status: EngineStatus) {
        self.lock().responses.push_back(Err(status));
    }

    pub fn runs(&self) -> Vec<RunRecord> {
        self.lock().runs.clone()
    }

    pub fn sessions_created(&self) -> usize {
        self.lock().created
    }

    pub fn sessions_closed(&self) -> usize {
        self.lock().closed
    }

    pub fn last_options(&self) -> Option<SessionOptions> {
        self.lock().last_options.clone()
    }
}

impl Engine for ScriptedEngine {
    type Session = ScriptedSession;

    fn name(&self) -> &str {
        "scripted"
    }

    fn create_session(
        &self,
        _graph: &GraphDef,
        options: &SessionOptions,
    ) -> Result<ScriptedSession, EngineStatus> {
        let mut state = self.lock();
        if let Some(status) = state.create_error.take() {
            return Err(status);
        }
        state.created += 1;
        state.last_options = Some(options.clone());
        Ok(ScriptedSession {
            state: Arc::clone(&self.state),
        })
    }
}

pub struct ScriptedSession {
    state: Arc<Mutex<State>>,
}

impl Session for ScriptedSession {
    fn run(
        &mut self,
        feeds: &FeedSet,
        fetches: &[String],
        targets: &[String],
    ) -> Result<Vec<Tensor>, EngineStatus> {
        let mut record = RunRecord {
            feeds: Vec::new(),
            floats: Vec::new(),
            strings: Vec::new(),
            fetches: fetches.to_vec(),
            targets: targets.to_vec(),
        };
        for (name, t) in feeds.iter() {
            record
                .feeds
                .push((name.to_string(), t.shape().dims().to_vec(), t.dtype()));
            match t.storage() {
                Storage::F32(v) => record.floats.push(v.clone()),
                Storage::Str(v) => record.strings.extend(v.iter().cloned()),
                _ => {}
            }
        }

        let mut state = self.state.lock().unwrap();
        state.runs.push(record);
        match state.responses.pop_front() {
            Some(response) => response,
            None => Ok(fetches.iter().map(|_| scalar(0.0)).collect()),
        }
    }

    fn close(&mut self) {
        self.state.lock().unwrap().closed += 1;
    }
}

/// A `[1]` f32 tensor holding `v`.
pub fn scalar(v: f32) -> Tensor {
    Tensor::from_f32(vec![v], Shape::vector(1)).unwrap()
}

/// A `[n]` tensor of unsupported dtype.
pub fn unsupported(n: usize) -> Tensor {
    Tensor::new(Storage::F64(vec![0.0; n]), Shape::vector(n)).unwrap()
}

pub fn meta() -> EndpointMetadata {
    EndpointMetadata::from_json(
        r#"{
            "inputs": "x:0",
            "labels": "y:0",
            "init": ["init", "init_tables"],
            "train_op": "train",
            "predict_op": "predict:0",
            "accuracy": "accuracy:0",
            "total_loss": "total_loss:0"
        }"#,
    )
    .unwrap()
}

pub fn descriptor(name: &str) -> ModelDescriptor {
    ModelDescriptor::new(name, GraphDef::from_bytes(b"graph".to_vec()), meta())
}
