use std::num::NonZeroUsize;

use gd_model::{DatasetGeometry, EndpointMetadata, ModelDescriptor, ModelRepository};
use tracing::{debug, info};

use crate::driver::ExecutionDriver;
use crate::engine::{Engine, Session};
use crate::error::Result;
use crate::options::{BackendParams, RuntimeOptions, SessionOptions};
use crate::session::ExecutionSession;

/// Uniform train/predict/persist contract over flat `f32` buffers.
///
/// Only [`build_net`](Self::build_net) can fail. Every other operation
/// degrades: a failed run is logged and yields an empty result (or nothing,
/// for the checkpoint operations).
pub trait BackendTrain {
    type Model;

    /// Resolve `name` for this geometry and class count, open a session on
    /// its graph, and run the init targets.
    fn build_net(
        &self,
        geometry: &DatasetGeometry,
        opts: &RuntimeOptions,
        params: &BackendParams,
        num_classes: usize,
        name: &str,
    ) -> Result<Self::Model>;

    /// Release the model's session. The model cannot be used afterwards.
    fn delete(&self, model: Self::Model);

    /// One training step on a `[batch, frame]` batch. Returns
    /// `[accuracy..., total_loss...]`.
    fn train(&self, model: &mut Self::Model, data: &[f32], labels: &[f32]) -> Vec<f32>;

    /// Accuracy on a labelled batch.
    fn predict_with_labels(&self, model: &mut Self::Model, data: &[f32], labels: &[f32])
        -> Vec<f32>;

    /// Prediction output for an unlabelled batch.
    fn predict(&self, model: &mut Self::Model, data: &[f32]) -> Vec<f32>;

    fn save_model(&self, model: &mut Self::Model, path: &str);

    /// Same as [`save_model`](Self::save_model): parameters and the full
    /// model are persisted through one mechanism.
    fn save_param(&self, model: &mut Self::Model, path: &str) {
        self.save_model(model, path)
    }

    fn load_param(&self, model: &mut Self::Model, path: &str);

    /// Not provided by graph engines; always empty.
    fn load_mean_image(&self, _model: &Self::Model, _path: &str) -> Vec<f32> {
        Vec::new()
    }

    /// Not provided by graph engines; always `None`.
    fn to_json(&self, _model: &Self::Model) -> Option<String> {
        None
    }

    /// Not provided by graph engines; ignored.
    fn set_parameter(&self, _model: &mut Self::Model, _name: &str, _value: f32) {}
}

/// A built model: its descriptor, its exclusively owned session, and the
/// frame size fixed at build time.
pub struct GraphModel<S: Session> {
    descriptor: ModelDescriptor,
    session: ExecutionSession<S>,
    frame_size: NonZeroUsize,
}

impl<S: Session> GraphModel<S> {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn meta(&self) -> &EndpointMetadata {
        &self.descriptor.meta
    }

    /// Elements per sample (`width * height * channels`).
    pub fn frame_size(&self) -> usize {
        self.frame_size.get()
    }

    /// Driver over this model's session, for callers that want the `try_*`
    /// operations and their errors.
    pub fn driver(&mut self) -> ExecutionDriver<'_, S> {
        ExecutionDriver::new(&mut self.session, &self.descriptor.meta, self.frame_size)
    }

    fn close(mut self) {
        self.session.close();
    }
}

/// [`BackendTrain`] over any [`Engine`], resolving models from a
/// [`ModelRepository`].
pub struct GraphBackend<E, R> {
    engine: E,
    repository: R,
}

impl<E: Engine, R: ModelRepository> GraphBackend<E, R> {
    pub fn new(engine: E, repository: R) -> Self {
        Self { engine, repository }
    }
}

impl<E: Engine, R: ModelRepository> BackendTrain for GraphBackend<E, R> {
    type Model = GraphModel<E::Session>;

    fn build_net(
        &self,
        geometry: &DatasetGeometry,
        opts: &RuntimeOptions,
        params: &BackendParams,
        num_classes: usize,
        name: &str,
    ) -> Result<Self::Model> {
        let frame_size = geometry.frame_size()?;
        if geometry.num_classes != num_classes {
            debug!(
                dataset_classes = geometry.num_classes,
                num_classes, "class count differs from dataset, using num_classes"
            );
        }
        let key = geometry.model_key(name, num_classes);
        let descriptor = self.repository.resolve(&key)?;

        let options = SessionOptions::new(opts, params);
        let session = ExecutionSession::open(&self.engine, &descriptor, &options)?;
        info!(model = %key, frame_size = frame_size.get(), "model built");

        Ok(GraphModel {
            descriptor,
            session,
            frame_size,
        })
    }

    fn delete(&self, model: Self::Model) {
        model.close();
    }

    fn train(&self, model: &mut Self::Model, data: &[f32], labels: &[f32]) -> Vec<f32> {
        model.driver().train(data, labels)
    }

    fn predict_with_labels(
        &self,
        model: &mut Self::Model,
        data: &[f32],
        labels: &[f32],
    ) -> Vec<f32> {
        model.driver().predict_with_labels(data, labels)
    }

    fn predict(&self, model: &mut Self::Model, data: &[f32]) -> Vec<f32> {
        model.driver().predict(data)
    }

    fn save_model(&self, model: &mut Self::Model, path: &str) {
        model.driver().save(path)
    }

    fn load_param(&self, model: &mut Self::Model, path: &str) {
        model.driver().restore(path)
    }

    fn load_mean_image(&self, model: &Self::Model, path: &str) -> Vec<f32> {
        debug!(model = model.name(), path, "load_mean_image is not supported");
        Vec::new()
    }

    fn to_json(&self, model: &Self::Model) -> Option<String> {
        debug!(model = model.name(), "to_json is not supported");
        None
    }

    fn set_parameter(&self, model: &mut Self::Model, name: &str, value: f32) {
        debug!(model = model.name(), name, value, "set_parameter is not supported");
    }
}
