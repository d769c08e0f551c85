use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use crate::descriptor::ModelDescriptor;
use crate::error::{ModelError, Result};
use crate::graph::GraphDef;
use crate::metadata::EndpointMetadata;

/// Extension of the serialized graph file inside a model directory.
pub const GRAPH_EXTENSION: &str = "pb";
/// Suffix of the endpoint metadata file inside a model directory.
pub const META_SUFFIX: &str = ".meta.json";

/// Resolves a model key (see [`DatasetGeometry::model_key`]) to a descriptor.
///
/// [`DatasetGeometry::model_key`]: crate::geometry::DatasetGeometry::model_key
pub trait ModelRepository: Send + Sync {
    fn resolve(&self, key: &str) -> Result<ModelDescriptor>;
}

/// Repository backed by a directory of `<key>.pb` / `<key>.meta.json` pairs.
#[derive(Debug, Clone)]
pub struct DirectoryRepository {
    root: PathBuf,
}

impl DirectoryRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn graph_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.{}", key, GRAPH_EXTENSION))
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}{}", key, META_SUFFIX))
    }
}

impl ModelRepository for DirectoryRepository {
    /// Reads and validates `<key>.meta.json`, then memory-maps `<key>.pb`.
    ///
    /// Either file missing yields `ModelError::NotFound`.
    fn resolve(&self, key: &str) -> Result<ModelDescriptor> {
        let graph_path = self.graph_path(key);
        let meta_path = self.meta_path(key);
        if !graph_path.is_file() || !meta_path.is_file() {
            debug!(key, root = %self.root.display(), "model files not found");
            return Err(ModelError::NotFound {
                key: key.to_string(),
            });
        }

        let meta = EndpointMetadata::from_json(&std::fs::read_to_string(&meta_path)?)?;
        let graph = GraphDef::open(&graph_path)?;
        debug!(key, graph_bytes = graph.len(), "resolved model");
        Ok(ModelDescriptor::new(key, graph, meta))
    }
}

/// Repository holding descriptors in memory.
///
/// Resolution hands out clones; graph bytes are shared, not copied.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    models: HashMap<String, ModelDescriptor>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `descriptor` under its own name, replacing any previous entry.
    pub fn insert(&mut self, descriptor: ModelDescriptor) {
        self.models.insert(descriptor.name.clone(), descriptor);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, descriptor: ModelDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl ModelRepository for InMemoryRepository {
    fn resolve(&self, key: &str) -> Result<ModelDescriptor> {
        self.models
            .get(key)
            .cloned()
            .ok_or_else(|| ModelError::NotFound {
                key: key.to_string(),
            })
    }
}
