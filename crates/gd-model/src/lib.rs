pub mod descriptor;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod metadata;
pub mod repository;

pub use descriptor::ModelDescriptor;
pub use error::{ModelError, Result};
pub use geometry::DatasetGeometry;
pub use graph::GraphDef;
pub use metadata::EndpointMetadata;
pub use repository::{DirectoryRepository, InMemoryRepository, ModelRepository};
