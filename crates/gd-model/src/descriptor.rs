use crate::graph::GraphDef;
use crate::metadata::EndpointMetadata;

/// A resolved model: its serialized graph plus the endpoint names needed to
/// drive it.
#[derive(Debug, Clone)]
pub struct ModelDescriptor {
    /// Repository key the descriptor was resolved from.
    pub name: String,
    pub graph: GraphDef,
    pub meta: EndpointMetadata,
}

impl ModelDescriptor {
    pub fn new(name: impl Into<String>, graph: GraphDef, meta: EndpointMetadata) -> Self {
        Self {
            name: name.into(),
            graph,
            meta,
        }
    }
}
