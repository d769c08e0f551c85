use std::fmt;
use std::path::Path;
use std::sync::Arc;

use memmap2::Mmap;

use crate::error::{ModelError, Result};

enum GraphBytes {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

/// A serialized computation graph, opaque to this crate.
///
/// The bytes are either owned or memory-mapped from disk, and are shared
/// read-only between clones. Only the engine interprets them.
#[derive(Clone)]
pub struct GraphDef {
    bytes: Arc<GraphBytes>,
}

impl GraphDef {
    /// Wrap an in-memory serialized graph.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> GraphDef {
        GraphDef {
            bytes: Arc::new(GraphBytes::Owned(bytes.into())),
        }
    }

    /// Memory-map a serialized graph file.
    ///
    /// Empty files are rejected; there is nothing an engine could build from
    /// them.
    pub fn open(path: &Path) -> Result<GraphDef> {
        let file = std::fs::File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Err(ModelError::EmptyGraph(path.to_path_buf()));
        }
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(GraphDef {
            bytes: Arc::new(GraphBytes::Mapped(mmap)),
        })
    }

    /// The serialized graph.
    pub fn as_bytes(&self) -> &[u8] {
        match self.bytes.as_ref() {
            GraphBytes::Owned(b) => &b[..],
            GraphBytes::Mapped(m) => &m[..],
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the bytes are backed by a file mapping.
    pub fn is_mapped(&self) -> bool {
        matches!(self.bytes.as_ref(), GraphBytes::Mapped(_))
    }
}

impl fmt::Debug for GraphDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphDef")
            .field("len", &self.len())
            .field("mapped", &self.is_mapped())
            .finish()
    }
}
