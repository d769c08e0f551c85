//! Conversion between flat `f32` buffers and engine tensors.
//!
//! Feeds go in as rank-2 `[batch, width]` f32 tensors (or a broadcast string
//! tensor for checkpoint paths). Fetched outputs come back in whatever dtype
//! the graph produced and are flattened into one `Vec<f32>` in fetch order.

use tracing::warn;

use crate::dtype::DType;
use crate::error::{Result, TensorError};
use crate::shape::Shape;
use crate::storage::Storage;
use crate::tensor::Tensor;

/// Derive the batch size of a flat buffer holding `frame_size`-element rows.
///
/// The buffer must be an exact multiple of `frame_size`; an empty buffer is
/// a batch of zero rows.
pub fn derive_batch(len: usize, frame_size: usize) -> Result<usize> {
    if frame_size == 0 || len % frame_size != 0 {
        return Err(TensorError::Batch {
            len,
            width: frame_size,
        });
    }
    Ok(len / frame_size)
}

/// Derive the per-row width of a label buffer for an already known batch.
///
/// A zero-row batch has no label width, so it is rejected here.
pub fn label_width(len: usize, batch: usize) -> Result<usize> {
    if batch == 0 || len == 0 || len % batch != 0 {
        return Err(TensorError::LabelBatch { len, batch });
    }
    Ok(len / batch)
}

/// One flat buffer destined for a named graph endpoint.
#[derive(Debug, Clone)]
pub struct FeedBuffer<'a> {
    pub endpoint: &'a str,
    pub data: &'a [f32],
    pub shape: Shape,
}

impl<'a> FeedBuffer<'a> {
    pub fn new(endpoint: &'a str, data: &'a [f32], shape: Shape) -> Self {
        FeedBuffer {
            endpoint,
            data,
            shape,
        }
    }
}

/// Ordered endpoint name → tensor bindings for a single run.
///
/// Built fresh for every call and dropped when the call returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedSet {
    entries: Vec<(String, Tensor)>,
}

impl FeedSet {
    /// An empty feed set, as used by the init run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `tensor` to `endpoint`, keeping insertion order.
    pub fn push(&mut self, endpoint: impl Into<String>, tensor: Tensor) {
        self.entries.push((endpoint.into(), tensor));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tensor)> {
        self.entries.iter().map(|(name, t)| (name.as_str(), t))
    }

    /// Endpoint names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Look up the tensor bound to `endpoint`.
    pub fn get(&self, endpoint: &str) -> Option<&Tensor> {
        self.entries
            .iter()
            .find(|(name, _)| name == endpoint)
            .map(|(_, t)| t)
    }
}

/// Build a feed set from flat buffers.
///
/// Every shape must be rank 2 and describe exactly as many elements as its
/// buffer holds. Data is copied row-major as given.
pub fn encode(buffers: &[FeedBuffer<'_>]) -> Result<FeedSet> {
    let mut feeds = FeedSet::new();
    for buf in buffers {
        buf.shape.expect_rank(2)?;
        let tensor = Tensor::from_f32(buf.data.to_vec(), buf.shape.clone())?;
        feeds.push(buf.endpoint, tensor);
    }
    Ok(feeds)
}

/// Feed set carrying a checkpoint path: a `[1]` string tensor on `endpoint`.
pub fn path_feed(endpoint: &str, path: &str) -> FeedSet {
    let mut feeds = FeedSet::new();
    feeds.push(endpoint, Tensor::filled_string(path, Shape::vector(1)));
    feeds
}

/// Result of decoding one fetched tensor.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Values(Vec<f32>),
    Unsupported(DType),
}

impl Decoded {
    /// The decoded values, or an empty vector for an unsupported dtype.
    pub fn into_values(self) -> Vec<f32> {
        match self {
            Decoded::Values(v) => v,
            Decoded::Unsupported(_) => Vec::new(),
        }
    }
}

/// Decode a fetched tensor into f32 values.
///
/// F32 is copied as is; I32 and I64 are widened (value-equal, not
/// bit-equal). Any other dtype is reported as unsupported.
pub fn decode(tensor: &Tensor) -> Decoded {
    match tensor.storage() {
        Storage::F32(v) => Decoded::Values(v.clone()),
        Storage::I64(v) => Decoded::Values(v.iter().map(|&x| x as f32).collect()),
        Storage::I32(v) => Decoded::Values(v.iter().map(|&x| x as f32).collect()),
        other => Decoded::Unsupported(other.dtype()),
    }
}

/// Concatenated outputs plus the slots that had to be skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flattened {
    pub values: Vec<f32>,
    /// `(output index, dtype)` for each output that contributed nothing.
    pub skipped: Vec<(usize, DType)>,
}

/// Decode every output in order and concatenate the results.
///
/// Unsupported outputs contribute an empty slice and a warning; this never
/// fails, so one odd output cannot abort a batch.
pub fn flatten_outputs(outputs: &[Tensor]) -> Flattened {
    let mut flat = Flattened {
        values: Vec::with_capacity(outputs.iter().map(Tensor::numel).sum()),
        skipped: Vec::new(),
    };
    for (i, out) in outputs.iter().enumerate() {
        match decode(out) {
            Decoded::Values(v) => flat.values.extend_from_slice(&v),
            Decoded::Unsupported(dtype) => {
                warn!(output = i, %dtype, "dtype not supported, output skipped");
                flat.skipped.push((i, dtype));
            }
        }
    }
    flat
}

/// Like [`flatten_outputs`], returning only the values.
pub fn flatten(outputs: &[Tensor]) -> Vec<f32> {
    flatten_outputs(outputs).values
}
