use std::num::NonZeroUsize;

use crate::error::{ModelError, Result};

/// Shape of one dataset sample plus its class count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetGeometry {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub num_classes: usize,
}

impl DatasetGeometry {
    pub fn new(width: usize, height: usize, channels: usize, num_classes: usize) -> Self {
        Self {
            width,
            height,
            channels,
            num_classes,
        }
    }

    /// Number of scalar elements per sample: `width * height * channels`.
    pub fn frame_size(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.width * self.height * self.channels).ok_or(
            ModelError::InvalidGeometry {
                width: self.width,
                height: self.height,
                channels: self.channels,
            },
        )
    }

    /// Repository key for `name` trained on this geometry with `num_classes`
    /// outputs, e.g. `lenet_28x28x1_10`.
    pub fn model_key(&self, name: &str, num_classes: usize) -> String {
        format!(
            "{}_{}x{}x{}_{}",
            name, self.width, self.height, self.channels, num_classes
        )
    }
}
