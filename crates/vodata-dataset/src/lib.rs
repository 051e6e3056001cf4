#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Dataset configuration and sequence presets.
pub mod config;

/// The visual odometry dataset.
pub mod dataset;

/// Error types for the dataset module.
pub mod error;

/// Image loading and transform collaborators.
pub mod loader;

/// Mapping of flat sample indices onto (sequence, frame) pairs.
pub mod sequence_index;

pub use crate::config::{SequenceSplit, VoDatasetConfig};
pub use crate::dataset::{ImagePair, Sample, Sequence, VoDataset};
pub use crate::error::{DatasetError, SequenceIndexError};
pub use crate::loader::{Identity, ImageLoader, ImageTransform, PngImageLoader};
pub use crate::sequence_index::SequenceIndex;
