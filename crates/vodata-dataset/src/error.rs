use std::path::PathBuf;

/// Error types for [`SequenceIndex`](crate::SequenceIndex).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SequenceIndexError {
    /// The global index is not below the number of samples.
    #[error("Index {index} is out of range for {len} samples")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of addressable samples.
        len: usize,
    },

    /// A sequence cannot hold a single frame pair.
    #[error("Sequence {ordinal} has {size} frames, at least 2 are required")]
    SequenceTooShort {
        /// Position of the sequence in the table.
        ordinal: usize,
        /// Its number of frames.
        size: usize,
    },
}

/// Error types for the dataset module.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The pose file of a sequence could not be read or parsed.
    #[error("Failed to load pose file {path}")]
    PoseFile {
        /// The pose file.
        path: PathBuf,
        /// The underlying failure, e.g. a malformed pose record.
        #[source]
        source: vodata_pose::PoseError,
    },

    /// Sequence index failure.
    #[error(transparent)]
    Index(#[from] SequenceIndexError),

    /// The image loader failed. The loader's error is kept as the source.
    #[error("Failed to load image {path}")]
    ImageLoadError {
        /// The image that was requested.
        path: PathBuf,
        /// The loader's error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The two frames of a sample could not be stacked.
    #[error("Failed to stack frame pair. {0}")]
    ImageStack(#[from] vodata_image::ImageError),

    /// The configuration is not usable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration. {0}")]
    ConfigError(#[from] serde_json::Error),

    /// The configuration file could not be read or written.
    #[error("Failed to access configuration file. {0}")]
    ConfigIo(#[from] std::io::Error),
}
