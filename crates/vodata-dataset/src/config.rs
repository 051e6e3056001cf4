use std::{
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// Number of frames in one sample.
pub const DEFAULT_TRAJECTORY_LENGTH: usize = 2;

/// Sequence presets of the odometry benchmark layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceSplit {
    /// Sequences `00` to `07`.
    Train,
    /// Sequence `00` only.
    Test,
}

impl SequenceSplit {
    /// The sequence identifiers of the split.
    pub fn sequences(&self) -> Vec<String> {
        match self {
            SequenceSplit::Train => (0..8).map(|i| format!("{:02}", i)).collect(),
            SequenceSplit::Test => vec!["00".to_string()],
        }
    }
}

/// Where the data lives and which sequences to use.
///
/// ```text
/// <base_path>/poses/<sequence>.txt
/// <base_path>/sequences/<sequence>/image_2/<frame:06>.png
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoDatasetConfig {
    /// Root of the data.
    pub base_path: PathBuf,
    /// Sequence identifiers, in the order their samples are numbered.
    pub sequences: Vec<String>,
    /// Frames per sample. Only two-frame samples are produced.
    #[serde(default = "default_trajectory_length")]
    pub trajectory_length: usize,
}

fn default_trajectory_length() -> usize {
    DEFAULT_TRAJECTORY_LENGTH
}

impl VoDatasetConfig {
    /// Create a configuration for the given sequences.
    pub fn new(base_path: impl Into<PathBuf>, sequences: Vec<String>) -> Self {
        Self {
            base_path: base_path.into(),
            sequences,
            trajectory_length: DEFAULT_TRAJECTORY_LENGTH,
        }
    }

    /// Create a configuration for one of the preset splits.
    pub fn from_split(base_path: impl Into<PathBuf>, split: SequenceSplit) -> Self {
        Self::new(base_path, split.sequences())
    }

    /// Read a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        let config = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(config)
    }

    /// Write the configuration as pretty printed JSON.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<(), DatasetError> {
        let mut writer = std::io::BufWriter::new(std::fs::File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Check that the configuration can back a dataset.
    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.sequences.is_empty() {
            return Err(DatasetError::InvalidConfig(
                "no sequence selected".to_string(),
            ));
        }

        if self.trajectory_length < DEFAULT_TRAJECTORY_LENGTH {
            return Err(DatasetError::InvalidConfig(format!(
                "trajectory length must be at least {}, got {}",
                DEFAULT_TRAJECTORY_LENGTH, self.trajectory_length
            )));
        }

        if self.trajectory_length != DEFAULT_TRAJECTORY_LENGTH {
            log::warn!(
                "trajectory length {} requested, samples hold {} frames",
                self.trajectory_length,
                DEFAULT_TRAJECTORY_LENGTH
            );
        }

        Ok(())
    }

    /// Pose file of a sequence.
    pub fn pose_path(&self, sequence: &str) -> PathBuf {
        self.base_path
            .join("poses")
            .join(format!("{}.txt", sequence))
    }

    /// Image of a frame of a sequence.
    pub fn image_path(&self, sequence: &str, frame: usize) -> PathBuf {
        self.base_path
            .join("sequences")
            .join(sequence)
            .join("image_2")
            .join(format!("{:06}.png", frame))
    }
}
