/// Error types for the pose module.
#[derive(Debug, thiserror::Error)]
pub enum PoseError {
    /// A pose record that does not hold exactly 12 finite values.
    #[error("Malformed pose record at line {line}: {reason}")]
    MalformedPoseRecord {
        /// 1-based line number of the record.
        line: usize,
        /// What is wrong with the record.
        reason: String,
    },

    /// Error reading or writing the pose file.
    #[error("error reading or writing pose file")]
    IoError(#[from] std::io::Error),
}
