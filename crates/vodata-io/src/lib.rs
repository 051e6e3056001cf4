#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`IoError`](error::IoError) variants for file access and PNG
/// encoding/decoding failures.
pub mod error;

/// PNG image encoding and decoding.
///
/// Read PNG images of any colour type as 8-bit RGB and write 8-bit RGB images.
pub mod png;

pub use crate::error::IoError;
