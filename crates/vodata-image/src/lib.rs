#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image representation for computer vision purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

/// Stacking of several frames into one contiguous block.
pub mod stack;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
pub use crate::stack::{stack_images, ImageStack};
