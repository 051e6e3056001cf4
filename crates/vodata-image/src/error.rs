use crate::ImageSize;

/// An error type for the image module.
#[derive(thiserror::Error, Debug)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images that must agree in size do not.
    #[error("Image size mismatch: {0} vs {1}")]
    ImageSizeMismatch(ImageSize, ImageSize),

    /// Error when stacking an empty list of images.
    #[error("Cannot stack an empty list of images")]
    EmptyStack,

    /// Error when a pixel value cannot be represented in the target type.
    #[error("Failed to cast image data")]
    CastError,
}
