use std::path::Path;

use vodata_image::Image;
use vodata_io::{png::read_image_png_rgb8, IoError};

/// Loads the image stored at a path.
///
/// Implementations must be reentrant for the dataset to be shared between threads.
pub trait ImageLoader {
    /// The decoded image.
    type Image;
    /// The loader's failure, handed back to the caller unchanged.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the image at `path`.
    fn load(&self, path: &Path) -> Result<Self::Image, Self::Error>;
}

/// Reads PNG frames as 8-bit RGB.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngImageLoader;

impl ImageLoader for PngImageLoader {
    type Image = Image<u8, 3>;
    type Error = IoError;

    fn load(&self, path: &Path) -> Result<Self::Image, Self::Error> {
        read_image_png_rgb8(path)
    }
}

/// A per-image transform applied to every loaded frame.
///
/// Implemented for any `Fn(I) -> I`.
pub trait ImageTransform<I> {
    /// Transform one image.
    fn apply(&self, image: I) -> I;
}

impl<I, F> ImageTransform<I> for F
where
    F: Fn(I) -> I,
{
    fn apply(&self, image: I) -> I {
        self(image)
    }
}

/// The transform that returns its input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<I> ImageTransform<I> for Identity {
    fn apply(&self, image: I) -> I {
        image
    }
}
