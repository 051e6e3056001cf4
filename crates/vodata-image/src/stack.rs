use crate::{error::ImageError, Image, ImageSize};

/// A block of equally sized images laid out contiguously as (N, H, W, C).
///
/// The images keep the order in which they were stacked.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageStack<T, const CHANNELS: usize> {
    size: ImageSize,
    len: usize,
    data: Vec<T>,
}

impl<T, const CHANNELS: usize> ImageStack<T, CHANNELS> {
    /// The (N, H, W, C) shape of the stack.
    pub fn shape(&self) -> [usize; 4] {
        [self.len, self.size.height, self.size.width, CHANNELS]
    }

    /// The size of every image in the stack.
    pub fn image_size(&self) -> ImageSize {
        self.size
    }

    /// The number of stacked images.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the stack holds no image. Never true for stacks built by [`stack_images`].
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The whole block as a flat slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The pixels of the `index`-th image, if any.
    pub fn image_slice(&self, index: usize) -> Option<&[T]> {
        let stride = self.size.area() * CHANNELS;
        if index >= self.len {
            return None;
        }
        Some(&self.data[index * stride..(index + 1) * stride])
    }

    /// Cast the whole block to a different type and scale it.
    ///
    /// # Errors
    ///
    /// If a value cannot be represented in the new type, an error is returned.
    pub fn cast_and_scale<U>(self, scale: U) -> Result<ImageStack<U, CHANNELS>, ImageError>
    where
        U: num_traits::NumCast + std::ops::Mul<Output = U> + Copy,
        T: num_traits::NumCast + Copy,
    {
        let data = self
            .data
            .iter()
            .map(|&x| U::from(x).map(|xu| xu * scale).ok_or(ImageError::CastError))
            .collect::<Result<Vec<U>, ImageError>>()?;

        Ok(ImageStack {
            size: self.size,
            len: self.len,
            data,
        })
    }
}

/// Stack images into one contiguous (N, H, W, C) block, first image first.
///
/// # Arguments
///
/// * `images` - The images to stack. All must have the same size.
///
/// # Errors
///
/// Returns [`ImageError::EmptyStack`] for an empty input and
/// [`ImageError::ImageSizeMismatch`] when the sizes differ.
///
/// # Example
///
/// ```
/// use vodata_image::{stack_images, Image, ImageSize};
///
/// let size = ImageSize { width: 4, height: 2 };
/// let a = Image::<u8, 3>::from_size_val(size, 1).unwrap();
/// let b = Image::<u8, 3>::from_size_val(size, 2).unwrap();
///
/// let stack = stack_images(&[a, b]).unwrap();
/// assert_eq!(stack.shape(), [2, 2, 4, 3]);
/// ```
pub fn stack_images<T, const CHANNELS: usize>(
    images: &[Image<T, CHANNELS>],
) -> Result<ImageStack<T, CHANNELS>, ImageError>
where
    T: Clone,
{
    let first = images.first().ok_or(ImageError::EmptyStack)?;
    let size = first.size();

    let mut data = Vec::with_capacity(images.len() * first.as_slice().len());
    for image in images {
        if image.size() != size {
            return Err(ImageError::ImageSizeMismatch(size, image.size()));
        }
        data.extend_from_slice(image.as_slice());
    }

    Ok(ImageStack {
        size,
        len: images.len(),
        data,
    })
}
