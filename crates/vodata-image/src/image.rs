use crate::error::ImageError;

/// Width and height of a frame, in pixels.
///
/// Built from `[width, height]`:
///
/// ```
/// use vodata_image::ImageSize;
///
/// let size = ImageSize::from([1241, 376]);
/// assert_eq!(size.width, 1241);
/// assert_eq!(size.to_string(), "1241x376");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels.
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from([width, height]: [usize; 2]) -> Self {
        Self { width, height }
    }
}

/// Represents an image with pixel data.
///
/// The pixels are stored contiguously in row-major (H, W, C) order, where H is the
/// height of the image, W the width and C the number of channels.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const CHANNELS: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use vodata_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0u8; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        // check if the data length matches the image size
        if data.len() != size.area() * CHANNELS {
            return Err(ImageError::InvalidChannelShape(
                data.len(),
                size.area() * CHANNELS,
            ));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size and default pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `val` - The default value of the pixel data.
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.area() * CHANNELS];
        Image::new(size, data)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.height()
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// Get the pixel data as a flat slice in (H, W, C) order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the pixel data as a mutable flat slice in (H, W, C) order.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Get a reference to the value at `[row, col, channel]`, if in bounds.
    pub fn get(&self, index: [usize; 3]) -> Option<&T> {
        let [y, x, ch] = index;
        if y >= self.height() || x >= self.width() || ch >= CHANNELS {
            return None;
        }
        self.data.get((y * self.width() + x) * CHANNELS + ch)
    }
}
