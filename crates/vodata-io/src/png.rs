use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use vodata_image::{Image, ImageSize};

use crate::error::IoError;

/// Read a PNG image as three channels (rgb8).
///
/// Palette and low bit depth images are expanded, 16-bit samples are stripped
/// to 8 bits, grayscale is replicated into the three channels and any alpha
/// channel is dropped.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A RGB image with three channels (rgb8).
pub fn read_image_png_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let (buf, size, color_type) = read_png_impl(file_path)?;

    let rgb = match color_type {
        ColorType::Rgb => buf,
        ColorType::Rgba => buf
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect(),
        ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g]).collect(),
        ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0]])
            .collect(),
        // palettes are expanded to Rgb or Rgba by the decoder, never taken
        ColorType::Indexed => {
            return Err(IoError::UnsupportedColorType(format!("{:?}", color_type)))
        }
    };

    Ok(Image::new(size, rgb)?)
}

// utility function to read the png file normalised to 8 bits per sample
fn read_png_impl(
    file_path: impl AsRef<Path>,
) -> Result<(Vec<u8>, ImageSize, ColorType), IoError> {
    // verify the file exists
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    // verify the file extension
    if let Some(extension) = file_path.extension() {
        if extension != "png" {
            return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
        }
    } else {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let file = File::open(file_path)?;
    let mut decoder = Decoder::new(BufReader::new(file));
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);

    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;
    let (color_type, _) = reader.output_color_type();

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;
    buf.truncate(info.buffer_size());

    let size = ImageSize {
        width: info.width as usize,
        height: info.height as usize,
    };

    Ok((buf, size, color_type))
}

/// Writes the given PNG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image to encode.
pub fn write_image_png_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
) -> Result<(), IoError> {
    write_png_impl(
        file_path,
        image.as_slice(),
        image.size(),
        BitDepth::Eight,
        ColorType::Rgb,
    )
}

/// Writes the given PNG _(grayscale 8-bit)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image to encode.
pub fn write_image_png_gray8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
) -> Result<(), IoError> {
    write_png_impl(
        file_path,
        image.as_slice(),
        image.size(),
        BitDepth::Eight,
        ColorType::Grayscale,
    )
}

fn write_png_impl(
    file_path: impl AsRef<Path>,
    image_data: &[u8],
    image_size: ImageSize,
    // Make sure you set `depth` correctly
    depth: BitDepth,
    color_type: ColorType,
) -> Result<(), IoError> {
    let file = File::create(file_path)?;

    let mut encoder = Encoder::new(
        BufWriter::new(file),
        image_size.width as u32,
        image_size.height as u32,
    );
    encoder.set_color(color_type);
    encoder.set_depth(depth);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(image_data)
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    Ok(())
}
