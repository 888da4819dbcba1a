use std::path::Path;

use morpho_image::{Image, ImageSize};

use crate::error::IoError;

/// Reads an image from the given file path as a single channel 8-bit raster.
///
/// The method tries to read from any image format supported by the image crate.
/// Color images are converted to luma. Higher bit depths are scaled down to 8 bits.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// A grayscale image with a single channel (mono8).
///
/// # Errors
///
/// Returns [`IoError::FileDoesNotExist`] for a missing path and
/// [`IoError::ImageDecodeError`] when the bytes cannot be decoded.
pub fn read_image_any_mono8(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let file_path = file_path.as_ref();

    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    if img.color() != image::ColorType::L8 {
        log::warn!(
            "{} is {:?}, converting to 8-bit luma",
            file_path.display(),
            img.color()
        );
    }

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Image::new(size, img.into_luma8().into_raw())?)
}
