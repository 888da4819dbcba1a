use std::{fs, fs::File, io::Read, path::Path};

use ::png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use morpho_image::{Image, ImageSize};

use crate::error::IoError;

/// Read a PNG image with a single channel (mono8).
///
/// Low bit depth images are expanded and 16-bit images are stripped to 8 bits.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A grayscale image with a single channel (mono8).
///
/// # Errors
///
/// [`IoError::FileDoesNotExist`], [`IoError::InvalidFileExtension`], or
/// [`IoError::PngDecodeError`] when the data is corrupt or not grayscale.
pub fn read_image_png_mono8(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    match file_path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("png") => {}
        _ => return Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
    }

    let file = fs::File::open(file_path)?;
    let (buf, size) = decode_png_impl(file)?;

    log::debug!("read {} from {}", size, file_path.display());

    Ok(Image::new(size, buf)?)
}

/// Decodes a PNG image with a single channel (mono8) from raw bytes.
///
/// # Arguments
///
/// - `bytes` - Raw bytes of the png file
pub fn decode_image_png_mono8(bytes: &[u8]) -> Result<Image<u8, 1>, IoError> {
    let (buf, size) = decode_png_impl(bytes)?;
    Ok(Image::new(size, buf)?)
}

/// Writes the given PNG _(grayscale 8-bit)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image to encode.
pub fn write_image_png_mono8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
) -> Result<(), IoError> {
    let size = image.size();
    let width = u32::try_from(size.width)
        .map_err(|_| IoError::PngEncodingError(format!("width {} exceeds u32", size.width)))?;
    let height = u32::try_from(size.height)
        .map_err(|_| IoError::PngEncodingError(format!("height {} exceeds u32", size.height)))?;

    let file = File::create(file_path)?;

    let mut encoder = Encoder::new(file, width, height);
    encoder.set_color(ColorType::Grayscale);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(image.as_slice())
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    Ok(())
}

// utility function to decode png data into a mono8 buffer
fn decode_png_impl<R: Read>(source: R) -> Result<(Vec<u8>, ImageSize), IoError> {
    let mut decoder = Decoder::new(source);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);

    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    if info.color_type != ColorType::Grayscale || info.bit_depth != BitDepth::Eight {
        return Err(IoError::PngDecodeError(format!(
            "expected 8-bit grayscale, got {:?} at {:?}",
            info.color_type, info.bit_depth
        )));
    }

    buf.truncate(info.buffer_size());

    Ok((
        buf,
        ImageSize {
            width: info.width as usize,
            height: info.height as usize,
        },
    ))
}
