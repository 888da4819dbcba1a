#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`error::IoError`] variants for file access and encoding/decoding failures.
pub mod error;

/// High-level image reading functions.
///
/// Decodes any format supported by the `image` crate straight to 8-bit luma.
/// See [`functional::read_image_any_mono8`].
pub mod functional;

/// PNG image encoding and decoding.
///
/// Read and write single channel 8-bit PNG images.
pub mod png;

pub use error::IoError;
