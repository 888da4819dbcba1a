use morpho_image::ImageError;

use crate::parallel::ParallelError;

/// Errors related to morphological operations.
///
/// Every variant is raised before any output buffer is produced.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MorphologyError {
    /// The kernel has a zero dimension, mismatched data or an anchor outside its bounds.
    #[error("Invalid kernel: {0}")]
    InvalidKernel(String),

    /// The input image has zero width or height.
    #[error("Input image is empty")]
    EmptyImage,

    /// The operation was asked to run fewer than one time.
    #[error("Iterations must be >= 1, got {0}")]
    InvalidIterationCount(usize),

    /// Error from the underlying image container.
    #[error(transparent)]
    ImageError(#[from] ImageError),

    /// Error scheduling the per-row work.
    #[error(transparent)]
    ParallelError(#[from] ParallelError),
}
