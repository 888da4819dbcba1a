//! Grayscale and binary mathematical morphology.
//!
//! Erosion and dilation are rank filters over the neighbourhood described by a
//! [`Kernel`]. Opening, closing, gradient, top-hat and black-hat are composed
//! from them. Unless configured otherwise through [`MorphOptions`], pixels
//! outside the image are read as zero (background).

/// Error types used for morphological operations.
pub mod error;
pub use error::MorphologyError;

/// Kernel (structuring element) utilities.
pub mod kernel;
pub use kernel::{Kernel, KernelShape};

/// Erosion, dilation and the operations derived from them.
pub mod ops;
pub use ops::{
    black_hat, close, dilate, dilate_with_options, erode, erode_with_options, gradient,
    morphology_ex, open, top_hat, MorphOp, MorphOptions,
};
