#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// pixel-wise arithmetic between images.
pub mod arithmetic;

/// morphological operations module.
pub mod morphology;

/// border handling used when a neighbourhood reads outside the image.
pub mod padding;

/// module containing parallization utilities.
pub mod parallel;

/// operations to threshold images.
pub mod threshold;
