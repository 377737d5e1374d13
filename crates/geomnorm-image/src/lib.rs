#![deny(missing_docs)]
//! Image and mask containers for geometric normalization

/// image representation for computer vision purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageDtype, ImageSize, Mask};
