#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// error types for the geometric operations.
pub mod error;

/// eye-based face normalization module.
pub mod face;

/// utilities for interpolation.
pub mod interpolation;

mod parallel;

/// image rotation module.
pub mod rotate;

/// image scaling module.
pub mod scale;

/// coordinate mapping and geometric normalization module.
pub mod warp;

pub use error::GeometryError;
