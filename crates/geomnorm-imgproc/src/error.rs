use geomnorm_image::{ImageError, ImageSize};

/// An error type for the geometric transformations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GeometryError {
    /// A transform parameter or output size is not usable.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A destination buffer or mask has the wrong shape.
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// The shape required by the operation.
        expected: ImageSize,
        /// The shape that was provided.
        actual: ImageSize,
    },

    /// Error coming from the image container.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Check that `actual` equals `expected`.
pub(crate) fn ensure_shape(expected: ImageSize, actual: ImageSize) -> Result<(), GeometryError> {
    if expected != actual {
        return Err(GeometryError::ShapeMismatch { expected, actual });
    }
    Ok(())
}

/// Reject images with a zero dimension.
pub(crate) fn ensure_non_empty(what: &str, size: ImageSize) -> Result<(), GeometryError> {
    if size.is_empty() {
        return Err(GeometryError::InvalidParameter(format!(
            "{what} must not be empty, got {size}"
        )));
    }
    Ok(())
}
