//! Pixel interpolation for geometric transformations.
//!
//! Sampling uses pixel-index coordinates: the integer coordinate `(r, c)` is the
//! sample stored at row `r` and column `c`. Bilinear interpolation takes the
//! floor-based 2x2 neighborhood. Neighbors outside the image, or switched off
//! by a mask, are dropped and the remaining weights are renormalized. A sample
//! is invalid when no remaining neighbor carries weight. Usable neighbors with
//! zero weight do not count: `(-1.0, 0.0)`, or an integer coordinate whose own
//! pixel is masked out, is invalid.

mod bilinear;
mod grid;
mod remap;

pub(crate) use bilinear::BilinearTaps;
pub(crate) use grid::SampleGrid;
pub use remap::remap;

use geomnorm_image::{Image, ImageDtype, Mask};

use crate::error::{ensure_shape, GeometryError};

/// Sample one channel of an image at a fractional coordinate.
///
/// # Arguments
///
/// * `image` - The input image.
/// * `mask` - An optional validity mask with the shape of one image plane.
/// * `row` - The fractional row coordinate.
/// * `col` - The fractional column coordinate.
/// * `channel` - The channel to sample.
///
/// # Returns
///
/// The interpolated value, or `None` if no usable neighbor carries weight.
///
/// # Errors
///
/// Fails if the mask shape differs from the image or the channel does not exist.
///
/// # Example
///
/// ```
/// use geomnorm_image::Image;
/// use geomnorm_imgproc::interpolation::sample_bilinear;
///
/// let image = Image::<u8, 1>::new([2, 2].into(), vec![0, 10, 20, 30]).unwrap();
/// let value = sample_bilinear(&image, None, 0.5, 0.5, 0).unwrap();
/// assert_eq!(value, Some(15.0));
/// ```
pub fn sample_bilinear<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    mask: Option<&Mask>,
    row: f64,
    col: f64,
    channel: usize,
) -> Result<Option<f64>, GeometryError> {
    if let Some(mask) = mask {
        ensure_shape(image.size(), mask.size())?;
    }
    let plane = image.plane(channel)?;

    let taps = BilinearTaps::new(image.size(), mask.map(|m| m.as_slice()), row, col);
    Ok(taps.map(|t| t.apply(plane)))
}
