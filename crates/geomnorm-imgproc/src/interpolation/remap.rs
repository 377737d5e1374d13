use geomnorm_image::{Image, ImageDtype, Mask};

use super::SampleGrid;
use crate::error::{ensure_non_empty, ensure_shape, GeometryError};
use crate::parallel;
use crate::warp::Point2;

/// Apply a generic geometric transformation to an image.
///
/// Every destination pixel `(row, col)` is bilinearly sampled from `src` at the
/// coordinate returned by `map(row, col)`. Destination pixels without a valid
/// sample keep their value. When `dst_mask` is given it receives the validity
/// of every destination pixel.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `src_mask` - Optional validity mask of the input image.
/// * `dst` - The output image.
/// * `dst_mask` - Optional validity mask of the output image.
/// * `map` - The destination-to-source coordinate map.
///
/// # Errors
///
/// * The input and output images must not be empty.
/// * Each mask must have the shape of the image it belongs to.
///
/// All checks run before any pixel is written.
pub fn remap<T, U, const C: usize>(
    src: &Image<T, C>,
    src_mask: Option<&Mask>,
    dst: &mut Image<U, C>,
    dst_mask: Option<&mut Mask>,
    map: impl Fn(usize, usize) -> Point2 + Send + Sync,
) -> Result<(), GeometryError>
where
    T: ImageDtype,
    U: ImageDtype,
{
    ensure_non_empty("source image", src.size())?;
    ensure_non_empty("destination image", dst.size())?;
    if let Some(mask) = src_mask {
        ensure_shape(src.size(), mask.size())?;
    }
    if let Some(mask) = dst_mask.as_deref() {
        ensure_shape(dst.size(), mask.size())?;
    }

    let grid = SampleGrid::from_fn(dst.size(), map);
    log::trace!("remap {} -> {}", src.size(), dst.size());

    parallel::par_iter_rows_resample(src, src_mask, dst, &grid);
    if let Some(mask) = dst_mask {
        parallel::par_iter_rows_mask(src, src_mask, mask, &grid);
    }

    Ok(())
}
