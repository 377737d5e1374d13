use geomnorm_image::{Image, ImageDtype, ImageSize, Mask};

use crate::error::GeometryError;
use crate::interpolation::remap;
use crate::warp::{CoordinateMapper, Point2};

/// Slack absorbed before rounding a rotated extent up to whole pixels.
const EXTENT_EPSILON: f64 = 1e-6;

/// The rotation center of an image of the given size.
pub fn image_center(size: ImageSize) -> Point2 {
    Point2::new(size.height as f64 / 2.0, size.width as f64 / 2.0)
}

/// The mapper used to rotate an image of `src_size` into a canvas of `dst_size`.
///
/// Positive angles turn the content counter-clockwise on screen.
fn rotation_mapper(
    src_size: ImageSize,
    dst_size: ImageSize,
    angle: f64,
) -> Result<CoordinateMapper, GeometryError> {
    CoordinateMapper::new(-angle, 1.0, image_center(src_size), image_center(dst_size))
}

/// Compute the smallest canvas containing an image rotated about its center.
///
/// The four image corners are rotated about the center and the bounding box
/// of the result is rounded up to whole pixels.
///
/// # Arguments
///
/// * `size` - The size of the image to rotate.
/// * `angle` - The rotation angle in degrees.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidParameter`] if the angle is not finite.
///
/// # Example
///
/// ```
/// use geomnorm_image::ImageSize;
/// use geomnorm_imgproc::rotate::get_rotated_output_shape;
///
/// let size = get_rotated_output_shape([100, 50].into(), 90.0).unwrap();
/// assert_eq!(size, ImageSize { width: 50, height: 100 });
/// ```
pub fn get_rotated_output_shape(size: ImageSize, angle: f64) -> Result<ImageSize, GeometryError> {
    let mapper = rotation_mapper(size, ImageSize::from([0, 0]), angle)?;

    let (h, w) = (size.height as f64, size.width as f64);
    let corners = [(0.0, 0.0), (0.0, w), (h, 0.0), (h, w)].map(|(r, c)| {
        mapper.map_point(Point2::new(r, c))
    });

    let (mut min, mut max) = (corners[0], corners[0]);
    for p in &corners[1..] {
        min = Point2::new(min.row.min(p.row), min.col.min(p.col));
        max = Point2::new(max.row.max(p.row), max.col.max(p.col));
    }

    let extent = |lo: f64, hi: f64| (hi - lo - EXTENT_EPSILON).ceil().max(0.0) as usize;
    let rotated = ImageSize {
        width: extent(min.col, max.col),
        height: extent(min.row, max.row),
    };
    log::debug!("rotating {} by {} degrees needs {}", size, angle, rotated);

    Ok(rotated)
}

/// Rotate an image about its center into the destination canvas.
///
/// The source center is placed at the destination center. A positive angle
/// turns the image content counter-clockwise. Destination pixels that are not
/// covered by the source keep their value.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output canvas, usually sized with [`get_rotated_output_shape`].
/// * `angle` - The rotation angle in degrees.
///
/// # Example
///
/// ```
/// use geomnorm_image::Image;
/// use geomnorm_imgproc::rotate::{get_rotated_output_shape, rotate};
///
/// let src = Image::<u8, 1>::from_size_val([30, 20].into(), 255).unwrap();
/// let size = get_rotated_output_shape(src.size(), 70.0).unwrap();
/// let mut dst = Image::<f64, 1>::from_size_val(size, 0.0).unwrap();
///
/// rotate(&src, &mut dst, 70.0).unwrap();
/// ```
pub fn rotate<T, U, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<U, C>,
    angle: f64,
) -> Result<(), GeometryError>
where
    T: ImageDtype,
    U: ImageDtype,
{
    let mapper = rotation_mapper(src.size(), dst.size(), angle)?;
    remap(src, None, dst, None, |r, c| mapper.map_sample(r as f64, c as f64))
}

/// Rotate an image and its validity mask about the image center.
///
/// `dst_mask` is `false` wherever the destination is not covered by valid
/// source pixels.
pub fn rotate_masked<T, U, const C: usize>(
    src: &Image<T, C>,
    src_mask: &Mask,
    dst: &mut Image<U, C>,
    dst_mask: &mut Mask,
    angle: f64,
) -> Result<(), GeometryError>
where
    T: ImageDtype,
    U: ImageDtype,
{
    let mapper = rotation_mapper(src.size(), dst.size(), angle)?;
    remap(src, Some(src_mask), dst, Some(dst_mask), |r, c| {
        mapper.map_sample(r as f64, c as f64)
    })
}

/// Rotate an image into a newly allocated canvas that contains all of it.
///
/// The canvas size is [`get_rotated_output_shape`] and uncovered pixels are zero.
pub fn rotate_image<T, const C: usize>(
    src: &Image<T, C>,
    angle: f64,
) -> Result<Image<f64, C>, GeometryError>
where
    T: ImageDtype,
{
    let size = get_rotated_output_shape(src.size(), angle)?;
    let mut dst = Image::from_size_val(size, 0.0)?;
    rotate(src, &mut dst, angle)?;

    Ok(dst)
}
