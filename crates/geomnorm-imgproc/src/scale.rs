use geomnorm_image::{Image, ImageDtype, ImageSize, Mask};

use crate::error::GeometryError;
use crate::interpolation::remap;
use crate::warp::Point2;

/// Source coordinate of output index `i` along an axis.
///
/// The map is corner aligned: the first and the last output samples coincide
/// with the first and the last input samples.
fn corner_aligned(i: usize, in_len: usize, out_len: usize) -> f64 {
    if out_len > 1 {
        (i * (in_len - 1)) as f64 / (out_len - 1) as f64
    } else {
        0.0
    }
}

/// Compute the output size of [`scale_by_factor`].
///
/// Each dimension is `round(factor * dim)`, and at least one pixel.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidParameter`] if the factor is not positive and
/// finite, or if the scaled image would not be addressable.
///
/// # Example
///
/// ```
/// use geomnorm_image::ImageSize;
/// use geomnorm_imgproc::scale::get_scaled_output_shape;
///
/// let size = get_scaled_output_shape([4, 4].into(), 0.5).unwrap();
/// assert_eq!(size, ImageSize { width: 2, height: 2 });
/// ```
pub fn get_scaled_output_shape(size: ImageSize, factor: f64) -> Result<ImageSize, GeometryError> {
    if !(factor.is_finite() && factor > 0.0) {
        return Err(GeometryError::InvalidParameter(format!(
            "scale factor must be positive and finite, got {factor}"
        )));
    }

    let scaled = |n: usize| {
        let scaled = (n as f64 * factor).round().max(1.0);
        if scaled >= usize::MAX as f64 {
            return Err(GeometryError::InvalidParameter(format!(
                "scaling {size} by {factor} overflows the image dimensions"
            )));
        }
        Ok(scaled as usize)
    };

    let scaled_size = ImageSize {
        width: scaled(size.width)?,
        height: scaled(size.height)?,
    };
    if scaled_size.checked_area().is_none() {
        return Err(GeometryError::InvalidParameter(format!(
            "scaling {size} by {factor} overflows the image area"
        )));
    }

    Ok(scaled_size)
}

/// Scale an image to the size of the destination.
///
/// The resampling is bilinear and corner aligned, each channel is resampled
/// with the same coordinate map.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image, its size sets the output resolution.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidParameter`] if either image is empty.
///
/// # Example
///
/// ```
/// use geomnorm_image::Image;
/// use geomnorm_imgproc::scale::scale;
///
/// let src = Image::<u8, 1>::new([2, 2].into(), vec![0, 10, 20, 30]).unwrap();
/// let mut dst = Image::<f64, 1>::from_size_val([3, 3].into(), 0.0).unwrap();
///
/// scale(&src, &mut dst).unwrap();
///
/// assert_eq!(dst.get([0, 1, 1]), Some(&15.0));
/// ```
pub fn scale<T, U, const C: usize>(src: &Image<T, C>, dst: &mut Image<U, C>) -> Result<(), GeometryError>
where
    T: ImageDtype,
    U: ImageDtype,
{
    scale_impl(src, None, dst, None)
}

/// Scale an image and its validity mask to the size of the destination.
///
/// Input pixels switched off in `src_mask` do not contribute, `dst_mask`
/// receives the validity of every output pixel.
pub fn scale_masked<T, U, const C: usize>(
    src: &Image<T, C>,
    src_mask: &Mask,
    dst: &mut Image<U, C>,
    dst_mask: &mut Mask,
) -> Result<(), GeometryError>
where
    T: ImageDtype,
    U: ImageDtype,
{
    scale_impl(src, Some(src_mask), dst, Some(dst_mask))
}

/// Scale an image by a uniform factor into a newly allocated image.
///
/// The output size is [`get_scaled_output_shape`].
///
/// # Example
///
/// ```
/// use geomnorm_image::Image;
/// use geomnorm_imgproc::scale::scale_by_factor;
///
/// let src = Image::<f64, 3>::from_size_val([4, 4].into(), 1.0).unwrap();
/// let scaled = scale_by_factor(&src, 2.0).unwrap();
///
/// assert_eq!(scaled.size().width, 8);
/// assert_eq!(scaled.num_channels(), 3);
/// ```
pub fn scale_by_factor<T, const C: usize>(
    src: &Image<T, C>,
    factor: f64,
) -> Result<Image<f64, C>, GeometryError>
where
    T: ImageDtype,
{
    let size = get_scaled_output_shape(src.size(), factor)?;
    log::debug!("scaling {} by {} to {}", src.size(), factor, size);

    let mut dst = Image::from_size_val(size, 0.0)?;
    scale(src, &mut dst)?;

    Ok(dst)
}

fn scale_impl<T, U, const C: usize>(
    src: &Image<T, C>,
    src_mask: Option<&Mask>,
    dst: &mut Image<U, C>,
    dst_mask: Option<&mut Mask>,
) -> Result<(), GeometryError>
where
    T: ImageDtype,
    U: ImageDtype,
{
    let (src_size, dst_size) = (src.size(), dst.size());

    remap(src, src_mask, dst, dst_mask, |r, c| {
        Point2::new(
            corner_aligned(r, src_size.height, dst_size.height),
            corner_aligned(c, src_size.width, dst_size.width),
        )
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use geomnorm_image::{Image, ImageSize, Mask};

    use super::{corner_aligned, get_scaled_output_shape, scale, scale_by_factor, scale_masked};
    use crate::error::GeometryError;

    #[test]
    fn corner_aligned_map() {
        assert_eq!(corner_aligned(0, 4, 2), 0.0);
        assert_eq!(corner_aligned(1, 4, 2), 3.0);
        assert_eq!(corner_aligned(7, 4, 8), 3.0);
        assert_eq!(corner_aligned(3, 7, 4), 6.0 * 3.0 / 3.0);
        assert_eq!(corner_aligned(0, 4, 1), 0.0);
    }

    #[test]
    fn scaled_output_shape() -> Result<(), GeometryError> {
        let size = ImageSize {
            width: 4,
            height: 4,
        };
        assert_eq!(get_scaled_output_shape(size, 0.5)?, [2, 2].into());
        assert_eq!(get_scaled_output_shape(size, 2.0)?, [8, 8].into());
        assert_eq!(get_scaled_output_shape(size, 0.01)?, [1, 1].into());
        assert_eq!(
            get_scaled_output_shape([193, 285].into(), 3.18467)?,
            [615, 908].into()
        );

        for factor in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                get_scaled_output_shape(size, factor),
                Err(GeometryError::InvalidParameter(_))
            ));
        }

        Ok(())
    }

    #[test]
    fn scale_rejects_huge_factors() -> Result<(), GeometryError> {
        let src = Image::<f64, 1>::from_size_val([4, 4].into(), 1.0)?;

        // each side overflows
        assert!(matches!(
            scale_by_factor(&src, 1e300),
            Err(GeometryError::InvalidParameter(_))
        ));
        // each side fits, the area does not
        assert!(matches!(
            scale_by_factor(&src, 2f64.powi(40)),
            Err(GeometryError::InvalidParameter(_))
        ));
        assert!(matches!(
            get_scaled_output_shape([4, 4].into(), f64::MAX),
            Err(GeometryError::InvalidParameter(_))
        ));

        Ok(())
    }

    #[test]
    fn scale_single_pixel_output() -> Result<(), GeometryError> {
        let src = Image::<u8, 1>::new([2, 2].into(), vec![5, 10, 20, 30])?;
        let mut dst = Image::<f64, 1>::from_size_val([1, 1].into(), 0.0)?;
        scale(&src, &mut dst)?;
        assert_eq!(dst.as_slice(), &[5.0]);

        Ok(())
    }

    #[test]
    fn scale_constant_field() -> Result<(), GeometryError> {
        let src = Image::<f32, 1>::from_size_val([13, 7].into(), 0.25)?;
        let scaled = scale_by_factor(&src, 2.7)?;
        assert_eq!(scaled.size(), [35, 19].into());
        for v in scaled.as_slice() {
            assert_abs_diff_eq!(*v, 0.25, epsilon = 1e-12);
        }

        Ok(())
    }

    #[test]
    fn scale_masked_propagates_mask() -> Result<(), GeometryError> {
        let size = ImageSize {
            width: 3,
            height: 3,
        };
        let src = Image::<f64, 1>::from_size_val(size, 4.0)?;
        let src_mask = Mask::from_fn(size, |_, r, _| r < 2);

        let dst_size = ImageSize {
            width: 5,
            height: 5,
        };
        let mut dst = Image::<f64, 1>::from_size_val(dst_size, 0.0)?;
        let mut dst_mask = Mask::from_size_val(dst_size, false)?;
        scale_masked(&src, &src_mask, &mut dst, &mut dst_mask)?;

        // output rows 0..=3 sample source rows < 2 with weight; row 4 hits the masked last row
        for r in 0..5 {
            for c in 0..5 {
                let valid = *dst_mask.get([0, r, c]).unwrap();
                assert_eq!(valid, r < 4, "row {r} col {c}");
                let expected = if valid { 4.0 } else { 0.0 };
                assert_abs_diff_eq!(*dst.get([0, r, c]).unwrap(), expected, epsilon = 1e-12);
            }
        }

        Ok(())
    }

    #[test]
    fn scale_rejects_empty() -> Result<(), GeometryError> {
        let src = Image::<f64, 1>::from_size_val([4, 4].into(), 1.0)?;
        let mut dst = Image::<f64, 1>::new([0, 4].into(), vec![])?;
        assert!(matches!(
            scale(&src, &mut dst),
            Err(GeometryError::InvalidParameter(_))
        ));

        Ok(())
    }
}
