use geomnorm_image::{Image, ImageDtype, ImageSize, Mask};

use super::{CoordinateMapper, Point2};
use crate::error::{ensure_non_empty, ensure_shape, GeometryError};
use crate::interpolation::remap;

/// Geometric normalizer combining a rotation, a uniform scale and a translation.
///
/// A `GeomNorm` is an immutable configuration: the rotation angle (degrees),
/// the scale factor, the size of the produced crop and the position in the
/// crop that the per-call rotation center is moved to.
///
/// Points are rotated forward by `rotation_angle`; images are resampled through
/// the inverse map, so that a landmark and the image content under it always
/// land on the same output position. To turn image content counter-clockwise
/// by `a` degrees, configure `rotation_angle = -a`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeomNorm {
    rotation_angle: f64,
    scale_factor: f64,
    output_size: ImageSize,
    output_offset: Point2,
}

impl GeomNorm {
    /// Create a new geometric normalizer.
    ///
    /// # Arguments
    ///
    /// * `rotation_angle` - The rotation angle in degrees.
    /// * `scale_factor` - The scale factor, must be positive.
    /// * `output_size` - The size of the output crop.
    /// * `output_offset` - The output position of the rotation center.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidParameter`] for a non-positive scale,
    /// non-finite parameters or an empty output size.
    pub fn new(
        rotation_angle: f64,
        scale_factor: f64,
        output_size: ImageSize,
        output_offset: Point2,
    ) -> Result<Self, GeometryError> {
        let geom_norm = Self {
            rotation_angle,
            scale_factor,
            output_size,
            output_offset,
        };
        geom_norm.validate()?;

        Ok(geom_norm)
    }

    /// The rotation angle in degrees.
    pub fn rotation_angle(&self) -> f64 {
        self.rotation_angle
    }

    /// The scale factor.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// The size of the produced crop.
    pub fn output_size(&self) -> ImageSize {
        self.output_size
    }

    /// The output position of the rotation center.
    pub fn output_offset(&self) -> Point2 {
        self.output_offset
    }

    fn validate(&self) -> Result<(), GeometryError> {
        ensure_non_empty("output size", self.output_size)?;
        self.mapper(Point2::default()).map(|_| ())
    }

    /// The coordinate mapper for a given rotation center.
    pub fn mapper(&self, rotation_center: Point2) -> Result<CoordinateMapper, GeometryError> {
        CoordinateMapper::new(
            self.rotation_angle,
            self.scale_factor,
            rotation_center,
            self.output_offset,
        )
    }

    /// Resample `src` into the normalized crop `dst`.
    ///
    /// # Arguments
    ///
    /// * `src` - The input image.
    /// * `dst` - The output image, its size must be [`GeomNorm::output_size`].
    /// * `rotation_center` - The point of `src` that is moved to the output offset.
    ///
    /// Output pixels that do not sample the input keep their value.
    ///
    /// # Example
    ///
    /// ```
    /// use geomnorm_image::{Image, ImageSize};
    /// use geomnorm_imgproc::warp::{GeomNorm, Point2};
    ///
    /// let src = Image::<u8, 1>::from_size_val([64, 48].into(), 7).unwrap();
    /// let mut dst = Image::<f64, 1>::from_size_val([40, 40].into(), 0.0).unwrap();
    ///
    /// let geom_norm = GeomNorm::new(-10.0, 0.65, [40, 40].into(), Point2::new(0.0, 0.0)).unwrap();
    /// geom_norm.apply(&src, &mut dst, Point2::new(24.0, 12.0)).unwrap();
    /// ```
    pub fn apply<T, U, const C: usize>(
        &self,
        src: &Image<T, C>,
        dst: &mut Image<U, C>,
        rotation_center: Point2,
    ) -> Result<(), GeometryError>
    where
        T: ImageDtype,
        U: ImageDtype,
    {
        self.resample(src, None, dst, None, rotation_center)
    }

    /// Resample `src` into `dst` and propagate validity masks.
    ///
    /// Input pixels switched off in `src_mask` do not contribute. `dst_mask`
    /// receives `true` for every output pixel that has a valid sample; the
    /// other output pixels keep their value.
    pub fn apply_masked<T, U, const C: usize>(
        &self,
        src: &Image<T, C>,
        src_mask: &Mask,
        dst: &mut Image<U, C>,
        dst_mask: &mut Mask,
        rotation_center: Point2,
    ) -> Result<(), GeometryError>
    where
        T: ImageDtype,
        U: ImageDtype,
    {
        self.resample(src, Some(src_mask), dst, Some(dst_mask), rotation_center)
    }

    fn resample<T, U, const C: usize>(
        &self,
        src: &Image<T, C>,
        src_mask: Option<&Mask>,
        dst: &mut Image<U, C>,
        dst_mask: Option<&mut Mask>,
        rotation_center: Point2,
    ) -> Result<(), GeometryError>
    where
        T: ImageDtype,
        U: ImageDtype,
    {
        ensure_shape(self.output_size, dst.size())?;
        let mapper = self.mapper(rotation_center)?;

        log::trace!(
            "geom norm: angle {} scale {} center {:?} -> offset {:?}",
            self.rotation_angle,
            self.scale_factor,
            rotation_center,
            self.output_offset
        );

        remap(src, src_mask, dst, dst_mask, |r, c| {
            mapper.map_sample(r as f64, c as f64)
        })
    }

    /// Transform a single input point into output coordinates.
    ///
    /// # Arguments
    ///
    /// * `point` - The point in input image coordinates.
    /// * `rotation_center` - The rotation center in input image coordinates.
    pub fn apply_point(
        &self,
        point: Point2,
        rotation_center: Point2,
    ) -> Result<Point2, GeometryError> {
        Ok(self.mapper(rotation_center)?.map_point(point))
    }

    /// Transform a batch of input points into output coordinates.
    pub fn apply_points(
        &self,
        points: &[Point2],
        rotation_center: Point2,
    ) -> Result<Vec<Point2>, GeometryError> {
        let mapper = self.mapper(rotation_center)?;
        Ok(points.iter().map(|&p| mapper.map_point(p)).collect())
    }
}
