use std::f64::consts::PI;

use crate::error::GeometryError;

/// A 2D point in image coordinates.
///
/// The origin is the top-left corner, `row` grows downwards and `col` grows to
/// the right.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2 {
    /// The row (y) coordinate.
    pub row: f64,
    /// The column (x) coordinate.
    pub col: f64,
}

impl Point2 {
    /// Create a new point from its row and column coordinates.
    pub const fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point2) -> f64 {
        (self.row - other.row).hypot(self.col - other.col)
    }

    /// The point halfway between `self` and `other`.
    pub fn midpoint(&self, other: &Point2) -> Point2 {
        Point2::new(
            (self.row + other.row) / 2.0,
            (self.col + other.col) / 2.0,
        )
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.row.is_finite() && self.col.is_finite()
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((row, col): (f64, f64)) -> Self {
        Point2::new(row, col)
    }
}

impl From<Point2> for (f64, f64) {
    fn from(p: Point2) -> Self {
        (p.row, p.col)
    }
}

/// Maps coordinates between an input image and an output image under a
/// rotation, a uniform scale and a translation.
///
/// With `R(θ)` the counter-clockwise rotation matrix acting on `(x, y) = (col, row)`:
///
/// ```text
/// map_point:  out = offset + s * R(θ) * (p - center)
/// map_sample: src = center + (1 / s) * R(-θ) * (q - offset)
/// ```
///
/// The two maps are inverse to each other. Since rows grow downwards, a
/// positive angle turns points clockwise on screen, and an image resampled
/// through [`CoordinateMapper::map_sample`] shows its content turned by the
/// same angle. Callers that want a counter-clockwise visual rotation pass the
/// negated angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    cos: f64,
    sin: f64,
    scale: f64,
    center: Point2,
    offset: Point2,
}

impl CoordinateMapper {
    /// Create a new coordinate mapper.
    ///
    /// # Arguments
    ///
    /// * `angle` - The rotation angle in degrees.
    /// * `scale` - The uniform scale factor, must be positive.
    /// * `center` - The rotation center in input image coordinates.
    /// * `offset` - The point in output coordinates the center is moved to.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidParameter`] if the scale is not a
    /// positive finite number or if any other parameter is not finite.
    pub fn new(
        angle: f64,
        scale: f64,
        center: Point2,
        offset: Point2,
    ) -> Result<Self, GeometryError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(GeometryError::InvalidParameter(format!(
                "scale factor must be positive and finite, got {scale}"
            )));
        }
        if !angle.is_finite() {
            return Err(GeometryError::InvalidParameter(format!(
                "rotation angle must be finite, got {angle}"
            )));
        }
        if !center.is_finite() || !offset.is_finite() {
            return Err(GeometryError::InvalidParameter(format!(
                "rotation center {center:?} and offset {offset:?} must be finite"
            )));
        }

        let angle = angle * PI / 180.0;
        Ok(Self {
            cos: angle.cos(),
            sin: angle.sin(),
            scale,
            center,
            offset,
        })
    }

    /// Map an input image point to its position in the output image.
    pub fn map_point(&self, p: Point2) -> Point2 {
        let x = p.col - self.center.col;
        let y = p.row - self.center.row;

        let u = self.scale * (x * self.cos - y * self.sin);
        let v = self.scale * (x * self.sin + y * self.cos);

        Point2::new(self.offset.row + v, self.offset.col + u)
    }

    /// Map an output pixel to the (fractional) input coordinate it samples.
    pub fn map_sample(&self, row: f64, col: f64) -> Point2 {
        let x = col - self.offset.col;
        let y = row - self.offset.row;

        let inv_scale = 1.0 / self.scale;
        let u = inv_scale * (x * self.cos + y * self.sin);
        let v = inv_scale * (-x * self.sin + y * self.cos);

        Point2::new(self.center.row + v, self.center.col + u)
    }
}
