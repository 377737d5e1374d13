//! Face normalization from eye landmarks.
//!
//! [`FaceEyesNorm`] derives the rotation, the scale and the rotation center of
//! a [`GeomNorm`] from the two eye positions detected in an image, so that the
//! eyes land at fixed positions of the output crop.
//!
//! Eye naming follows the subject: the right eye is usually the one with the
//! smaller column in a frontal image.

use geomnorm_image::{Image, ImageDtype, ImageSize, Mask};

use crate::error::{ensure_non_empty, GeometryError};
use crate::warp::{GeomNorm, Point2};

/// Eye-based face normalizer.
///
/// The configuration holds the crop size, the desired distance between the
/// eyes, the desired position of the eye center in the crop and the desired
/// angle of the eye line (zero for horizontal eyes).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceEyesNorm {
    output_size: ImageSize,
    eyes_distance: f64,
    eyes_center: Point2,
    eyes_angle: f64,
}

impl FaceEyesNorm {
    /// Create a normalizer putting horizontal eyes at `eyes_center`.
    ///
    /// # Arguments
    ///
    /// * `output_size` - The size of the output crop.
    /// * `eyes_distance` - The distance between the eyes in the crop, in pixels.
    /// * `eyes_center` - The position of the midpoint between the eyes in the crop.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidParameter`] for an empty crop or a
    /// distance that is not positive and finite.
    ///
    /// # Example
    ///
    /// ```
    /// use geomnorm_imgproc::face::FaceEyesNorm;
    /// use geomnorm_imgproc::warp::Point2;
    ///
    /// let fen = FaceEyesNorm::new([40, 40].into(), 20.0, Point2::new(10.5, 20.0)).unwrap();
    /// assert_eq!(fen.eyes_angle(), 0.0);
    /// ```
    pub fn new(
        output_size: ImageSize,
        eyes_distance: f64,
        eyes_center: Point2,
    ) -> Result<Self, GeometryError> {
        let fen = Self {
            output_size,
            eyes_distance,
            eyes_center,
            eyes_angle: 0.0,
        };
        fen.validate()?;

        Ok(fen)
    }

    /// Create a normalizer from the desired eye positions in the crop.
    ///
    /// The eye distance, the eye center and the angle of the eye line are
    /// taken from the two target positions.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidParameter`] for an empty crop or
    /// coincident target positions.
    pub fn from_eye_positions(
        output_size: ImageSize,
        right_eye: Point2,
        left_eye: Point2,
    ) -> Result<Self, GeometryError> {
        let fen = Self {
            output_size,
            eyes_distance: right_eye.distance(&left_eye),
            eyes_center: right_eye.midpoint(&left_eye),
            eyes_angle: eye_line_angle(right_eye, left_eye),
        };
        fen.validate()?;

        Ok(fen)
    }

    fn validate(&self) -> Result<(), GeometryError> {
        ensure_non_empty("output size", self.output_size)?;
        if !(self.eyes_distance.is_finite() && self.eyes_distance > 0.0) {
            return Err(GeometryError::InvalidParameter(format!(
                "eyes distance must be positive and finite, got {}",
                self.eyes_distance
            )));
        }
        if !self.eyes_center.is_finite() || !self.eyes_angle.is_finite() {
            return Err(GeometryError::InvalidParameter(format!(
                "eyes center {:?} and angle {} must be finite",
                self.eyes_center, self.eyes_angle
            )));
        }
        Ok(())
    }

    /// The size of the output crop.
    pub fn output_size(&self) -> ImageSize {
        self.output_size
    }

    /// The distance between the eyes in the crop.
    pub fn eyes_distance(&self) -> f64 {
        self.eyes_distance
    }

    /// The position of the eye center in the crop.
    pub fn eyes_center(&self) -> Point2 {
        self.eyes_center
    }

    /// The angle of the eye line in the crop, in degrees.
    pub fn eyes_angle(&self) -> f64 {
        self.eyes_angle
    }

    /// Derive the geometric normalization for the detected eye positions.
    ///
    /// # Returns
    ///
    /// The [`GeomNorm`] to apply and the rotation center to apply it with,
    /// which is the midpoint between the eyes.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidParameter`] if the eyes coincide or are
    /// not finite.
    pub fn geom_norm(
        &self,
        right_eye: Point2,
        left_eye: Point2,
    ) -> Result<(GeomNorm, Point2), GeometryError> {
        self.validate()?;
        if !right_eye.is_finite() || !left_eye.is_finite() {
            return Err(GeometryError::InvalidParameter(format!(
                "eye positions {right_eye:?} and {left_eye:?} must be finite"
            )));
        }

        let distance = right_eye.distance(&left_eye);
        if distance <= 0.0 {
            return Err(GeometryError::InvalidParameter(format!(
                "eye positions coincide at {right_eye:?}"
            )));
        }

        // the point map turns the detected eye line onto the configured one
        let angle = self.eyes_angle - eye_line_angle(right_eye, left_eye);
        let scale = self.eyes_distance / distance;
        let center = right_eye.midpoint(&left_eye);

        log::debug!(
            "face eyes norm: angle {angle:.4} deg, scale {scale:.4}, center {center:?}"
        );

        let geom_norm = GeomNorm::new(angle, scale, self.output_size, self.eyes_center)?;
        Ok((geom_norm, center))
    }

    /// Normalize `src` into `dst` from the detected eye positions.
    ///
    /// # Arguments
    ///
    /// * `src` - The input image.
    /// * `dst` - The output crop, its size must be [`FaceEyesNorm::output_size`].
    /// * `right_eye` - The right eye position in `src`.
    /// * `left_eye` - The left eye position in `src`.
    pub fn apply<T, U, const C: usize>(
        &self,
        src: &Image<T, C>,
        dst: &mut Image<U, C>,
        right_eye: Point2,
        left_eye: Point2,
    ) -> Result<(), GeometryError>
    where
        T: ImageDtype,
        U: ImageDtype,
    {
        let (geom_norm, center) = self.geom_norm(right_eye, left_eye)?;
        geom_norm.apply(src, dst, center)
    }

    /// Normalize `src` into `dst` from the detected eye positions, propagating masks.
    pub fn apply_masked<T, U, const C: usize>(
        &self,
        src: &Image<T, C>,
        src_mask: &Mask,
        dst: &mut Image<U, C>,
        dst_mask: &mut Mask,
        right_eye: Point2,
        left_eye: Point2,
    ) -> Result<(), GeometryError>
    where
        T: ImageDtype,
        U: ImageDtype,
    {
        let (geom_norm, center) = self.geom_norm(right_eye, left_eye)?;
        geom_norm.apply_masked(src, src_mask, dst, dst_mask, center)
    }

    /// Map a landmark of `src` into the normalized crop.
    pub fn transform_point(
        &self,
        point: Point2,
        right_eye: Point2,
        left_eye: Point2,
    ) -> Result<Point2, GeometryError> {
        let (geom_norm, center) = self.geom_norm(right_eye, left_eye)?;
        geom_norm.apply_point(point, center)
    }
}

/// Angle of the line from the right to the left eye, in degrees.
fn eye_line_angle(right_eye: Point2, left_eye: Point2) -> f64 {
    (left_eye.row - right_eye.row)
        .atan2(left_eye.col - right_eye.col)
        .to_degrees()
}
