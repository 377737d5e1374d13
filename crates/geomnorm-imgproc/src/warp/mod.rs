//! Coordinate mapping and geometric normalization.
//!
//! This module provides the affine building blocks used by all geometric
//! operations of the crate:
//!
//! - [`Point2`] landmarks in (row, col) image coordinates
//! - [`CoordinateMapper`] with the forward point map and the inverse sampling map
//! - [`GeomNorm`], a rotate + scale + translate normalizer producing a fixed size crop
//!
//! # Examples
//!
//! Tracking where a landmark lands in a normalized crop:
//!
//! ```
//! use geomnorm_imgproc::warp::{GeomNorm, Point2};
//!
//! let geom_norm = GeomNorm::new(45.0, 2.0, [160, 160].into(), Point2::new(40.0, 80.0)).unwrap();
//! let p = geom_norm
//!     .apply_point(Point2::new(15.0, 25.0), Point2::new(20.0, 20.0))
//!     .unwrap();
//! assert!((p.row - 40.0).abs() < 1e-9);
//! ```

mod geom_norm;
mod mapper;

pub use geom_norm::GeomNorm;
pub use mapper::{CoordinateMapper, Point2};
