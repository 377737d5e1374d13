use rayon::prelude::*;

use geomnorm_image::ImageSize;

use crate::warp::Point2;

/// Source coordinates sampled by every pixel of a destination image.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SampleGrid {
    size: ImageSize,
    coords: Vec<Point2>,
}

impl SampleGrid {
    /// Build the grid for a destination of `size`.
    ///
    /// `f(row, col)` returns the source coordinate sampled by the destination
    /// pixel `(row, col)`. Rows are evaluated in parallel.
    pub(crate) fn from_fn(size: ImageSize, f: impl Fn(usize, usize) -> Point2 + Send + Sync) -> Self {
        let mut coords = vec![Point2::default(); size.area()];

        coords
            .par_chunks_exact_mut(size.width.max(1))
            .enumerate()
            .for_each(|(row, coords_row)| {
                coords_row
                    .iter_mut()
                    .enumerate()
                    .for_each(|(col, p)| *p = f(row, col));
            });

        Self { size, coords }
    }

    /// The destination size the grid was built for.
    pub(crate) fn size(&self) -> ImageSize {
        self.size
    }

    /// The coordinates in row-major destination order.
    pub(crate) fn as_slice(&self) -> &[Point2] {
        &self.coords
    }
}
