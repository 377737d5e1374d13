use rayon::prelude::*;

use geomnorm_image::{Image, ImageDtype, Mask};

use crate::interpolation::{BilinearTaps, SampleGrid};

/// Resample every channel of `src` into `dst` at the grid coordinates.
///
/// Destination rows are processed in parallel. Pixels without a valid sample
/// keep their current value. The grid must have the size of `dst` and the mask
/// the size of `src`.
pub(crate) fn par_iter_rows_resample<T, U, const C: usize>(
    src: &Image<T, C>,
    src_mask: Option<&Mask>,
    dst: &mut Image<U, C>,
    grid: &SampleGrid,
) where
    T: ImageDtype,
    U: ImageDtype,
{
    debug_assert_eq!(grid.size(), dst.size());

    let src_size = src.size();
    let mask = src_mask.map(|m| m.as_slice());
    let cols = dst.cols().max(1);

    src.planes()
        .zip(dst.planes_mut())
        .for_each(|(src_plane, dst_plane)| {
            dst_plane
                .par_chunks_exact_mut(cols)
                .zip(grid.as_slice().par_chunks_exact(cols))
                .for_each(|(dst_row, grid_row)| {
                    dst_row
                        .iter_mut()
                        .zip(grid_row.iter())
                        .for_each(|(dst_pixel, p)| {
                            if let Some(taps) = BilinearTaps::new(src_size, mask, p.row, p.col) {
                                *dst_pixel = U::from_f64(taps.apply(src_plane));
                            }
                        });
                });
        });
}

/// Write the validity of every grid sample of `src` into a destination mask.
pub(crate) fn par_iter_rows_mask<T, const C: usize>(
    src: &Image<T, C>,
    src_mask: Option<&Mask>,
    dst_mask: &mut Mask,
    grid: &SampleGrid,
) {
    debug_assert_eq!(grid.size(), dst_mask.size());

    let src_size = src.size();
    let mask = src_mask.map(|m| m.as_slice());
    let cols = dst_mask.cols().max(1);

    dst_mask
        .as_slice_mut()
        .par_chunks_exact_mut(cols)
        .zip(grid.as_slice().par_chunks_exact(cols))
        .for_each(|(mask_row, grid_row)| {
            mask_row
                .iter_mut()
                .zip(grid_row.iter())
                .for_each(|(valid, p)| {
                    *valid = BilinearTaps::new(src_size, mask, p.row, p.col).is_some()
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warp::Point2;
    use geomnorm_image::{ImageError, ImageSize};

    #[test]
    fn resample_identity_ch3() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 3,
            height: 2,
        };
        let src = Image::<u8, 3>::from_fn(size, |c, r, col| (c * 10 + r * 3 + col) as u8);
        let mut dst = Image::<f64, 3>::from_size_val(size, -1.0)?;

        let grid = SampleGrid::from_fn(size, |r, c| Point2::new(r as f64, c as f64));
        par_iter_rows_resample(&src, None, &mut dst, &grid);

        assert_eq!(dst, src.cast::<f64>()?);

        Ok(())
    }

    #[test]
    fn resample_keeps_invalid_pixels() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let src = Image::<f64, 1>::from_size_val(size, 5.0)?;
        let mut dst = Image::<f64, 1>::from_size_val(size, -1.0)?;
        let mut dst_mask = Mask::from_size_val(size, true)?;

        // the second row samples below the source
        let grid = SampleGrid::from_fn(size, |r, c| Point2::new(r as f64 * 10.0, c as f64));
        par_iter_rows_resample(&src, None, &mut dst, &grid);
        par_iter_rows_mask(&src, None, &mut dst_mask, &grid);

        assert_eq!(dst.as_slice(), &[5.0, 5.0, -1.0, -1.0]);
        assert_eq!(dst_mask.as_slice(), &[true, true, false, false]);

        Ok(())
    }

    #[test]
    fn resample_with_source_mask() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let src = Image::<u8, 1>::new(size, vec![1, 2, 3, 4])?;
        let src_mask = Mask::new(size, vec![true, false, false, true])?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 9)?;
        let mut dst_mask = Mask::from_size_val(size, true)?;

        let grid = SampleGrid::from_fn(size, |r, c| Point2::new(r as f64, c as f64));
        par_iter_rows_resample(&src, Some(&src_mask), &mut dst, &grid);
        par_iter_rows_mask(&src, Some(&src_mask), &mut dst_mask, &grid);

        assert_eq!(dst.as_slice(), &[1, 9, 9, 4]);
        assert_eq!(dst_mask, src_mask);

        Ok(())
    }
}
