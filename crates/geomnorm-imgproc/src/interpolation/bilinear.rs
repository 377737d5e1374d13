use geomnorm_image::{ImageDtype, ImageSize};

/// One contributing neighbor of a bilinear sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Tap {
    index: usize,
    weight: f64,
}

/// Precomputed bilinear weights for one fractional coordinate.
///
/// The taps only depend on the plane size, the optional mask and the
/// coordinate, so one set of taps is shared by all channels of an image.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct BilinearTaps {
    taps: [Tap; 4],
    len: usize,
}

impl BilinearTaps {
    /// Compute the taps for sampling a plane of `size` at `(row, col)`.
    ///
    /// A neighbor is usable when it lies inside the plane and, if a mask is
    /// given, the mask is set at its position. When all four neighbors are
    /// usable the plain bilinear weights are kept. Otherwise the weights of the
    /// usable neighbors are rescaled to sum to one.
    ///
    /// Returns `None` when no usable neighbor carries weight, i.e. the sample
    /// is invalid. A usable neighbor with zero weight does not make it valid.
    pub(crate) fn new(size: ImageSize, mask: Option<&[bool]>, row: f64, col: f64) -> Option<Self> {
        let r0 = row.floor();
        let c0 = col.floor();

        // also rejects NaN coordinates
        if !(r0 >= -1.0 && r0 < size.height as f64 && c0 >= -1.0 && c0 < size.width as f64) {
            return None;
        }

        let fr = row - r0;
        let fc = col - c0;

        let (r0, c0) = (r0 as isize, c0 as isize);
        let neighbors = [
            (r0, c0, (1.0 - fr) * (1.0 - fc)),
            (r0, c0 + 1, (1.0 - fr) * fc),
            (r0 + 1, c0, fr * (1.0 - fc)),
            (r0 + 1, c0 + 1, fr * fc),
        ];

        let mut out = Self::default();
        let mut total = 0.0;
        for (r, c, weight) in neighbors {
            if r < 0 || c < 0 || r as usize >= size.height || c as usize >= size.width {
                continue;
            }
            let index = r as usize * size.width + c as usize;
            if mask.is_some_and(|m| !m[index]) {
                continue;
            }
            out.taps[out.len] = Tap { index, weight };
            out.len += 1;
            total += weight;
        }

        if total <= 0.0 {
            return None;
        }

        if out.len < 4 {
            out.taps[..out.len]
                .iter_mut()
                .for_each(|tap| tap.weight /= total);
        }

        Some(out)
    }

    /// Apply the taps to a row-major plane.
    pub(crate) fn apply<T: ImageDtype>(&self, plane: &[T]) -> f64 {
        self.taps[..self.len]
            .iter()
            .map(|tap| tap.weight * plane[tap.index].to_f64())
            .sum()
    }
}
