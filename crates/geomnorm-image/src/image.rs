use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use geomnorm_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels in one plane of this size.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Number of pixels in one plane, or `None` if it overflows `usize`.
    pub fn checked_area(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    /// Whether either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Trait for pixel data types that can be resampled.
///
/// Interpolation is carried out in `f64`. Sources are widened with
/// [`ImageDtype::to_f64`] and results are narrowed with [`ImageDtype::from_f64`].
pub trait ImageDtype: Copy + Default + Send + Sync {
    /// Convert the value to `f64`.
    fn to_f64(self) -> f64;

    /// Convert a `f64` value to the image data type.
    fn from_f64(x: f64) -> Self;
}

impl ImageDtype for f64 {
    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(x: f64) -> Self {
        x
    }
}

impl ImageDtype for f32 {
    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(x: f64) -> Self {
        x as f32
    }
}

impl ImageDtype for u8 {
    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(x: f64) -> Self {
        x.round().clamp(0.0, 255.0) as u8
    }
}

impl ImageDtype for u16 {
    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(x: f64) -> Self {
        x.round().clamp(0.0, u16::MAX as f64) as u16
    }
}

impl ImageDtype for i32 {
    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(x: f64) -> Self {
        x.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32
    }
}

/// Represents an image with pixel data.
///
/// The pixel data is stored channel-major: `CHANNELS` planes of shape (H, W),
/// each plane in row-major order. A grayscale image is an image with a single
/// plane.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const CHANNELS: usize> {
    size: ImageSize,
    data: Vec<T>,
}

/// A validity mask with the shape of one image plane.
///
/// `true` marks a valid pixel.
pub type Mask = Image<bool, 1>;

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image, channel-major.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use geomnorm_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::new(
    ///    ImageSize {
    ///       width: 10,
    ///       height: 20,
    ///    },
    ///    vec![0u8; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        let expected = Self::data_len(size)?;
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size and a constant pixel value.
    ///
    /// # Examples
    ///
    /// ```
    /// use geomnorm_image::{Image, ImageSize};
    ///
    /// let image = Image::<f64, 1>::from_size_val(
    ///   ImageSize {
    ///     width: 10,
    ///     height: 20,
    ///   }, 0.0).unwrap();
    ///
    /// assert_eq!(image.as_slice().len(), 200);
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        Image::new(size, vec![val; Self::data_len(size)?])
    }

    fn data_len(size: ImageSize) -> Result<usize, ImageError> {
        size.checked_area()
            .and_then(|area| area.checked_mul(CHANNELS))
            .ok_or(ImageError::ImageTooLarge(size, CHANNELS))
    }

    /// Create a new image by evaluating `f(channel, row, col)` for every sample.
    pub fn from_fn(size: ImageSize, mut f: impl FnMut(usize, usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(Self::data_len(size).unwrap_or(0));
        for c in 0..CHANNELS {
            for r in 0..size.height {
                for col in 0..size.width {
                    data.push(f(c, r, col));
                }
            }
        }

        Self { size, data }
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// Get the raw channel-major pixel data.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the raw channel-major pixel data mutably.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Get one channel plane as a row-major slice.
    ///
    /// # Errors
    ///
    /// If the channel index is out of bounds, an error is returned.
    pub fn plane(&self, channel: usize) -> Result<&[T], ImageError> {
        if channel >= CHANNELS {
            return Err(ImageError::ChannelIndexOutOfBounds(channel, CHANNELS));
        }
        let len = self.size.area();
        Ok(&self.data[channel * len..(channel + 1) * len])
    }

    /// Iterate over the channel planes.
    ///
    /// Images with an empty size yield no planes.
    pub fn planes(&self) -> std::slice::ChunksExact<'_, T> {
        self.data.chunks_exact(self.size.area().max(1))
    }

    /// Iterate mutably over the channel planes.
    ///
    /// Images with an empty size yield no planes.
    pub fn planes_mut(&mut self) -> std::slice::ChunksExactMut<'_, T> {
        let len = self.size.area().max(1);
        self.data.chunks_exact_mut(len)
    }

    /// Get a reference to the sample at `[channel, row, col]`.
    pub fn get(&self, index: [usize; 3]) -> Option<&T> {
        let [c, r, col] = index;
        if c >= CHANNELS || r >= self.size.height || col >= self.size.width {
            return None;
        }
        self.data
            .get((c * self.size.height + r) * self.size.width + col)
    }

    /// Get a mutable reference to the sample at `[channel, row, col]`.
    pub fn get_mut(&mut self, index: [usize; 3]) -> Option<&mut T> {
        let [c, r, col] = index;
        if c >= CHANNELS || r >= self.size.height || col >= self.size.width {
            return None;
        }
        self.data
            .get_mut((c * self.size.height + r) * self.size.width + col)
    }

    /// Get a channel of the image.
    ///
    /// # Errors
    ///
    /// If the channel index is out of bounds, an error is returned.
    pub fn channel(&self, channel: usize) -> Result<Image<T, 1>, ImageError>
    where
        T: Clone,
    {
        Image::new(self.size, self.plane(channel)?.to_vec())
    }

    /// Cast the pixel data of the image to a different type.
    ///
    /// # Errors
    ///
    /// If a value cannot be represented in the target type, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use geomnorm_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 1>::new([2, 1].into(), vec![3, 250]).unwrap();
    /// let image_f64 = image.cast::<f64>().unwrap();
    ///
    /// assert_eq!(image_f64.as_slice(), &[3.0, 250.0]);
    /// ```
    pub fn cast<U>(&self) -> Result<Image<U, CHANNELS>, ImageError>
    where
        U: num_traits::NumCast,
        T: num_traits::NumCast + Copy,
    {
        let data = self
            .data
            .iter()
            .map(|&x| U::from(x).ok_or(ImageError::CastError))
            .collect::<Result<Vec<U>, ImageError>>()?;

        Image::new(self.size, data)
    }
}

#[cfg(test)]
mod tests {
    use crate::image::{Image, ImageDtype, ImageError, ImageSize, Mask};

    #[test]
    fn image_size() {
        let image_size = ImageSize {
            width: 10,
            height: 20,
        };
        assert_eq!(image_size.area(), 200);
        assert!(!image_size.is_empty());
        assert!(ImageSize::from([0, 3]).is_empty());
    }

    #[test]
    fn image_smoke() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 10,
                height: 20,
            },
            vec![0u8; 10 * 20 * 3],
        )?;
        assert_eq!(image.size().width, 10);
        assert_eq!(image.size().height, 20);
        assert_eq!(image.num_channels(), 3);
        assert_eq!(image.planes().count(), 3);

        Ok(())
    }

    #[test]
    fn image_invalid_length() {
        let res = Image::<f64, 2>::new([2, 2].into(), vec![0.0; 4]);
        assert_eq!(res, Err(ImageError::InvalidChannelShape(4, 8)));
    }

    #[test]
    fn image_size_overflow() {
        let size = ImageSize {
            width: usize::MAX / 2,
            height: 2,
        };
        assert!(size.checked_area().is_some());
        assert_eq!(
            Image::<u8, 3>::from_size_val(size, 0).err(),
            Some(ImageError::ImageTooLarge(size, 3))
        );

        let size = ImageSize::from([usize::MAX, 2]);
        assert_eq!(size.checked_area(), None);
        assert_eq!(
            Image::<f64, 1>::new(size, vec![]).err(),
            Some(ImageError::ImageTooLarge(size, 1))
        );
    }

    #[test]
    fn image_channel_major_indexing() -> Result<(), ImageError> {
        // two planes of 2x3 (height x width)
        let image = Image::<f32, 2>::new(
            ImageSize {
                width: 3,
                height: 2,
            },
            vec![0., 1., 2., 3., 4., 5., 10., 11., 12., 13., 14., 15.],
        )?;

        assert_eq!(image.get([0, 1, 0]), Some(&3.0));
        assert_eq!(image.get([1, 0, 2]), Some(&12.0));
        assert_eq!(image.get([2, 0, 0]), None);
        assert_eq!(image.get([0, 2, 0]), None);
        assert_eq!(image.plane(1)?, &[10., 11., 12., 13., 14., 15.]);

        let channel = image.channel(1)?;
        assert_eq!(channel.get([0, 1, 1]), Some(&14.0));

        assert_eq!(
            image.plane(2).err(),
            Some(ImageError::ChannelIndexOutOfBounds(2, 2))
        );

        Ok(())
    }

    #[test]
    fn image_from_fn() {
        let image = Image::<usize, 2>::from_fn([3, 2].into(), |c, r, col| c * 100 + r * 10 + col);
        assert_eq!(image.plane(0).unwrap(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(image.get([1, 1, 2]), Some(&112));
    }

    #[test]
    fn image_cast() -> Result<(), ImageError> {
        let image_u8 = Image::<u8, 1>::new([3, 1].into(), vec![0, 1, 255])?;
        let image_f64: Image<f64, 1> = image_u8.cast()?;
        assert_eq!(image_f64.as_slice(), &[0.0, 1.0, 255.0]);

        let negative = Image::<f64, 1>::new([1, 1].into(), vec![-1.0])?;
        assert_eq!(negative.cast::<u8>().err(), Some(ImageError::CastError));

        Ok(())
    }

    #[test]
    fn mask_planes() -> Result<(), ImageError> {
        let mut mask = Mask::from_size_val([2, 2].into(), true)?;
        *mask.get_mut([0, 1, 1]).unwrap() = false;
        assert_eq!(mask.as_slice(), &[true, true, true, false]);

        Ok(())
    }

    #[test]
    fn dtype_narrowing() {
        assert_eq!(u8::from_f64(254.6), 255);
        assert_eq!(u8::from_f64(300.0), 255);
        assert_eq!(u8::from_f64(-3.0), 0);
        assert_eq!(u16::from_f64(1.49), 1);
        assert_eq!(i32::from_f64(-2.5), -3);
        assert_eq!(f32::from_f64(0.5), 0.5f32);
        assert_eq!(7u8.to_f64(), 7.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn image_size_serde() -> Result<(), serde_json::Error> {
        let size = ImageSize {
            width: 40,
            height: 30,
        };
        let json = serde_json::to_string(&size)?;
        assert_eq!(serde_json::from_str::<ImageSize>(&json)?, size);

        Ok(())
    }
}
