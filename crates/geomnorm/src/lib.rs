#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use geomnorm_image as image;

#[doc(inline)]
pub use geomnorm_imgproc as imgproc;
