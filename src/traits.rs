//! Contains the image source and quantizer interfaces.

use crate::{Color, PixelGrid};

#[cfg(feature = "image")]
use {
    image::{DynamicImage, GenericImageView, RgbImage, RgbaImage},
    palette::Srgba,
};

/// A read-only, pixel-addressable image.
///
/// Implementations must normalize each pixel to an 8-bit-per-channel [`Color`],
/// so that two visually identical source colors compare exactly equal.
/// Sources without an alpha channel report an alpha of `255`.
pub trait PixelSource {
    /// The number of columns.
    fn width(&self) -> u32;

    /// The number of rows.
    fn height(&self) -> u32;

    /// The color of the pixel at column `x` and row `y`.
    ///
    /// Callers only pass `x < width()` and `y < height()`.
    fn pixel(&self, x: u32, y: u32) -> Color;

    /// The total number of pixels.
    fn num_pixels(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// Whether the image has no pixels.
    fn is_empty(&self) -> bool {
        self.num_pixels() == 0
    }
}

impl<T: PixelSource + ?Sized> PixelSource for &T {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        (**self).pixel(x, y)
    }
}

/// Reduces an image to a bounded number of distinct colors.
///
/// The palette pipeline treats the returned grid as just another image:
/// it is histogrammed, clustered, and sampled along its edges.
pub trait Quantizer {
    /// Returns a new image with the same dimensions as `image`
    /// whose number of distinct colors is bounded by the quantizer's settings.
    fn quantize(&self, image: &(impl PixelSource + ?Sized)) -> PixelGrid;
}

#[cfg(feature = "image")]
impl PixelSource for RgbImage {
    fn width(&self) -> u32 {
        self.width()
    }

    fn height(&self) -> u32 {
        self.height()
    }

    #[inline]
    fn pixel(&self, x: u32, y: u32) -> Color {
        let [r, g, b] = self.get_pixel(x, y).0;
        Srgba::new(r, g, b, u8::MAX)
    }
}

#[cfg(feature = "image")]
impl PixelSource for RgbaImage {
    fn width(&self) -> u32 {
        self.width()
    }

    fn height(&self) -> u32 {
        self.height()
    }

    #[inline]
    fn pixel(&self, x: u32, y: u32) -> Color {
        let [r, g, b, a] = self.get_pixel(x, y).0;
        Srgba::new(r, g, b, a)
    }
}

#[cfg(feature = "image")]
impl PixelSource for DynamicImage {
    fn width(&self) -> u32 {
        GenericImageView::width(self)
    }

    fn height(&self) -> u32 {
        GenericImageView::height(self)
    }

    /// Higher bit depths are truncated to 8 bits per channel by the `image` crate.
    #[inline]
    fn pixel(&self, x: u32, y: u32) -> Color {
        let [r, g, b, a] = self.get_pixel(x, y).0;
        Srgba::new(r, g, b, a)
    }
}

#[cfg(all(test, feature = "image"))]
mod tests {
    use super::*;
    use crate::tests::*;

    #[test]
    fn rgb_images_are_opaque() {
        let image = RgbImage::from_pixel(3, 2, image::Rgb([255, 0, 0]));
        assert_eq!(PixelSource::width(&image), 3);
        assert_eq!(PixelSource::height(&image), 2);
        assert_eq!(image.num_pixels(), 6);
        assert_eq!(PixelSource::pixel(&image, 2, 1), RED);
    }

    #[test]
    fn rgba_images_keep_alpha() {
        let image = RgbaImage::from_pixel(1, 1, image::Rgba([1, 2, 3, 4]));
        assert_eq!(PixelSource::pixel(&image, 0, 0), Srgba::new(1, 2, 3, 4));

        let dynamic = DynamicImage::ImageRgba8(image);
        assert_eq!(PixelSource::pixel(&dynamic, 0, 0), Srgba::new(1, 2, 3, 4));
        assert!(!PixelSource::is_empty(&dynamic));
    }
}
