//! Contains various types needed across the crate.

use crate::PixelSource;
use ordered_float::OrderedFloat;
use palette::Srgba;
use std::{cmp::Reverse, error::Error, fmt::Display};

/// A single pixel color, normalized to 8 bits per channel plus alpha.
///
/// Equality is exact equality of the four channels, never perceptual.
pub type Color = Srgba<u8>;

/// Opaque black, one of the two clusters every aggregation starts with.
pub(crate) fn black() -> Color {
    Srgba::new(0, 0, 0, u8::MAX)
}

/// Opaque white, the other seeded cluster.
pub(crate) fn white() -> Color {
    Srgba::new(u8::MAX, u8::MAX, u8::MAX, u8::MAX)
}

/// The exact-match key of a color, used for hashing.
#[inline]
pub(crate) fn color_key(color: Color) -> [u8; 4] {
    [color.red, color.green, color.blue, color.alpha]
}

/// A color and the number of pixels that have it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCount {
    /// The exact pixel color.
    pub color: Color,
    /// The number of pixels with this color.
    pub count: u64,
}

/// A canonical cluster color and the fraction of the image it covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorProminence {
    /// The color the cluster is keyed by.
    pub color: Color,
    /// The number of pixels in the cluster divided by the total number of pixels in the image.
    pub prominence: f64,
}

/// Sorts by descending prominence. Equal prominences keep their relative order.
pub(crate) fn sort_by_prominence(colors: &mut [ColorProminence]) {
    colors.sort_by_key(|c| Reverse(OrderedFloat(c.prominence)));
}

/// The output of the palette pipeline.
///
/// `colors` is sorted by descending prominence and holds at most
/// [`PaletteOptions::max_colors`](crate::PaletteOptions::max_colors) entries.
/// A color reported as the `background` never also appears in `colors`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Palette {
    /// The dominant foreground colors.
    pub colors: Vec<ColorProminence>,
    /// The detected background color, if any.
    pub background: Option<Color>,
}

impl Palette {
    /// The number of colors in the palette, counting the background if there is one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len() + usize::from(self.background.is_some())
    }

    /// Whether the palette has neither foreground colors nor a background.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the foreground colors without their prominences.
    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.colors.iter().map(|c| c.color)
    }
}

/// An error returned when constructing a [`PixelGrid`] from invalid parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// The number of pixels provided does not match `width * height`.
    LengthMismatch {
        /// `width * height`
        expected: usize,
        /// The length of the provided pixel buffer.
        actual: usize,
    },
    /// `width * height` does not fit in a `usize`.
    TooLarge,
}

impl Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::LengthMismatch { expected, actual } => {
                write!(f, "expected {expected} pixels but got {actual}")
            }
            GridError::TooLarge => write!(f, "image dimensions overflow the address space"),
        }
    }
}

impl Error for GridError {}

/// An owned, row-major grid of pixel colors.
///
/// This is what every [`Quantizer`](crate::Quantizer) returns,
/// and it can also be used directly as a [`PixelSource`].
///
/// # Examples
/// ```
/// # use hueprint::{PixelGrid, GridError};
/// # use palette::Srgba;
/// # fn main() -> Result<(), GridError> {
/// let red = Srgba::new(255, 0, 0, 255);
/// let grid = PixelGrid::new(2, 1, vec![red, red])?;
/// assert_eq!(grid.pixels().len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    /// Number of columns.
    width: u32,
    /// Number of rows.
    height: u32,
    /// `width * height` colors in row-major order.
    pixels: Vec<Color>,
}

impl PixelGrid {
    /// Creates a new [`PixelGrid`] from row-major pixels.
    ///
    /// # Errors
    /// Returns an error if `pixels.len()` is not `width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self, GridError> {
        let expected = Self::area(width, height)?;
        if pixels.len() == expected {
            Ok(Self { width, height, pixels })
        } else {
            Err(GridError::LengthMismatch { expected, actual: pixels.len() })
        }
    }

    /// Creates a new [`PixelGrid`] by evaluating `f(x, y)` for each pixel.
    ///
    /// # Errors
    /// Returns an error if `width * height` overflows a `usize`.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> Color,
    ) -> Result<Self, GridError> {
        let mut pixels = Vec::with_capacity(Self::area(width, height)?);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Ok(Self { width, height, pixels })
    }

    /// Creates a grid with the dimensions of `image` by mapping each of its pixels through `f`.
    pub(crate) fn mapped(
        image: &(impl PixelSource + ?Sized),
        mut f: impl FnMut(Color) -> Color,
    ) -> Self {
        let (width, height) = (image.width(), image.height());
        #[allow(clippy::cast_possible_truncation)]
        let mut pixels = Vec::with_capacity(image.num_pixels() as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(image.pixel(x, y)));
            }
        }
        Self { width, height, pixels }
    }

    /// `width * height` as a `usize`.
    fn area(width: u32, height: u32) -> Result<usize, GridError> {
        usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(w, h)| w.checked_mul(h))
            .ok_or(GridError::TooLarge)
    }

    /// Returns the pixels in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Consumes the grid, returning its pixels in row-major order.
    #[must_use]
    pub fn into_pixels(self) -> Vec<Color> {
        self.pixels
    }
}

impl PixelSource for PixelGrid {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn pixel(&self, x: u32, y: u32) -> Color {
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::*;

    #[test]
    fn length_mismatch() {
        assert_eq!(
            PixelGrid::new(2, 2, vec![RED; 3]),
            Err(GridError::LengthMismatch { expected: 4, actual: 3 })
        );
        assert!(PixelGrid::new(0, 5, Vec::new()).is_ok());
    }

    #[test]
    fn from_fn_is_row_major() {
        let image =
            PixelGrid::from_fn(2, 2, |x, y| if (x, y) == (1, 0) { BLUE } else { RED }).unwrap();
        assert_eq!(image.pixel(1, 0), BLUE);
        assert_eq!(image.into_pixels(), vec![RED, BLUE, RED, RED]);
    }

    #[test]
    fn mapped_keeps_dimensions() {
        let image = grid(3, 2, &[RED, GREEN, BLUE, YELLOW, CYAN, MAGENTA]);
        let inverted = PixelGrid::mapped(&image, |c| {
            Srgba::new(!c.red, !c.green, !c.blue, c.alpha)
        });

        assert_eq!(inverted.width(), 3);
        assert_eq!(inverted.height(), 2);
        assert_eq!(
            inverted.into_pixels(),
            vec![CYAN, MAGENTA, YELLOW, BLUE, RED, GREEN]
        );
    }

    #[test]
    fn palette_len_counts_background() {
        let mut palette = Palette::default();
        assert!(palette.is_empty());

        palette.background = Some(WHITE);
        assert_eq!(palette.len(), 1);

        palette.colors.push(ColorProminence { color: RED, prominence: 0.5 });
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.colors().collect::<Vec<_>>(), vec![RED]);
    }
}
