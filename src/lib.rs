//! A library for extracting a small palette of dominant colors from an image.
//!
//! `hueprint` returns a handful of representative colors ranked by how much of the image
//! they cover, plus an optional background color. Near-duplicate colors are merged using
//! the perceptual CMC(l:c) color difference, so the palette does not waste entries on
//! shades the eye cannot tell apart.
//!
//! # Pipeline
//! 1. The image is reduced to a bounded number of colors by a [`Quantizer`]
//!    (an [`OctreeQuantizer`] by default).
//! 2. The exact colors of the quantized image are counted ([`ColorCounts`]).
//! 3. The colors are greedily merged into clusters in descending frequency order ([`Aggregation`]).
//! 4. A cluster may be classified as the background ([`detect_background`]).
//! 5. Unsaturated and relatively rare clusters are filtered out,
//!    and the result is capped to a maximum length ([`palette_with_quantizer`]).
//!
//! # Features
//! - `threads`: exposes [`palettes_par`] to compute the palettes of many images in parallel via [`rayon`].
//! - `image`: implements [`PixelSource`] for the image buffers of the [`image`] crate.
//! - `serde`: derives `Serialize` and `Deserialize` for [`PaletteOptions`].
//!
//! # Examples
//! ```no_run
//! # use hueprint::PaletteOptions;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::open("some image")?.into_rgba8();
//!
//! let options = PaletteOptions::new()
//!     .max_colors(3) // keep at most 3 foreground colors
//!     .min_saturation(0.1); // ignore grayish colors
//!
//! let palette = hueprint::palette(&img, &options);
//! # Ok(())
//! # }
//! ```
//!
//! Computing a palette never fails. An image with no pixels gives an empty palette,
//! and any other image gives a palette with at least one color.

#![deny(unsafe_code)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod aggregate;
mod api;
mod average;
mod color_counts;
mod traits;
mod types;

pub mod background;
pub mod distance;
pub mod octree;

pub use aggregate::*;
pub use api::*;
pub use average::average_color;
pub use background::{detect_background, BackgroundSplit};
pub use color_counts::*;
pub use distance::{distance, saturation, HueDifference};
pub use octree::{OctreeQuantizer, ReductionStrategy, Unquantized};
pub use traits::*;
pub use types::*;

/// The default number of colors images are quantized to before clustering.
pub const QUANTIZED_SIZE: u16 = 100;

/// The default CMC distance below which two colors are merged.
pub const MIN_DISTANCE: f64 = 10.0;

/// The default minimum prominence relative to the most prominent color.
pub const MIN_PROMINENCE: f64 = 0.01;

/// The default HSV saturation a color must exceed.
pub const MIN_SATURATION: f64 = 0.05;

/// The default maximum number of foreground colors.
pub const MAX_COLORS: usize = 5;

/// The default prominence at which a cluster is always the background.
pub const BACKGROUND_PROMINENCE: f64 = 0.5;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    //! Shared test colors and image builders.

    use crate::{Color, PixelGrid};
    use palette::Srgba;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoroshiro128PlusPlus;

    // opaque named colors
    pub const BLACK: Color = Srgba::new(0, 0, 0, 255);
    pub const WHITE: Color = Srgba::new(255, 255, 255, 255);
    pub const GRAY: Color = Srgba::new(128, 128, 128, 255);
    pub const RED: Color = Srgba::new(255, 0, 0, 255);
    pub const GREEN: Color = Srgba::new(0, 255, 0, 255);
    pub const BLUE: Color = Srgba::new(0, 0, 255, 255);
    pub const YELLOW: Color = Srgba::new(255, 255, 0, 255);
    pub const CYAN: Color = Srgba::new(0, 255, 255, 255);
    pub const MAGENTA: Color = Srgba::new(255, 0, 255, 255);

    /// A `width x height` image with the given row-major pixels.
    pub fn grid(width: u32, height: u32, pixels: &[Color]) -> PixelGrid {
        PixelGrid::new(width, height, pixels.to_vec()).unwrap()
    }

    /// `n` seeded random opaque colors.
    pub fn random_colors(n: usize, seed: u64) -> Vec<Color> {
        let mut rng = Xoroshiro128PlusPlus::seed_from_u64(seed);
        (0..n)
            .map(|_| Srgba::new(rng.gen(), rng.gen(), rng.gen(), 255))
            .collect()
    }

    /// An image whose pixels are drawn from `num_colors` random colors.
    pub fn random_grid(width: u32, height: u32, num_colors: usize, seed: u64) -> PixelGrid {
        let colors = random_colors(num_colors, seed);
        let mut rng = Xoroshiro128PlusPlus::seed_from_u64(seed ^ 0x5eed);
        PixelGrid::from_fn(width, height, |_, _| colors[rng.gen_range(0..colors.len())]).unwrap()
    }
}
