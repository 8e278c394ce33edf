//! The palette pipeline entry points.

use super::PaletteOptions;
use crate::{
    background::{detect_background, BackgroundSplit},
    distance::saturation,
    Aggregation, ColorCounts, ColorProminence, Palette, PixelSource, Quantizer,
};
use tracing::debug;

#[cfg(feature = "threads")]
use rayon::prelude::*;

/// Computes the palette of an image, quantizing it with the octree quantizer
/// described by `options` (see [`PaletteOptions::quantizer`]).
///
/// An image with no pixels gives an empty [`Palette`].
/// Otherwise, the palette always has at least one color
/// (see [`palette_with_quantizer`] for the details).
///
/// # Examples
/// ```no_run
/// # use hueprint::PaletteOptions;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let img = image::open("some image")?.into_rgb8();
/// let palette = hueprint::palette(&img, &PaletteOptions::new().max_colors(3));
///
/// for color in &palette.colors {
///     println!("{:?} covers {:.1}%", color.color, color.prominence * 100.0);
/// }
/// if let Some(background) = palette.background {
///     println!("background: {background:?}");
/// }
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn palette(image: &(impl PixelSource + ?Sized), options: &PaletteOptions) -> Palette {
    palette_with_quantizer(image, options, &options.quantizer())
}

/// Computes the palette of an image using the given quantizer.
///
/// The steps are:
/// 1. The image is quantized, and the exact colors of the quantized image are counted.
/// 2. Similar colors are merged into clusters (see [`Aggregation`]),
///    and empty clusters are dropped.
/// 3. A background cluster may be split off (see [`detect_background`]).
/// 4. If the background is not saturated enough, it is no longer treated as the background,
///    and every other cluster is kept. The discarded cluster only becomes a foreground color
///    if there are no other clusters.
///    Otherwise, the clusters that are saturated enough are kept.
///    If none are, only the most prominent cluster is kept.
/// 5. Clusters much less prominent than the most prominent remaining cluster are dropped.
/// 6. At most [`PaletteOptions::max_colors`] clusters are kept.
///
/// Prominences are always fractions of the whole image.
/// For a non-empty image the resulting palette is never empty:
/// there is either a background or at least one foreground color.
#[must_use]
pub fn palette_with_quantizer(
    image: &(impl PixelSource + ?Sized),
    options: &PaletteOptions,
    quantizer: &impl Quantizer,
) -> Palette {
    let pixels = image.num_pixels();
    if pixels == 0 {
        debug!("image has no pixels");
        return Palette::default();
    }

    let quantized = quantizer.quantize(image);
    let counts = ColorCounts::new(&quantized);
    debug!(pixels, colors = counts.num_colors(), "counted quantized colors");

    let aggregation = Aggregation::new(&counts, options.min_distance, options.hue_difference);
    let mut clusters = aggregation.prominences();
    clusters.retain(|c| c.prominence > 0.0);
    debug!(clusters = clusters.len(), "aggregated colors");

    let BackgroundSplit { foreground, mut background } = detect_background(
        &quantized,
        clusters,
        aggregation.canonical(),
        options.background_prominence,
    );

    let is_saturated = |c: &ColorProminence| saturation(c.color) > options.min_saturation;

    let mut foreground = foreground;
    if let Some(unsaturated) = background.filter(|c| !is_saturated(c)) {
        // the image is treated as backgroundless, so no foreground cluster is dropped
        debug!(color = ?unsaturated.color, "background is not saturated, discarding it");
        if foreground.is_empty() {
            foreground.push(unsaturated);
        }
        background = None;
    } else {
        let saturated = foreground
            .iter()
            .copied()
            .filter(is_saturated)
            .collect::<Vec<_>>();

        if saturated.is_empty() {
            debug!("no saturated colors, keeping the most prominent");
            foreground.truncate(1);
        } else {
            foreground = saturated;
        }
    }

    if let Some(top) = foreground.first().map(|c| c.prominence) {
        let min_prominence = top * options.min_prominence.min(1.0);
        foreground.retain(|c| c.prominence >= min_prominence);
    }

    foreground.truncate(options.max_colors.max(1));

    debug!(
        colors = foreground.len(),
        background = background.is_some(),
        "computed palette"
    );

    Palette {
        colors: foreground,
        background: background.map(|c| c.color),
    }
}

/// Computes the palettes of many images in parallel.
///
/// Each palette is identical to the one [`palette`] returns for that image.
#[cfg(feature = "threads")]
#[must_use]
pub fn palettes_par<Image>(images: &[Image], options: &PaletteOptions) -> Vec<Palette>
where
    Image: PixelSource + Sync,
{
    images.par_iter().map(|image| palette(image, options)).collect()
}
