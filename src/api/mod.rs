//! Contains the options and functions for the high level palette API.

mod palette_pipeline;

pub use palette_pipeline::*;

use crate::{
    distance::HueDifference, octree::ReductionStrategy, OctreeQuantizer, BACKGROUND_PROMINENCE,
    MAX_COLORS, MIN_DISTANCE, MIN_PROMINENCE, MIN_SATURATION, QUANTIZED_SIZE,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A builder struct to specify the parameters of the palette pipeline.
///
/// # Examples
/// ```
/// # use hueprint::{PaletteOptions, HueDifference};
/// let options = PaletteOptions::new()
///     .max_colors(8)
///     .min_saturation(0.1)
///     .hue_difference(HueDifference::Additive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PaletteOptions {
    /// The number of colors the image is quantized to before clustering.
    quantized_size: u16,
    /// The octree depth of the quantizer.
    quantizer_depth: u8,
    /// The octree reduction strategy of the quantizer.
    reduction: ReductionStrategy,
    /// Colors closer than this are merged into one cluster.
    min_distance: f64,
    /// The minimum prominence relative to the most prominent color.
    min_prominence: f64,
    /// The minimum HSV saturation of a reported color.
    min_saturation: f64,
    /// The maximum number of foreground colors.
    max_colors: usize,
    /// A cluster with at least this prominence is the background.
    background_prominence: f64,
    /// The hue term of the color difference formula.
    hue_difference: HueDifference,
}

impl Default for PaletteOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl PaletteOptions {
    /// Creates a new [`PaletteOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            quantized_size: QUANTIZED_SIZE,
            quantizer_depth: OctreeQuantizer::DEFAULT_DEPTH,
            reduction: ReductionStrategy::LeastPopular,
            min_distance: MIN_DISTANCE,
            min_prominence: MIN_PROMINENCE,
            min_saturation: MIN_SATURATION,
            max_colors: MAX_COLORS,
            background_prominence: BACKGROUND_PROMINENCE,
            hue_difference: HueDifference::Standard,
        }
    }

    /// Sets the number of colors the image is quantized to before counting.
    ///
    /// The default is `100`.
    #[must_use]
    pub fn quantized_size(mut self, quantized_size: u16) -> Self {
        self.quantized_size = quantized_size;
        self
    }

    /// Sets the octree depth of the default quantizer (clamped to `1..=8`).
    ///
    /// The default is `6`.
    #[must_use]
    pub fn quantizer_depth(mut self, depth: u8) -> Self {
        self.quantizer_depth = depth;
        self
    }

    /// Sets which octree nodes the default quantizer folds first.
    ///
    /// The default is [`ReductionStrategy::LeastPopular`].
    #[must_use]
    pub fn reduction(mut self, reduction: ReductionStrategy) -> Self {
        self.reduction = reduction;
        self
    }

    /// Sets the CMC(2:1) distance below which two colors are merged.
    ///
    /// The default is `10.0`.
    #[must_use]
    pub fn min_distance(mut self, min_distance: f64) -> Self {
        self.min_distance = min_distance;
        self
    }

    /// Sets the minimum prominence of a reported color,
    /// as a fraction of the most prominent reported color's prominence.
    ///
    /// Values above `1.0` behave like `1.0`. The default is `0.01`.
    #[must_use]
    pub fn min_prominence(mut self, min_prominence: f64) -> Self {
        self.min_prominence = min_prominence;
        self
    }

    /// Sets the HSV saturation a color must exceed to be reported.
    ///
    /// The default is `0.05`.
    #[must_use]
    pub fn min_saturation(mut self, min_saturation: f64) -> Self {
        self.min_saturation = min_saturation;
        self
    }

    /// Sets the maximum number of foreground colors in the palette.
    ///
    /// A value of `0` is treated as `1`. The default is `5`.
    #[must_use]
    pub fn max_colors(mut self, max_colors: usize) -> Self {
        self.max_colors = max_colors;
        self
    }

    /// Sets the prominence at which the most prominent cluster is always the background.
    ///
    /// The default is `0.5`, that is, half of the image.
    #[must_use]
    pub fn background_prominence(mut self, background_prominence: f64) -> Self {
        self.background_prominence = background_prominence;
        self
    }

    /// Sets how the hue term of the color difference is computed.
    ///
    /// The default is [`HueDifference::Standard`].
    #[must_use]
    pub fn hue_difference(mut self, hue_difference: HueDifference) -> Self {
        self.hue_difference = hue_difference;
        self
    }

    /// The octree quantizer described by these options.
    #[must_use]
    pub fn quantizer(&self) -> OctreeQuantizer {
        OctreeQuantizer::new(self.quantized_size)
            .depth(self.quantizer_depth)
            .strategy(self.reduction)
    }
}

#[cfg(all(test, feature = "serde"))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_uses_defaults() {
        let options: PaletteOptions =
            serde_json::from_str(r#"{ "max_colors": 3, "hue_difference": "Additive" }"#).unwrap();

        assert_eq!(
            options,
            PaletteOptions::new()
                .max_colors(3)
                .hue_difference(HueDifference::Additive)
        );
    }
}
