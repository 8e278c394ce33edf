//! Perceptual color difference using the CMC(l:c) formula, and HSV saturation.
//!
//! The CMC(l:c) color difference is computed in the CIELAB color space with `l = 2` and `c = 1`
//! (see <http://www.brucelindbloom.com/index.html?Eqn_DeltaE_CMC.html>).
//! Its weighting terms are derived from the first color only, so
//! `distance(a, b)` and `distance(b, a)` generally differ.
//! When clustering, always pass the newly observed color first.

use crate::Color;
use palette::{white_point::D65, FromColor, Hsv, Lab, Srgb};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The lightness weight `l`.
const L: f64 = 2.0;

/// The chroma weight `c`.
const C: f64 = 1.0;

/// How the hue difference term `deltaH` is computed from the Lab axis differences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HueDifference {
    /// `sqrt(deltaA² + deltaB² - deltaC²)`, the textbook CMC term.
    ///
    /// The radicand is clamped at zero since rounding can make it slightly negative.
    #[default]
    Standard,
    /// `sqrt(deltaA² + deltaB² + deltaC²)`.
    ///
    /// This overstates the hue difference of colors with different chroma,
    /// but it matches palettes produced by older ports of this algorithm.
    Additive,
}

/// Converts the RGB part of a color to CIELAB, ignoring alpha.
#[inline]
pub(crate) fn lab(color: Color) -> Lab<D65, f64> {
    Lab::from_color(Srgb::new(color.red, color.green, color.blue).into_format::<f64>())
}

/// The CMC(2:1) difference of `a` relative to `b` using [`HueDifference::Standard`].
///
/// The result is never negative, and is zero for identical RGB values.
///
/// # Examples
/// ```
/// # use hueprint::distance;
/// # use palette::Srgba;
/// let red = Srgba::new(255, 0, 0, 255);
/// let dark_red = Srgba::new(250, 0, 0, 255);
/// assert_eq!(distance(red, red), 0.0);
/// assert!(distance(red, dark_red) < 10.0);
/// ```
#[must_use]
pub fn distance(a: Color, b: Color) -> f64 {
    cmc(a, b, HueDifference::Standard)
}

/// The CMC(2:1) difference of `a` relative to `b` with the given hue difference term.
#[must_use]
pub fn cmc(a: Color, b: Color, hue_difference: HueDifference) -> f64 {
    cmc_lab(lab(a), lab(b), hue_difference)
}

/// [`cmc`] on colors already converted to CIELAB.
pub(crate) fn cmc_lab(a: Lab<D65, f64>, b: Lab<D65, f64>, hue_difference: HueDifference) -> f64 {
    let Lab { l: l1, a: a1, b: b1, .. } = a;
    let Lab { l: l2, a: a2, b: b2, .. } = b;

    let delta_l = l1 - l2;
    let delta_a = a1 - a2;
    let delta_b = b1 - b2;

    let c1 = a1.hypot(b1);
    let c2 = a2.hypot(b2);
    let delta_c = c1 - c2;

    let delta_h = match hue_difference {
        HueDifference::Standard => (delta_a * delta_a + delta_b * delta_b - delta_c * delta_c)
            .max(0.0)
            .sqrt(),
        HueDifference::Additive => {
            (delta_a * delta_a + delta_b * delta_b + delta_c * delta_c).sqrt()
        }
    };

    let h1 = b1.atan2(a1).to_degrees().rem_euclid(360.0);

    let sl = if l1 < 16.0 {
        0.511
    } else {
        0.040975 * l1 / (1.0 + 0.01765 * l1)
    };

    let sc = 0.0638 * c1 / (1.0 + 0.0131 * c1) + 0.638;

    let t = if (164.0..=345.0).contains(&h1) {
        0.56 + (0.2 * (h1 + 168.0).to_radians().cos()).abs()
    } else {
        0.36 + (0.4 * (h1 + 35.0).to_radians().cos()).abs()
    };

    let c1_4 = c1.powi(4);
    let f = (c1_4 / (c1_4 + 1900.0)).sqrt();

    let sh = sc * (f * t + 1.0 - f);

    let l_term = delta_l / (L * sl);
    let c_term = delta_c / (C * sc);
    let h_term = delta_h / sh;

    (l_term * l_term + c_term * c_term + h_term * h_term).sqrt()
}

/// The HSV saturation of a color in `0.0..=1.0`, ignoring alpha.
#[must_use]
pub fn saturation(color: Color) -> f64 {
    let hsv: Hsv<palette::encoding::Srgb, f64> =
        Hsv::from_color(Srgb::new(color.red, color.green, color.blue).into_format::<f64>());
    hsv.saturation
}
