//! Average color of an image.

use crate::{Color, PixelSource};
use palette::Srgba;

/// Computes the average color of an image.
///
/// Each channel, including alpha, is the integer mean of that channel over every pixel.
/// Returns `None` if the image has no pixels.
#[must_use]
pub fn average_color(image: &(impl PixelSource + ?Sized)) -> Option<Color> {
    let total = image.num_pixels();
    if total == 0 {
        return None;
    }

    let mut sums = [0u64; 4];
    for y in 0..image.height() {
        for x in 0..image.width() {
            let color = image.pixel(x, y);
            for (sum, c) in sums
                .iter_mut()
                .zip([color.red, color.green, color.blue, color.alpha])
            {
                *sum += u64::from(c);
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    let [r, g, b, a] = sums.map(|s| (s / total) as u8);
    Some(Srgba::new(r, g, b, a))
}
