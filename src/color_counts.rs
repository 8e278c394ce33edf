//! Contains the histogram builder that counts exact pixel colors.

use crate::{types::color_key, ColorCount, PixelSource};
use std::{cmp::Reverse, collections::HashMap};

/// The distinct colors of an image and their frequency counts,
/// sorted by descending count.
///
/// Colors with equal counts are ordered by where they first appear in the image
/// (row-major), so building the counts for the same image always gives the same order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorCounts {
    /// The sorted color counts.
    counts: Vec<ColorCount>,
    /// The sum of all counts.
    total_count: u64,
}

impl ColorCounts {
    /// Counts every pixel of the given image.
    ///
    /// An image with no pixels produces empty [`ColorCounts`].
    pub fn new(image: &(impl PixelSource + ?Sized)) -> Self {
        let mut index = HashMap::new();
        let mut counts = Vec::<ColorCount>::new();

        for y in 0..image.height() {
            for x in 0..image.width() {
                let color = image.pixel(x, y);
                let i = *index.entry(color_key(color)).or_insert_with(|| {
                    counts.push(ColorCount { color, count: 0 });
                    counts.len() - 1
                });
                counts[i].count += 1;
            }
        }

        // stable, so first-encountered order breaks ties
        counts.sort_by_key(|c| Reverse(c.count));

        let total_count = counts.iter().map(|c| c.count).sum();
        Self { counts, total_count }
    }

    /// Returns the color counts sorted by descending count.
    #[must_use]
    pub fn counts(&self) -> &[ColorCount] {
        &self.counts
    }

    /// Returns the total number of pixels that were counted.
    ///
    /// This is equal to the sum of the counts in [`ColorCounts::counts`].
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Returns the number of distinct colors.
    #[must_use]
    pub fn num_colors(&self) -> usize {
        self.counts.len()
    }

    /// Whether no pixels were counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl<'a> IntoIterator for &'a ColorCounts {
    type Item = &'a ColorCount;
    type IntoIter = std::slice::Iter<'a, ColorCount>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{tests::*, PixelGrid};

    #[test]
    fn empty_input() {
        let counts = ColorCounts::new(&PixelGrid::new(0, 0, Vec::new()).unwrap());
        assert!(counts.is_empty());
        assert_eq!(counts.total_count(), 0);
        assert_eq!(counts, ColorCounts::default());
    }

    #[test]
    fn sorted_by_descending_count() {
        let image = grid(2, 2, &[BLUE, RED, RED, RED]);
        let counts = ColorCounts::new(&image);

        assert_eq!(
            counts.counts(),
            &[
                ColorCount { color: RED, count: 3 },
                ColorCount { color: BLUE, count: 1 },
            ]
        );
        assert_eq!(counts.total_count(), 4);
    }

    #[test]
    fn ties_keep_first_encountered_order() {
        let image = grid(3, 2, &[GREEN, BLUE, RED, RED, BLUE, GREEN]);
        let colors = ColorCounts::new(&image)
            .counts()
            .iter()
            .map(|c| c.color)
            .collect::<Vec<_>>();

        assert_eq!(colors, vec![GREEN, BLUE, RED]);
    }

    #[test]
    fn alpha_distinguishes_colors() {
        let translucent = palette::Srgba::new(255, 0, 0, 128);
        let image = grid(2, 1, &[RED, translucent]);
        assert_eq!(ColorCounts::new(&image).num_colors(), 2);
    }

    #[test]
    fn total_matches_pixels() {
        let image = random_grid(37, 23, 16, 7);
        let counts = ColorCounts::new(&image);

        assert_eq!(counts.total_count(), image.num_pixels());
        assert_eq!(
            counts.counts().iter().map(|c| c.count).sum::<u64>(),
            image.num_pixels()
        );
        for pair in counts.counts().windows(2) {
            assert!(pair[0].count >= pair[1].count);
        }
    }
}
