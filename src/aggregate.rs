//! Greedy clustering of near-duplicate colors.
//!
//! Colors are visited in descending frequency order. Each color either joins the existing
//! cluster it is perceptually nearest to (if that cluster is within the merge threshold)
//! or starts a new cluster keyed by itself. Clusters for pure black and pure white
//! always exist, and start out empty.
//!
//! The result depends on the visiting order, so it is not a globally optimal clustering.

use crate::{
    distance::{cmc_lab, lab, HueDifference},
    types::{black, color_key, sort_by_prominence, white},
    Color, ColorCount, ColorCounts, ColorProminence,
};
use palette::{white_point::D65, Lab};
use std::{cmp::Reverse, collections::HashMap};
use tracing::trace;

/// Maps each color seen during aggregation to the canonical color of the cluster it joined.
///
/// Once a color has been assigned a cluster, that assignment never changes.
#[derive(Debug, Clone, Default)]
pub struct CanonicalMap(HashMap<[u8; 4], Color>);

impl CanonicalMap {
    /// Returns the canonical color for `color`, if `color` was seen during aggregation.
    #[must_use]
    pub fn get(&self, color: Color) -> Option<Color> {
        self.0.get(&color_key(color)).copied()
    }

    /// The number of colors in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Assigns `color` to `canonical` unless it already has an assignment.
    fn assign(&mut self, color: Color, canonical: Color) {
        self.0.entry(color_key(color)).or_insert(canonical);
    }
}

/// A cluster under construction.
struct Bucket {
    /// The canonical color.
    color: Color,
    /// `color` in CIELAB, cached for distance computations.
    lab: Lab<D65, f64>,
    /// The number of pixels folded into this cluster so far.
    count: u64,
}

impl Bucket {
    /// Creates a bucket keyed by `color`.
    fn new(color: Color, count: u64) -> Self {
        Self { color, lab: lab(color), count }
    }
}

/// The clusters produced by greedily merging the colors of a [`ColorCounts`].
///
/// The clusters partition the counted pixels: their counts sum to [`Aggregation::total_count`].
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// The clusters sorted by descending count.
    clusters: Vec<ColorCount>,
    /// Every aggregated color mapped to its cluster's color.
    canonical: CanonicalMap,
    /// The total number of pixels.
    total_count: u64,
}

impl Aggregation {
    /// Clusters the given color counts.
    ///
    /// A color joins the nearest existing cluster if its CMC distance to that cluster's color
    /// (with the new color as the reference) is strictly below `min_distance`.
    /// If several clusters are equally near, the oldest one wins.
    pub fn new(
        color_counts: &ColorCounts,
        min_distance: f64,
        hue_difference: HueDifference,
    ) -> Self {
        let mut buckets = vec![Bucket::new(black(), 0), Bucket::new(white(), 0)];
        let mut index = buckets
            .iter()
            .enumerate()
            .map(|(i, bucket)| (color_key(bucket.color), i))
            .collect::<HashMap<_, _>>();

        let mut canonical = CanonicalMap::default();
        canonical.assign(black(), black());
        canonical.assign(white(), white());

        for &ColorCount { color, count } in color_counts {
            if let Some(&i) = index.get(&color_key(color)) {
                buckets[i].count += count;
                canonical.assign(color, color);
                continue;
            }

            let color_lab = lab(color);
            let mut nearest = None;
            let mut nearest_distance = f64::INFINITY;
            for (i, bucket) in buckets.iter().enumerate() {
                let distance = cmc_lab(color_lab, bucket.lab, hue_difference);
                if distance < nearest_distance {
                    nearest = Some(i);
                    nearest_distance = distance;
                }
            }

            match nearest {
                Some(i) if nearest_distance < min_distance => {
                    let bucket = &mut buckets[i];
                    trace!(
                        ?color,
                        into = ?bucket.color,
                        distance = nearest_distance,
                        count,
                        "merged color into cluster"
                    );
                    bucket.count += count;
                    canonical.assign(color, bucket.color);
                }
                _ => {
                    trace!(?color, distance = nearest_distance, count, "started new cluster");
                    index.insert(color_key(color), buckets.len());
                    buckets.push(Bucket { color, lab: color_lab, count });
                    canonical.assign(color, color);
                }
            }
        }

        let mut clusters = buckets
            .into_iter()
            .map(|Bucket { color, count, .. }| ColorCount { color, count })
            .collect::<Vec<_>>();

        clusters.sort_by_key(|c| Reverse(c.count));

        Self {
            clusters,
            canonical,
            total_count: color_counts.total_count(),
        }
    }

    /// Returns the clusters sorted by descending count, including empty clusters.
    #[must_use]
    pub fn clusters(&self) -> &[ColorCount] {
        &self.clusters
    }

    /// Returns the map from every aggregated color to its cluster's color.
    #[must_use]
    pub fn canonical(&self) -> &CanonicalMap {
        &self.canonical
    }

    /// Returns the total number of pixels across all clusters.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Returns each cluster's share of the total pixel count, sorted by descending prominence.
    ///
    /// Empty clusters are included with a prominence of `0.0`.
    /// Returns an empty `Vec` if no pixels were aggregated.
    #[must_use]
    pub fn prominences(&self) -> Vec<ColorProminence> {
        if self.total_count == 0 {
            return Vec::new();
        }

        #[allow(clippy::cast_precision_loss)]
        let total = self.total_count as f64;

        let mut prominences = self
            .clusters
            .iter()
            .map(|&ColorCount { color, count }| {
                #[allow(clippy::cast_precision_loss)]
                let prominence = count as f64 / total;
                ColorProminence { color, prominence }
            })
            .collect::<Vec<_>>();

        sort_by_prominence(&mut prominences);
        prominences
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{distance, tests::*, PixelSource, MIN_DISTANCE};
    use palette::Srgba;

    fn aggregate(pixels: &[Color], width: u32) -> Aggregation {
        #[allow(clippy::cast_possible_truncation)]
        let height = pixels.len() as u32 / width;
        let counts = ColorCounts::new(&grid(width, height, pixels));
        Aggregation::new(&counts, MIN_DISTANCE, HueDifference::Standard)
    }

    fn count_of(aggregation: &Aggregation, color: Color) -> Option<u64> {
        aggregation
            .clusters()
            .iter()
            .find(|c| c.color == color)
            .map(|c| c.count)
    }

    #[test]
    fn empty_input() {
        let aggregation = Aggregation::new(
            &ColorCounts::default(),
            MIN_DISTANCE,
            HueDifference::Standard,
        );

        assert_eq!(aggregation.total_count(), 0);
        assert!(aggregation.prominences().is_empty());
        // only the anchors
        assert_eq!(aggregation.clusters().len(), 2);
        assert!(aggregation.clusters().iter().all(|c| c.count == 0));
        assert_eq!(aggregation.canonical().len(), 2);
        assert!(CanonicalMap::default().is_empty());
    }

    #[test]
    fn distinct_colors_stay_separate() {
        let aggregation = aggregate(&[RED, RED, RED, BLUE], 2);
        let prominences = aggregation.prominences();

        assert_eq!(prominences[0], ColorProminence { color: RED, prominence: 0.75 });
        assert_eq!(prominences[1], ColorProminence { color: BLUE, prominence: 0.25 });
        assert_eq!(prominences[2].prominence, 0.0);
        assert_eq!(prominences[3].prominence, 0.0);
    }

    #[test]
    fn near_duplicates_merge() {
        let a = Srgba::new(200, 30, 30, 255);
        let b = Srgba::new(202, 30, 30, 255);
        let aggregation = aggregate(&[a, a, a, b], 2);

        assert_eq!(count_of(&aggregation, a), Some(4));
        assert_eq!(count_of(&aggregation, b), None);
        assert_eq!(aggregation.canonical().get(b), Some(a));
        assert_eq!(aggregation.prominences()[0].prominence, 1.0);
    }

    #[test]
    fn near_black_joins_anchor() {
        let near_black = Srgba::new(3, 3, 3, 255);
        let aggregation = aggregate(&[near_black, near_black, RED, RED], 2);

        assert_eq!(count_of(&aggregation, BLACK), Some(2));
        assert_eq!(aggregation.canonical().get(near_black), Some(BLACK));
    }

    #[test]
    fn exact_anchor_match() {
        let aggregation = aggregate(&[WHITE, WHITE, WHITE, RED], 2);

        assert_eq!(count_of(&aggregation, WHITE), Some(3));
        assert_eq!(count_of(&aggregation, BLACK), Some(0));
        assert_eq!(aggregation.canonical().get(WHITE), Some(WHITE));
    }

    #[test]
    fn threshold_is_exclusive() {
        let a = Srgba::new(200, 30, 30, 255);
        let b = Srgba::new(202, 30, 30, 255);
        let counts = ColorCounts::new(&grid(2, 1, &[a, b]));
        let d = distance::cmc(b, a, HueDifference::Standard);

        let at = Aggregation::new(&counts, d, HueDifference::Standard);
        assert_eq!(count_of(&at, b), Some(1));

        let above = Aggregation::new(&counts, d * 1.01, HueDifference::Standard);
        assert_eq!(count_of(&above, b), None);
    }

    #[test]
    fn canonical_map_covers_every_color() {
        let image = random_grid(40, 30, 48, 11);
        let counts = ColorCounts::new(&image);
        let aggregation = Aggregation::new(&counts, MIN_DISTANCE, HueDifference::Standard);

        let cluster_colors = aggregation
            .clusters()
            .iter()
            .map(|c| c.color)
            .collect::<Vec<_>>();

        for c in counts.counts() {
            let canonical = aggregation.canonical().get(c.color).unwrap();
            assert!(cluster_colors.contains(&canonical));
        }

        let anchors_missing = [BLACK, WHITE]
            .iter()
            .filter(|&&anchor| counts.counts().iter().all(|c| c.color != anchor))
            .count();
        assert_eq!(
            aggregation.canonical().len(),
            counts.num_colors() + anchors_missing
        );
    }

    #[test]
    fn clusters_partition_pixels() {
        for seed in 0..8 {
            let image = random_grid(50, 20, 64, seed);
            let counts = ColorCounts::new(&image);
            let aggregation = Aggregation::new(&counts, MIN_DISTANCE, HueDifference::Standard);

            let total = aggregation.clusters().iter().map(|c| c.count).sum::<u64>();
            assert_eq!(total, image.num_pixels());

            let prominences = aggregation.prominences();
            let sum = prominences.iter().map(|c| c.prominence).sum::<f64>();
            assert!((sum - 1.0).abs() < 1e-9);

            for pair in prominences.windows(2) {
                assert!(pair[0].prominence >= pair[1].prominence);
            }
            for c in &prominences {
                assert!((0.0..=1.0).contains(&c.prominence));
            }
        }
    }

    #[test]
    fn deterministic() {
        let image = random_grid(30, 30, 100, 4);
        let counts = ColorCounts::new(&image);
        let a = Aggregation::new(&counts, MIN_DISTANCE, HueDifference::Standard);
        let b = Aggregation::new(&counts, MIN_DISTANCE, HueDifference::Standard);
        assert_eq!(a.clusters(), b.clusters());
    }
}
