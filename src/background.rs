//! Background detection.
//!
//! A cluster is classified as background if it covers enough of the image
//! or, failing that, if its colors dominate the image border.

use crate::{
    aggregate::CanonicalMap,
    types::{color_key, sort_by_prominence},
    Color, ColorProminence, PixelSource,
};
use tracing::debug;

/// The minimum number of the eight border samples that must share a color
/// for that color to be considered the background.
pub const EDGE_MAJORITY: usize = 3;

/// Clusters split into foreground and background.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BackgroundSplit {
    /// The remaining clusters, sorted by descending prominence.
    pub foreground: Vec<ColorProminence>,
    /// The cluster classified as background, if any.
    pub background: Option<ColorProminence>,
}

/// Returns the four corners and four edge midpoints of a `width` by `height` image.
///
/// Returns `None` if the image has no pixels.
#[must_use]
pub fn edge_points(width: u32, height: u32) -> Option<[(u32, u32); 8]> {
    if width == 0 || height == 0 {
        return None;
    }

    let (w, h) = (width, height);
    Some([
        (0, 0),
        (0, h / 2),
        (0, h - 1),
        (w / 2, h - 1),
        (w - 1, h - 1),
        (w - 1, h / 2),
        (w - 1, 0),
        (w / 2, 0),
    ])
}

/// Returns the exact pixel color found at [`EDGE_MAJORITY`] or more of the [`edge_points`].
///
/// If more than one color qualifies, the most frequent wins,
/// with ties going to the color sampled first.
fn edge_majority(image: &(impl PixelSource + ?Sized)) -> Option<Color> {
    let points = edge_points(image.width(), image.height())?;

    let mut samples: Vec<(Color, usize)> = Vec::with_capacity(points.len());
    for (x, y) in points {
        let color = image.pixel(x, y);
        match samples
            .iter_mut()
            .find(|(c, _)| color_key(*c) == color_key(color))
        {
            Some((_, n)) => *n += 1,
            None => samples.push((color, 1)),
        }
    }

    let mut majority: Option<(Color, usize)> = None;
    for (color, n) in samples {
        if n >= EDGE_MAJORITY && majority.map_or(true, |(_, m)| n > m) {
            majority = Some((color, n));
        }
    }

    majority.map(|(color, _)| color)
}

/// Splits the background cluster, if any, from `clusters`.
///
/// `clusters` must be sorted by descending prominence,
/// and `image` must be the image whose colors were aggregated into `canonical`.
///
/// The most prominent cluster is the background if its prominence is at least
/// `dominant_prominence`. Otherwise, the eight border points of `image` are sampled,
/// and if one exact color appears at [`EDGE_MAJORITY`] or more of them,
/// the cluster that color was folded into is the background.
#[must_use]
pub fn detect_background(
    image: &(impl PixelSource + ?Sized),
    mut clusters: Vec<ColorProminence>,
    canonical: &CanonicalMap,
    dominant_prominence: f64,
) -> BackgroundSplit {
    if clusters
        .first()
        .is_some_and(|c| c.prominence >= dominant_prominence)
    {
        let background = clusters.remove(0);
        debug!(color = ?background.color, prominence = background.prominence, "dominant background");
        return BackgroundSplit {
            foreground: clusters,
            background: Some(background),
        };
    }

    let position = edge_majority(image)
        .and_then(|color| canonical.get(color))
        .and_then(|canonical| {
            clusters
                .iter()
                .position(|c| color_key(c.color) == color_key(canonical))
        });

    let background = position.map(|i| clusters.remove(i));
    if let Some(background) = background {
        debug!(color = ?background.color, prominence = background.prominence, "edge background");
        sort_by_prominence(&mut clusters);
    }

    BackgroundSplit { foreground: clusters, background }
}
