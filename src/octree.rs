//! Octree color quantization.
//!
//! Each pixel is inserted into an octree where every level splits the RGB cube in half
//! along each axis, down to the configured depth. While there are more leaves than the
//! target size, a node at the deepest level that still has children is folded into a leaf.
//! Every pixel is then replaced with the mean color of the leaf it falls into.

use crate::{Color, PixelGrid, PixelSource, Quantizer};
use palette::Srgba;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The maximum supported tree depth, one level per bit of an 8-bit channel.
pub const MAX_DEPTH: u8 = 8;

/// Which node the octree folds first when it has too many leaves.
///
/// Only nodes at the deepest level with children are candidates.
/// Ties go to the node that was created first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReductionStrategy {
    /// Fold the node covering the fewest pixels, keeping popular colors distinct.
    #[default]
    LeastPopular,
    /// Fold the node covering the most pixels, keeping rare colors distinct.
    MostPopular,
}

/// An octree quantizer that bounds the number of distinct colors in an image.
///
/// # Examples
/// ```
/// # use hueprint::{OctreeQuantizer, ReductionStrategy, PixelGrid, Quantizer, ColorCounts};
/// # use palette::Srgba;
/// # fn main() -> Result<(), hueprint::GridError> {
/// let image = PixelGrid::from_fn(16, 16, |x, y| Srgba::new((x * 16) as u8, (y * 16) as u8, 0, 255))?;
///
/// let quantizer = OctreeQuantizer::new(8).strategy(ReductionStrategy::MostPopular);
/// let quantized = quantizer.quantize(&image);
/// assert!(ColorCounts::new(&quantized).num_colors() <= 8);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OctreeQuantizer {
    /// The number of tree levels below the root.
    depth: u8,
    /// The maximum number of leaves (distinct output colors).
    target_size: u16,
    /// The order in which nodes are folded.
    strategy: ReductionStrategy,
}

impl OctreeQuantizer {
    /// The default tree depth.
    pub const DEFAULT_DEPTH: u8 = 6;

    /// Creates a new [`OctreeQuantizer`] that reduces images to at most `target_size` colors.
    ///
    /// A `target_size` of `0` is treated as `1`.
    #[must_use]
    pub const fn new(target_size: u16) -> Self {
        Self {
            depth: Self::DEFAULT_DEPTH,
            target_size,
            strategy: ReductionStrategy::LeastPopular,
        }
    }

    /// Sets the tree depth, clamped to `1..=8`.
    ///
    /// Colors that agree in their top `depth` bits of each channel always share a leaf.
    /// The default depth is `6`.
    #[must_use]
    pub fn depth(mut self, depth: u8) -> Self {
        self.depth = depth.clamp(1, MAX_DEPTH);
        self
    }

    /// Sets the reduction strategy.
    ///
    /// The default is [`ReductionStrategy::LeastPopular`].
    #[must_use]
    pub fn strategy(mut self, strategy: ReductionStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

impl Default for OctreeQuantizer {
    fn default() -> Self {
        Self::new(crate::QUANTIZED_SIZE)
    }
}

impl Quantizer for OctreeQuantizer {
    fn quantize(&self, image: &(impl PixelSource + ?Sized)) -> PixelGrid {
        let mut octree = Octree::new(self.depth);
        for y in 0..image.height() {
            for x in 0..image.width() {
                octree.insert(image.pixel(x, y));
            }
        }

        let target = usize::from(self.target_size.max(1));
        while octree.leaves > target && octree.reduce(self.strategy) {}

        PixelGrid::mapped(image, |color| octree.leaf_color(color))
    }
}

/// A quantizer that returns a copy of the image.
///
/// Useful for images that already have few colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Unquantized;

impl Quantizer for Unquantized {
    fn quantize(&self, image: &(impl PixelSource + ?Sized)) -> PixelGrid {
        PixelGrid::mapped(image, |color| color)
    }
}

/// A node in the [`Octree`] arena.
#[derive(Debug, Clone, Default)]
struct Node {
    /// The per-channel (RGBA) sum of every pixel inserted through this node.
    sum: [u64; 4],
    /// The number of pixels inserted through this node.
    pixels: u64,
    /// Indices of the child nodes.
    children: [Option<usize>; 8],
    /// Whether this node is a leaf.
    leaf: bool,
}

impl Node {
    /// The mean color of the pixels in this node.
    fn mean(&self) -> Color {
        let pixels = self.pixels.max(1);
        #[allow(clippy::cast_possible_truncation)]
        let [r, g, b, a] = self.sum.map(|s| (s / pixels) as u8);
        Srgba::new(r, g, b, a)
    }
}

/// Index of the child to descend into at `level`.
#[inline]
fn child_index(color: Color, level: u8) -> usize {
    let shift = 7 - level;
    let bit = |c: u8| usize::from((c >> shift) & 1);
    (bit(color.red) << 2) | (bit(color.green) << 1) | bit(color.blue)
}

/// An octree over RGB, stored as an arena of [`Node`]s with the root at index `0`.
#[derive(Debug, Clone)]
struct Octree {
    /// The node arena.
    nodes: Vec<Node>,
    /// Non-leaf nodes per level, in creation order.
    reducible: Vec<Vec<usize>>,
    /// The current number of leaves.
    leaves: usize,
    /// The level at which new nodes are leaves.
    depth: u8,
}

impl Octree {
    /// Creates an empty tree. `depth` must be in `1..=8`.
    fn new(depth: u8) -> Self {
        let mut reducible = vec![Vec::new(); usize::from(depth)];
        reducible[0].push(0);
        Self {
            nodes: vec![Node::default()],
            reducible,
            leaves: 0,
            depth,
        }
    }

    /// Adds one pixel, creating nodes down to a leaf as needed.
    fn insert(&mut self, color: Color) {
        let mut node = 0;
        let mut level = 0;
        loop {
            let current = &mut self.nodes[node];
            current.pixels += 1;
            let channels = [color.red, color.green, color.blue, color.alpha];
            for (sum, c) in current.sum.iter_mut().zip(channels) {
                *sum += u64::from(c);
            }

            if current.leaf {
                return;
            }

            let i = child_index(color, level);
            let existing = current.children[i];
            node = if let Some(child) = existing {
                child
            } else {
                let child = self.nodes.len();
                let leaf = level + 1 == self.depth;
                self.nodes[node].children[i] = Some(child);
                self.nodes.push(Node { leaf, ..Node::default() });
                if leaf {
                    self.leaves += 1;
                } else {
                    self.reducible[usize::from(level + 1)].push(child);
                }
                child
            };
            level += 1;
        }
    }

    /// Folds one node into a leaf. Returns `false` if there was nothing left to fold.
    fn reduce(&mut self, strategy: ReductionStrategy) -> bool {
        let Some(level) = self.reducible.iter().rposition(|nodes| !nodes.is_empty()) else {
            return false;
        };

        let candidates = &self.reducible[level];
        let mut chosen = 0;
        for (i, &node) in candidates.iter().enumerate().skip(1) {
            let pixels = self.nodes[node].pixels;
            let best = self.nodes[candidates[chosen]].pixels;
            let better = match strategy {
                ReductionStrategy::LeastPopular => pixels < best,
                ReductionStrategy::MostPopular => pixels > best,
            };
            if better {
                chosen = i;
            }
        }

        let node = self.reducible[level].remove(chosen);
        let node = &mut self.nodes[node];
        let children = node.children.iter().flatten().count();
        node.children = [None; 8];
        node.leaf = true;
        self.leaves = self.leaves + 1 - children;
        true
    }

    /// The mean color of the leaf that `color` falls into.
    fn leaf_color(&self, color: Color) -> Color {
        let mut node = &self.nodes[0];
        let mut level = 0;
        while !node.leaf {
            match node.children[child_index(color, level)] {
                Some(child) => node = &self.nodes[child],
                None => break,
            }
            level += 1;
        }
        node.mean()
    }
}
