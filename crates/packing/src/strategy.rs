//! Packing strategy trait and backend selection.

use crate::guillotine::GuillotinePacker;
use crate::maxrects::{MaxRectsHeuristic, MaxRectsPacker};
use crate::skyline::{SkylineHeuristic, SkylinePacker};
use cutplan_core::Rect;
use std::cmp::Ordering;
use std::fmt;

/// A rectangle placed inside a single bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackedRect {
    /// Left edge inside the bin.
    pub x: f64,
    /// Top edge inside the bin.
    pub y: f64,
    /// Width as placed (after rotation).
    pub width: f64,
    /// Height as placed (after rotation).
    pub height: f64,
    /// Whether the item was turned by 90 degrees.
    pub rotated: bool,
}

impl PackedRect {
    /// The covered rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Fitness of a candidate position. Lower is better, compared lexicographically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub primary: f64,
    pub secondary: f64,
}

impl Score {
    pub fn new(primary: f64, secondary: f64) -> Self {
        Self { primary, secondary }
    }

    /// Returns true if `self` is strictly better than `other`.
    pub fn is_better_than(&self, other: &Score) -> bool {
        self.cmp_total(other) == Ordering::Less
    }

    fn cmp_total(&self, other: &Score) -> Ordering {
        self.primary
            .total_cmp(&other.primary)
            .then(self.secondary.total_cmp(&other.secondary))
    }
}

/// A position a strategy offers for an item, with its fitness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub rect: PackedRect,
    pub score: Score,
}

/// Online rectangle packer for a single bin.
///
/// The multi-bin driver asks every open bin for its best candidate, then
/// commits the overall winner with [`PackingStrategy::place`].
pub trait PackingStrategy: Send {
    /// Bin dimensions.
    fn bin_size(&self) -> (f64, f64);

    /// Best position for a `width x height` item, trying the rotated
    /// orientation too when `allow_rotation` is set.
    fn find_position(&self, width: f64, height: f64, allow_rotation: bool) -> Option<Candidate>;

    /// Commits a candidate previously returned by [`find_position`](Self::find_position).
    fn place(&mut self, rect: PackedRect);

    /// Rectangles placed so far, in placement order.
    fn placed(&self) -> &[PackedRect];

    /// Convenience: find and commit in one step.
    fn insert(&mut self, width: f64, height: f64, allow_rotation: bool) -> Option<PackedRect> {
        let candidate = self.find_position(width, height, allow_rotation)?;
        self.place(candidate.rect);
        Some(candidate.rect)
    }
}

/// Orientations worth trying for an item.
pub(crate) fn orientations(width: f64, height: f64, allow_rotation: bool) -> Vec<(f64, f64, bool)> {
    let mut out = vec![(width, height, false)];
    if allow_rotation && (width - height).abs() > cutplan_core::geometry::EPSILON {
        out.push((height, width, true));
    }
    out
}

/// Available packing backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Maximal rectangles, best area fit.
    MaxRectsBestAreaFit,
    /// Skyline, minimum waste fit.
    SkylineMinWasteFit,
    /// Maximal rectangles, bottom-left.
    MaxRectsBottomLeft,
    /// Skyline, bottom-left with a waste map for gaps.
    SkylineBottomLeftWasteMap,
    /// Guillotine, best area fit, split along the shorter axis.
    GuillotineBestAreaFit,
}

impl Backend {
    /// Every backend, in search order.
    pub const ALL: [Backend; 5] = [
        Backend::MaxRectsBestAreaFit,
        Backend::SkylineMinWasteFit,
        Backend::MaxRectsBottomLeft,
        Backend::SkylineBottomLeftWasteMap,
        Backend::GuillotineBestAreaFit,
    ];

    /// Human readable label, used as the sheet's algorithm name.
    pub fn label(&self) -> &'static str {
        match self {
            Backend::MaxRectsBestAreaFit => "MaxRects Best-Area-Fit",
            Backend::SkylineMinWasteFit => "Skyline Min-Waste-Fit",
            Backend::MaxRectsBottomLeft => "MaxRects Bottom-Left",
            Backend::SkylineBottomLeftWasteMap => "Skyline Bottom-Left Waste-Map",
            Backend::GuillotineBestAreaFit => "Guillotine Best-Area-Fit Split-Axis-Short",
        }
    }

    /// Creates an empty packer for a `width x height` bin.
    pub fn create(&self, width: f64, height: f64) -> Box<dyn PackingStrategy> {
        match self {
            Backend::MaxRectsBestAreaFit => Box::new(MaxRectsPacker::new(
                width,
                height,
                MaxRectsHeuristic::BestAreaFit,
            )),
            Backend::MaxRectsBottomLeft => Box::new(MaxRectsPacker::new(
                width,
                height,
                MaxRectsHeuristic::BottomLeft,
            )),
            Backend::SkylineMinWasteFit => Box::new(SkylinePacker::new(
                width,
                height,
                SkylineHeuristic::MinWasteFit,
                false,
            )),
            Backend::SkylineBottomLeftWasteMap => Box::new(SkylinePacker::new(
                width,
                height,
                SkylineHeuristic::BottomLeft,
                true,
            )),
            Backend::GuillotineBestAreaFit => Box::new(GuillotinePacker::new(width, height)),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
