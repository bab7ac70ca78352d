//! Skyline packer.
//!
//! The bin is filled from the top edge downwards. The skyline is a list of
//! horizontal segments, each recording how deep the bin is filled over its
//! x-range. Items are always placed on top of the skyline at the left edge
//! of a segment.
//!
//! With the waste map enabled, the gaps an item leaves between itself and
//! the lower segments it spans are kept in a [`GuillotinePacker`] and offered
//! first to later items.

use crate::guillotine::GuillotinePacker;
use crate::strategy::{orientations, Candidate, PackedRect, PackingStrategy, Score};
use cutplan_core::geometry::EPSILON;
use cutplan_core::Rect;

/// Placement heuristic of [`SkylinePacker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkylineHeuristic {
    /// Lowest resulting bottom edge, then leftmost.
    BottomLeft,
    /// Least area trapped under the item, then lowest bottom edge.
    MinWasteFit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    x: f64,
    y: f64,
    width: f64,
}

impl Segment {
    fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// Skyline packer for one bin.
#[derive(Debug, Clone)]
pub struct SkylinePacker {
    width: f64,
    height: f64,
    heuristic: SkylineHeuristic,
    skyline: Vec<Segment>,
    waste: Option<GuillotinePacker>,
    placed: Vec<PackedRect>,
}

impl SkylinePacker {
    pub fn new(width: f64, height: f64, heuristic: SkylineHeuristic, waste_map: bool) -> Self {
        let skyline = if width > 0.0 && height > 0.0 {
            vec![Segment {
                x: 0.0,
                y: 0.0,
                width,
            }]
        } else {
            Vec::new()
        };
        Self {
            width,
            height,
            heuristic,
            skyline,
            waste: waste_map.then(|| GuillotinePacker::new(0.0, 0.0)),
            placed: Vec::new(),
        }
    }

    /// Depth at which a `w x h` item starting at segment `i` would sit, and
    /// the area trapped beneath it.
    fn fit(&self, i: usize, w: f64, h: f64) -> Option<(f64, f64)> {
        let x = self.skyline[i].x;
        if x + w > self.width + EPSILON {
            return None;
        }
        let right = x + w;
        let mut y: f64 = 0.0;
        let mut j = i;
        while j < self.skyline.len() && self.skyline[j].x < right - EPSILON {
            y = y.max(self.skyline[j].y);
            j += 1;
        }
        if y + h > self.height + EPSILON {
            return None;
        }
        let waste = self.skyline[i..j]
            .iter()
            .map(|s| (s.right().min(right) - s.x) * (y - s.y))
            .sum();
        Some((y, waste))
    }

    fn raise(&mut self, rect: &PackedRect) {
        let left = rect.x;
        let right = rect.x + rect.width;
        let bottom = rect.y + rect.height;

        let mut next = Vec::with_capacity(self.skyline.len() + 2);
        for seg in &self.skyline {
            if seg.right() <= left + EPSILON || seg.x >= right - EPSILON {
                next.push(*seg);
                continue;
            }
            if let Some(waste) = self.waste.as_mut() {
                let gap_x = seg.x.max(left);
                let gap_w = seg.right().min(right) - gap_x;
                waste.add_free(Rect::new(gap_x, seg.y, gap_w, rect.y - seg.y));
            }
            if seg.x < left - EPSILON {
                next.push(Segment {
                    x: seg.x,
                    y: seg.y,
                    width: left - seg.x,
                });
            }
            if seg.right() > right + EPSILON {
                next.push(Segment {
                    x: right,
                    y: seg.y,
                    width: seg.right() - right,
                });
            }
        }
        next.push(Segment {
            x: left,
            y: bottom,
            width: rect.width,
        });
        next.sort_by(|a, b| a.x.total_cmp(&b.x));

        // Merge neighbours at the same depth.
        let mut merged: Vec<Segment> = Vec::with_capacity(next.len());
        for seg in next {
            match merged.last_mut() {
                Some(last) if (last.y - seg.y).abs() <= EPSILON => last.width += seg.width,
                _ => merged.push(seg),
            }
        }
        self.skyline = merged;
    }
}

impl PackingStrategy for SkylinePacker {
    fn bin_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn find_position(&self, width: f64, height: f64, allow_rotation: bool) -> Option<Candidate> {
        if let Some(waste) = &self.waste {
            if let Some(c) = waste.best_fit(width, height, allow_rotation) {
                // Gaps are preferred over growing the skyline.
                return Some(Candidate {
                    rect: c.rect,
                    score: Score::new(0.0, c.score.primary),
                });
            }
        }

        let mut best: Option<Candidate> = None;
        for i in 0..self.skyline.len() {
            for (w, h, rotated) in orientations(width, height, allow_rotation) {
                let Some((y, waste)) = self.fit(i, w, h) else {
                    continue;
                };
                let x = self.skyline[i].x;
                let score = match self.heuristic {
                    SkylineHeuristic::BottomLeft => Score::new(y + h, x),
                    SkylineHeuristic::MinWasteFit => Score::new(waste, y + h),
                };
                if best.map_or(true, |b| score.is_better_than(&b.score)) {
                    best = Some(Candidate {
                        rect: PackedRect {
                            x,
                            y,
                            width: w,
                            height: h,
                            rotated,
                        },
                        score,
                    });
                }
            }
        }
        best
    }

    fn place(&mut self, rect: PackedRect) {
        let in_gap = self
            .waste
            .as_mut()
            .map_or(false, |waste| waste.split_at(&rect));
        if !in_gap {
            self.raise(&rect);
        }
        self.placed.push(rect);
    }

    fn placed(&self) -> &[PackedRect] {
        &self.placed
    }
}
