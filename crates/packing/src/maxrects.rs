//! Maximal rectangles packer.
//!
//! Keeps the set of maximal free rectangles of the bin. Placing an item
//! splits every free rectangle it intersects into up to four maximal
//! remainders, after which free rectangles contained in another one are
//! pruned.
//!
//! Two heuristics are supported:
//!
//! | Heuristic | Primary score | Tie break |
//! |-----------|---------------|-----------|
//! | `BestAreaFit` | leftover area of the free rectangle | shorter leftover side |
//! | `BottomLeft` | bottom edge of the item | left edge |
//!
//! Coordinates use a top-left origin, so "bottom-left" packs towards the
//! origin corner (lowest `y + height`, then lowest `x`).

use crate::strategy::{orientations, Candidate, PackedRect, PackingStrategy, Score};
use cutplan_core::geometry::EPSILON;
use cutplan_core::Rect;

/// Placement heuristic of [`MaxRectsPacker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxRectsHeuristic {
    BestAreaFit,
    BottomLeft,
}

/// Maximal rectangles packer for one bin.
#[derive(Debug, Clone)]
pub struct MaxRectsPacker {
    width: f64,
    height: f64,
    heuristic: MaxRectsHeuristic,
    free: Vec<Rect>,
    placed: Vec<PackedRect>,
}

impl MaxRectsPacker {
    /// Creates an empty packer for a `width x height` bin.
    pub fn new(width: f64, height: f64, heuristic: MaxRectsHeuristic) -> Self {
        let free = if width > 0.0 && height > 0.0 {
            vec![Rect::from_size(width, height)]
        } else {
            Vec::new()
        };
        Self {
            width,
            height,
            heuristic,
            free,
            placed: Vec::new(),
        }
    }

    /// Current maximal free rectangles.
    pub fn free_rects(&self) -> &[Rect] {
        &self.free
    }

    fn score(&self, free: &Rect, w: f64, h: f64) -> Score {
        match self.heuristic {
            MaxRectsHeuristic::BestAreaFit => {
                let leftover_area = free.area() - w * h;
                let short_side = (free.width - w).min(free.height - h);
                Score::new(leftover_area, short_side)
            }
            MaxRectsHeuristic::BottomLeft => Score::new(free.y + h, free.x),
        }
    }

    /// Splits `free` around `used`, returning the maximal remainders.
    fn split(free: &Rect, used: &Rect) -> Vec<Rect> {
        let mut out = Vec::with_capacity(4);
        // Left
        if used.x > free.x + EPSILON {
            out.push(Rect::new(free.x, free.y, used.x - free.x, free.height));
        }
        // Right
        if used.right() < free.right() - EPSILON {
            out.push(Rect::new(
                used.right(),
                free.y,
                free.right() - used.right(),
                free.height,
            ));
        }
        // Top
        if used.y > free.y + EPSILON {
            out.push(Rect::new(free.x, free.y, free.width, used.y - free.y));
        }
        // Bottom
        if used.bottom() < free.bottom() - EPSILON {
            out.push(Rect::new(
                free.x,
                used.bottom(),
                free.width,
                free.bottom() - used.bottom(),
            ));
        }
        out
    }

    /// Removes free rectangles contained in another free rectangle.
    fn prune(&mut self) {
        let mut keep = vec![true; self.free.len()];
        for i in 0..self.free.len() {
            if !keep[i] {
                continue;
            }
            for j in 0..self.free.len() {
                if i == j || !keep[j] {
                    continue;
                }
                if self.free[j].contains(&self.free[i]) {
                    keep[i] = false;
                    break;
                }
            }
        }
        let mut idx = 0;
        self.free.retain(|_| {
            let k = keep[idx];
            idx += 1;
            k
        });
    }
}

impl PackingStrategy for MaxRectsPacker {
    fn bin_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn find_position(&self, width: f64, height: f64, allow_rotation: bool) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for free in &self.free {
            for (w, h, rotated) in orientations(width, height, allow_rotation) {
                if !free.fits(w, h) {
                    continue;
                }
                let score = self.score(free, w, h);
                if best.map_or(true, |b| score.is_better_than(&b.score)) {
                    best = Some(Candidate {
                        rect: PackedRect {
                            x: free.x,
                            y: free.y,
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
        let used = rect.rect();
        let mut next = Vec::with_capacity(self.free.len() + 4);
        for free in &self.free {
            if free.overlaps(&used) {
                next.extend(Self::split(free, &used));
            } else {
                next.push(*free);
            }
        }
        self.free = next;
        self.prune();
        self.placed.push(rect);
    }

    fn placed(&self) -> &[PackedRect] {
        &self.placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_produces_maximal_remainders() {
        let mut packer = MaxRectsPacker::new(100.0, 100.0, MaxRectsHeuristic::BestAreaFit);
        packer.insert(40.0, 30.0, false).unwrap();
        let free = packer.free_rects();
        assert_eq!(free.len(), 2);
        assert!(free.contains(&Rect::new(40.0, 0.0, 60.0, 100.0)));
        assert!(free.contains(&Rect::new(0.0, 30.0, 100.0, 70.0)));
    }

    #[test]
    fn test_exact_fill() {
        let mut packer = MaxRectsPacker::new(100.0, 100.0, MaxRectsHeuristic::BestAreaFit);
        for _ in 0..4 {
            assert!(packer.insert(50.0, 50.0, false).is_some());
        }
        assert!(packer.free_rects().is_empty());
        assert!(packer.insert(1.0, 1.0, true).is_none());
    }

    #[test]
    fn test_best_area_fit_prefers_tight_slot() {
        let mut packer = MaxRectsPacker::new(100.0, 100.0, MaxRectsHeuristic::BestAreaFit);
        packer.insert(100.0, 60.0, false).unwrap();
        packer.insert(70.0, 40.0, false).unwrap();
        // Remaining free space: 30x40 at (70, 60).
        let r = packer.insert(30.0, 40.0, false).unwrap();
        assert_eq!((r.x, r.y), (70.0, 60.0));
    }

    #[test]
    fn test_bottom_left_fills_rows_from_origin() {
        let mut packer = MaxRectsPacker::new(100.0, 100.0, MaxRectsHeuristic::BottomLeft);
        let a = packer.insert(30.0, 20.0, false).unwrap();
        let b = packer.insert(30.0, 20.0, false).unwrap();
        let c = packer.insert(30.0, 20.0, false).unwrap();
        assert_eq!((a.x, a.y), (0.0, 0.0));
        assert_eq!((b.x, b.y), (30.0, 0.0));
        assert_eq!((c.x, c.y), (60.0, 0.0));
    }

    #[test]
    fn test_empty_bin_accepts_nothing() {
        let packer = MaxRectsPacker::new(0.0, 100.0, MaxRectsHeuristic::BottomLeft);
        assert!(packer.find_position(1.0, 1.0, true).is_none());
    }
}
