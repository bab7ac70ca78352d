//! Guillotine packer: best area fit, split along the shorter axis, with
//! free rectangle merging.

use crate::strategy::{orientations, Candidate, PackedRect, PackingStrategy, Score};
use cutplan_core::geometry::EPSILON;
use cutplan_core::Rect;

#[derive(Debug, Clone)]
pub struct GuillotinePacker {
    width: f64,
    height: f64,
    free: Vec<Rect>,
    placed: Vec<PackedRect>,
}

impl GuillotinePacker {
    pub fn new(width: f64, height: f64) -> Self {
        let free = if width > 0.0 && height > 0.0 {
            vec![Rect::from_size(width, height)]
        } else {
            Vec::new()
        };
        Self {
            width,
            height,
            free,
            placed: Vec::new(),
        }
    }

    /// Free rectangles; disjoint by construction.
    pub fn free_rects(&self) -> &[Rect] {
        &self.free
    }

    /// Adds an externally produced free region, e.g. a gap left under a skyline.
    pub fn add_free(&mut self, rect: Rect) {
        if !rect.is_empty() {
            self.free.push(rect);
            self.merge();
        }
    }

    /// Best area fit among free rectangles.
    pub(crate) fn best_fit(&self, width: f64, height: f64, allow_rotation: bool) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for free in &self.free {
            for (w, h, rotated) in orientations(width, height, allow_rotation) {
                if !free.fits(w, h) {
                    continue;
                }
                let score = Score::new(
                    free.area() - w * h,
                    (free.width - w).min(free.height - h),
                );
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

    /// Splits the free rectangle anchored at the item. Returns false if none matches.
    pub(crate) fn split_at(&mut self, rect: &PackedRect) -> bool {
        let used = rect.rect();
        let Some(pos) = self.free.iter().position(|f| {
            (f.x - used.x).abs() <= EPSILON && (f.y - used.y).abs() <= EPSILON && f.contains(&used)
        }) else {
            return false;
        };
        let free = self.free.swap_remove(pos);

        let right_w = free.width - used.width;
        let bottom_h = free.height - used.height;
        // Split along the shorter axis of the free rectangle.
        let (right, bottom) = if free.width < free.height {
            (
                Rect::new(used.right(), free.y, right_w, used.height),
                Rect::new(free.x, used.bottom(), free.width, bottom_h),
            )
        } else {
            (
                Rect::new(used.right(), free.y, right_w, free.height),
                Rect::new(free.x, used.bottom(), used.width, bottom_h),
            )
        };
        for r in [right, bottom] {
            if !r.is_empty() {
                self.free.push(r);
            }
        }
        self.merge();
        true
    }

    /// Joins pairs of free rectangles that share a full edge.
    fn merge(&mut self) {
        let mut merged = true;
        while merged {
            merged = false;
            'outer: for i in 0..self.free.len() {
                for j in (i + 1)..self.free.len() {
                    let (a, b) = (self.free[i], self.free[j]);
                    let joined = if close(a.width, b.width) && close(a.x, b.x) {
                        if close(a.bottom(), b.y) {
                            Some(Rect::new(a.x, a.y, a.width, a.height + b.height))
                        } else if close(b.bottom(), a.y) {
                            Some(Rect::new(b.x, b.y, a.width, a.height + b.height))
                        } else {
                            None
                        }
                    } else if close(a.height, b.height) && close(a.y, b.y) {
                        if close(a.right(), b.x) {
                            Some(Rect::new(a.x, a.y, a.width + b.width, a.height))
                        } else if close(b.right(), a.x) {
                            Some(Rect::new(b.x, b.y, a.width + b.width, a.height))
                        } else {
                            None
                        }
                    } else {
                        None
                    };
                    if let Some(r) = joined {
                        self.free[i] = r;
                        self.free.swap_remove(j);
                        merged = true;
                        break 'outer;
                    }
                }
            }
        }
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}

impl PackingStrategy for GuillotinePacker {
    fn bin_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn find_position(&self, width: f64, height: f64, allow_rotation: bool) -> Option<Candidate> {
        self.best_fit(width, height, allow_rotation)
    }

    fn place(&mut self, rect: PackedRect) {
        if !self.split_at(&rect) {
            log::warn!(
                "guillotine: no free rectangle at ({}, {}) for {}x{}",
                rect.x,
                rect.y,
                rect.width,
                rect.height
            );
        }
        self.placed.push(rect);
    }

    fn placed(&self) -> &[PackedRect] {
        &self.placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutplan_core::geometry::find_overlaps;

    #[test]
    fn test_shorter_axis_split() {
        // Wide bin: vertical split, right part spans the full height.
        let mut packer = GuillotinePacker::new(100.0, 50.0);
        packer.insert(30.0, 20.0, false).unwrap();
        let free = packer.free_rects();
        assert!(free.contains(&Rect::new(30.0, 0.0, 70.0, 50.0)));
        assert!(free.contains(&Rect::new(0.0, 20.0, 30.0, 30.0)));

        // Tall bin: horizontal split, bottom part spans the full width.
        let mut packer = GuillotinePacker::new(50.0, 100.0);
        packer.insert(30.0, 20.0, false).unwrap();
        let free = packer.free_rects();
        assert!(free.contains(&Rect::new(30.0, 0.0, 20.0, 20.0)));
        assert!(free.contains(&Rect::new(0.0, 20.0, 50.0, 80.0)));
    }

    #[test]
    fn test_free_rects_stay_disjoint() {
        let mut packer = GuillotinePacker::new(200.0, 100.0);
        for (w, h) in [(50.0, 40.0), (70.0, 30.0), (20.0, 90.0), (60.0, 60.0)] {
            packer.insert(w, h, true).unwrap();
        }
        assert!(find_overlaps(packer.free_rects()).is_empty());
    }

    #[test]
    fn test_add_free_merges_neighbours() {
        let mut packer = GuillotinePacker::new(0.0, 0.0);
        packer.add_free(Rect::new(0.0, 0.0, 10.0, 5.0));
        packer.add_free(Rect::new(10.0, 0.0, 10.0, 5.0));
        assert_eq!(packer.free_rects(), &[Rect::new(0.0, 0.0, 20.0, 5.0)]);
        assert!(packer.insert(20.0, 5.0, false).is_some());
    }
}
