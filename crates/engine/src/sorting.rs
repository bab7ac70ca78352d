//! Piece orderings tried by the search.

use crate::piece::Piece;
use std::cmp::Ordering;
use std::fmt;

/// Order in which pieces are fed to a packing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    AreaDesc,
    MaxSideDesc,
    PerimeterDesc,
    /// Area, then aspect ratio, both descending.
    Hybrid,
}

impl SortOrder {
    /// Every order, in search order.
    pub const ALL: [SortOrder; 4] = [
        SortOrder::AreaDesc,
        SortOrder::MaxSideDesc,
        SortOrder::PerimeterDesc,
        SortOrder::Hybrid,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::AreaDesc => "Area (descending)",
            SortOrder::MaxSideDesc => "Max side (descending)",
            SortOrder::PerimeterDesc => "Perimeter (descending)",
            SortOrder::Hybrid => "Hybrid (area, aspect)",
        }
    }

    /// Stable sort, so equal keys keep their incoming order.
    pub fn sort(&self, pieces: &mut [Piece]) {
        match self {
            SortOrder::AreaDesc => pieces.sort_by(|a, b| desc(a.area(), b.area())),
            SortOrder::MaxSideDesc => pieces.sort_by(|a, b| desc(max_side(a), max_side(b))),
            SortOrder::PerimeterDesc => pieces.sort_by(|a, b| desc(perimeter(a), perimeter(b))),
            SortOrder::Hybrid => pieces.sort_by(|a, b| {
                desc(a.area(), b.area()).then_with(|| desc(aspect(a), aspect(b)))
            }),
        }
    }

    /// Sorted copy of `pieces`.
    pub fn sorted(&self, pieces: &[Piece]) -> Vec<Piece> {
        let mut out = pieces.to_vec();
        self.sort(&mut out);
        out
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

fn max_side(p: &Piece) -> f64 {
    p.width.max(p.height)
}

fn perimeter(p: &Piece) -> f64 {
    2.0 * (p.width + p.height)
}

fn aspect(p: &Piece) -> f64 {
    p.width.max(p.height) / p.width.min(p.height)
}
