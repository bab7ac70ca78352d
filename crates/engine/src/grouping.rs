//! Partitioning parts by material and sizing the initial bin pool.

use crate::piece::{expand_pieces, total_area, Piece};
use cutplan_core::{GroupKey, Part, SheetSize};
use std::collections::HashMap;

/// Parts sharing one material and thickness.
#[derive(Debug, Clone)]
pub struct Group<'a> {
    pub key: GroupKey,
    pub parts: Vec<&'a Part>,
}

impl<'a> Group<'a> {
    /// All pieces of the group, in part order.
    pub fn pieces(&self) -> Vec<Piece> {
        expand_pieces(self.parts.iter().copied())
    }

    /// Number of pieces in the group.
    pub fn piece_count(&self) -> usize {
        self.parts.iter().map(|p| p.quantity()).sum()
    }

    /// Unpadded area of all pieces.
    pub fn total_area(&self) -> f64 {
        self.parts.iter().map(|p| p.total_area()).sum()
    }
}

/// Groups parts by key, in first-seen key order.
pub fn group_parts(parts: &[Part]) -> Vec<Group<'_>> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<Group<'_>> = Vec::new();
    for part in parts {
        let key = part.group_key();
        match index.get(&key) {
            Some(&i) => groups[i].parts.push(part),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    parts: vec![part],
                });
            }
        }
    }
    groups
}

/// Minimum number of bins of each size needed to hold `area`, ignoring
/// geometry. Sizes whose packable region is empty get no bins.
pub fn bin_counts(area: f64, sizes: &[SheetSize], edge_margin: f64) -> Vec<usize> {
    sizes
        .iter()
        .map(|size| {
            let (w, h) = size.effective(edge_margin);
            if w <= 0.0 || h <= 0.0 {
                return 0;
            }
            ((area / (w * h)).ceil() as usize).max(1)
        })
        .collect()
}

/// [`bin_counts`] for a piece list.
pub fn bin_counts_for(pieces: &[Piece], sizes: &[SheetSize], edge_margin: f64) -> Vec<usize> {
    bin_counts(total_area(pieces), sizes, edge_margin)
}
