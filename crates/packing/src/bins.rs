//! Offline best-bin-fit packing over a pool of bins.
//!
//! Items are taken in the given order. Each item goes to the open bin whose
//! backend offers the best score; when no open bin can hold it, the next
//! unused bin from the pool that fits is opened. Items that fit nowhere are
//! reported as unplaced.

use crate::strategy::{Backend, PackedRect, PackingStrategy, Score};

/// A bin size and how many bins of it are available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinSpec {
    pub width: f64,
    pub height: f64,
    pub count: usize,
}

impl BinSpec {
    pub fn new(width: f64, height: f64, count: usize) -> Self {
        Self {
            width,
            height,
            count,
        }
    }
}

/// An item to pack; `id` is echoed back in the outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackItem {
    pub id: usize,
    pub width: f64,
    pub height: f64,
}

/// A bin that received at least one item.
#[derive(Debug, Clone)]
pub struct PackedBin {
    /// Index into the `BinSpec` slice the bin was taken from.
    pub spec_index: usize,
    pub width: f64,
    pub height: f64,
    /// Item ids with their positions, in placement order.
    pub items: Vec<(usize, PackedRect)>,
}

/// Result of packing a set of items into a bin pool.
#[derive(Debug, Clone, Default)]
pub struct PackOutcome {
    pub bins: Vec<PackedBin>,
    pub unplaced: Vec<usize>,
}

impl PackOutcome {
    /// Number of placed items.
    pub fn placed_count(&self) -> usize {
        self.bins.iter().map(|b| b.items.len()).sum()
    }

    /// Returns true if every item was placed.
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }
}

struct OpenBin {
    spec_index: usize,
    packer: Box<dyn PackingStrategy>,
    items: Vec<(usize, PackedRect)>,
}

/// Packs `items` into bins drawn from `specs` using `backend`.
pub fn pack_bins(
    backend: Backend,
    specs: &[BinSpec],
    items: &[PackItem],
    allow_rotation: bool,
) -> PackOutcome {
    let mut remaining: Vec<usize> = specs.iter().map(|s| s.count).collect();
    let mut open: Vec<OpenBin> = Vec::new();
    let mut unplaced = Vec::new();

    for item in items {
        let mut best: Option<(usize, PackedRect, Score)> = None;
        for (i, bin) in open.iter().enumerate() {
            if let Some(c) = bin.packer.find_position(item.width, item.height, allow_rotation) {
                if best.map_or(true, |(_, _, s)| c.score.is_better_than(&s)) {
                    best = Some((i, c.rect, c.score));
                }
            }
        }

        if let Some((i, rect, _)) = best {
            open[i].packer.place(rect);
            open[i].items.push((item.id, rect));
            continue;
        }

        let mut placed = false;
        for (spec_index, spec) in specs.iter().enumerate() {
            if remaining[spec_index] == 0 {
                continue;
            }
            let mut packer = backend.create(spec.width, spec.height);
            if let Some(rect) = packer.insert(item.width, item.height, allow_rotation) {
                remaining[spec_index] -= 1;
                open.push(OpenBin {
                    spec_index,
                    packer,
                    items: vec![(item.id, rect)],
                });
                placed = true;
                break;
            }
        }
        if !placed {
            unplaced.push(item.id);
        }
    }

    log::trace!(
        "{}: {} bins opened, {} items unplaced",
        backend.label(),
        open.len(),
        unplaced.len()
    );

    PackOutcome {
        bins: open
            .into_iter()
            .map(|b| {
                let (width, height) = b.packer.bin_size();
                PackedBin {
                    spec_index: b.spec_index,
                    width,
                    height,
                    items: b.items,
                }
            })
            .collect(),
        unplaced,
    }
}
