//! Heuristic search over sort orders and packing backends.
//!
//! Every group is packed once per (sort order, backend) pair. Each attempt
//! starts from the area-based bin estimate and grows the bin pool while that
//! keeps placing more pieces. The attempt with the highest utilization wins;
//! near-equal utilizations go to the faster attempt.

use crate::budget::Budget;
use crate::grouping::{bin_counts_for, Group};
use crate::piece::{total_area, Piece};
use crate::sorting::SortOrder;
use cutplan_core::{Error, PlanConfig, Placement, Rect, Result, Sheet, SheetSize};
use cutplan_packing::{pack_bins, Backend, BinSpec, PackItem, PackOutcome, PackedRect};
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

/// Placements destined for one sheet of a given size.
#[derive(Debug, Clone)]
pub struct PackedSheet {
    pub size: SheetSize,
    pub placements: Vec<Placement>,
}

/// A successful (sort order, backend) attempt.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub sort: SortOrder,
    pub backend: Backend,
    pub sheets: Vec<PackedSheet>,
    /// Piece area over the area of all used sheets.
    pub utilization: f64,
    /// Total area of the used sheets.
    pub sheet_area: f64,
    pub elapsed: Duration,
}

impl Attempt {
    /// Returns true if `self` should replace `other` as the best attempt.
    pub fn is_better_than(&self, other: &Attempt, tie_epsilon: f64) -> bool {
        if (self.utilization - other.utilization).abs() <= tie_epsilon {
            self.elapsed < other.elapsed
        } else {
            self.utilization > other.utilization
        }
    }
}

fn bin_specs(sizes: &[SheetSize], counts: &[usize], edge_margin: f64) -> Vec<BinSpec> {
    sizes
        .iter()
        .zip(counts)
        .map(|(size, &count)| {
            let (w, h) = size.effective(edge_margin);
            BinSpec::new(w, h, count)
        })
        .collect()
}

/// Per-side size mismatch between a packed rectangle and `(w, h)`.
fn deviation(packed: &PackedRect, w: f64, h: f64) -> (f64, f64) {
    ((packed.width - w).abs(), (packed.height - h).abs())
}

/// Maps a position inside an effective bin back to sheet coordinates.
pub fn to_placement(piece: &Piece, packed: &PackedRect, config: &PlanConfig) -> Placement {
    let (pw, ph) = piece.padded(config.spacing);
    let tol = config.rotation_tolerance;
    let (uw, uh) = deviation(packed, pw, ph);
    let (tw, th) = deviation(packed, ph, pw);
    let upright = uw <= tol && uh <= tol;
    let turned = tw <= tol && th <= tol;
    // Nearly square pieces can match both orientations; the closer one wins.
    let rotated = match (upright, turned) {
        (true, false) => false,
        (false, true) => true,
        (true, true) if uw + uh != tw + th => tw + th < uw + uh,
        _ => packed.rotated,
    };

    let (width, height) = if rotated {
        (piece.height, piece.width)
    } else {
        (piece.width, piece.height)
    };
    let x = config.edge_margin + packed.x;
    let y = config.edge_margin + packed.y;
    let half = config.half_spacing();
    Placement::new(
        piece.part_id,
        piece.reference.clone(),
        piece.instance,
        x + half,
        y + half,
        width,
        height,
        rotated,
    )
    .with_spacing(Rect::new(x, y, packed.width, packed.height))
}

/// Packs `pieces` in the given order with one backend, adding bins while
/// that keeps placing more pieces.
///
/// Fails with [`Error::Backend`] if any piece is still unplaced.
pub fn pack_with_growth(
    pieces: &[Piece],
    backend: Backend,
    config: &PlanConfig,
) -> Result<Vec<PackedSheet>> {
    let sizes = &config.sheet_sizes;
    let items: Vec<PackItem> = pieces
        .iter()
        .enumerate()
        .map(|(id, piece)| {
            let (width, height) = piece.padded(config.spacing);
            PackItem { id, width, height }
        })
        .collect();

    let mut counts = bin_counts_for(pieces, sizes, config.edge_margin);
    let usable: Vec<bool> = counts.iter().map(|&c| c > 0).collect();
    let mut outcome = pack_bins(
        backend,
        &bin_specs(sizes, &counts, config.edge_margin),
        &items,
        true,
    );

    let mut rounds = 0;
    while !outcome.is_complete() {
        let placed = outcome.placed_count();
        if placed == 0 || rounds >= config.max_bin_rounds {
            break;
        }
        let extra = outcome
            .unplaced
            .len()
            .div_ceil(config.extra_bin_divisor)
            .max(1);
        for (count, &ok) in counts.iter_mut().zip(&usable) {
            if ok {
                *count += extra;
            }
        }
        log::trace!(
            "{}: {} unplaced, adding {} bins per size",
            backend.label(),
            outcome.unplaced.len(),
            extra
        );
        let next: PackOutcome = pack_bins(
            backend,
            &bin_specs(sizes, &counts, config.edge_margin),
            &items,
            true,
        );
        rounds += 1;
        let improved = next.placed_count() > placed;
        outcome = next;
        if !improved {
            break;
        }
    }

    if !outcome.is_complete() {
        return Err(Error::Backend(format!(
            "{}: {} of {} pieces could not be placed",
            backend.label(),
            outcome.unplaced.len(),
            pieces.len()
        )));
    }

    Ok(outcome
        .bins
        .into_iter()
        .map(|bin| PackedSheet {
            size: sizes[bin.spec_index],
            placements: bin
                .items
                .iter()
                .map(|(id, rect)| to_placement(&pieces[*id], rect, config))
                .collect(),
        })
        .collect())
}

/// Runs a single (sort order, backend) attempt.
pub fn run_attempt(
    pieces: &[Piece],
    sort: SortOrder,
    backend: Backend,
    config: &PlanConfig,
) -> Result<Attempt> {
    let start = Instant::now();
    let ordered = sort.sorted(pieces);
    let sheets = pack_with_growth(&ordered, backend, config)?;
    let sheet_area: f64 = sheets.iter().map(|s| s.size.area()).sum();
    let utilization = if sheet_area > 0.0 {
        total_area(pieces) / sheet_area
    } else {
        0.0
    };
    Ok(Attempt {
        sort,
        backend,
        sheets,
        utilization,
        sheet_area,
        elapsed: start.elapsed(),
    })
}

/// Runs an attempt, turning a panic inside a backend into an attempt failure.
fn guarded_attempt(
    pieces: &[Piece],
    sort: SortOrder,
    backend: Backend,
    config: &PlanConfig,
    budget: &Budget,
) -> Result<Attempt> {
    budget.check()?;
    match catch_unwind(AssertUnwindSafe(|| run_attempt(pieces, sort, backend, config))) {
        Ok(result) => result,
        Err(_) => Err(Error::Backend(format!("{sort} / {backend}: panicked"))),
    }
}

/// Every (sort order, backend) pair, in evaluation order.
pub fn attempt_plan() -> Vec<(SortOrder, Backend)> {
    SortOrder::ALL
        .iter()
        .flat_map(|&sort| Backend::ALL.iter().map(move |&backend| (sort, backend)))
        .collect()
}

/// Picks the best successful attempt, in evaluation order.
///
/// Terminal errors (timeout, cancellation) are returned; attempt failures
/// are logged and skipped.
pub fn select_best(
    results: Vec<Result<Attempt>>,
    tie_epsilon: f64,
) -> Result<Option<Attempt>> {
    let mut best: Option<Attempt> = None;
    for result in results {
        match result {
            Ok(attempt) if attempt.sheet_area <= 0.0 => {
                log::debug!("{} / {}: no sheet area, skipped", attempt.sort, attempt.backend);
            }
            Ok(attempt) => {
                log::debug!(
                    "{} / {}: {} sheets, utilization {:.4} in {:?}",
                    attempt.sort,
                    attempt.backend,
                    attempt.sheets.len(),
                    attempt.utilization,
                    attempt.elapsed
                );
                if best
                    .as_ref()
                    .map_or(true, |b| attempt.is_better_than(b, tie_epsilon))
                {
                    best = Some(attempt);
                }
            }
            Err(e) if e.is_terminal() => return Err(e),
            Err(e) => log::debug!("attempt skipped: {e}"),
        }
    }
    Ok(best)
}

/// Packs one group, returning its sheets labelled with the winning attempt.
pub fn search_group(group: &Group<'_>, config: &PlanConfig, budget: &Budget) -> Result<Vec<Sheet>> {
    let pieces = group.pieces();
    let plan = attempt_plan();

    let results: Vec<Result<Attempt>> = if config.parallel {
        plan.par_iter()
            .map(|&(sort, backend)| guarded_attempt(&pieces, sort, backend, config, budget))
            .collect()
    } else {
        plan.iter()
            .map(|&(sort, backend)| guarded_attempt(&pieces, sort, backend, config, budget))
            .collect()
    };

    let Some(best) = select_best(results, config.tie_epsilon)? else {
        return Err(Error::Unpackable {
            material: group.key.material.clone(),
            thickness: group.key.thickness,
            reason: format!(
                "none of {} attempts placed all {} pieces",
                plan.len(),
                pieces.len()
            ),
        });
    };

    log::info!(
        "{}: {} sheets with {} / {} (utilization {:.1}%)",
        group.key,
        best.sheets.len(),
        best.sort,
        best.backend,
        best.utilization * 100.0
    );

    Ok(best
        .sheets
        .into_iter()
        .map(|s| {
            Sheet::new(0, s.size, &group.key, s.placements)
                .with_labels(best.backend.label(), best.sort.label())
        })
        .collect())
}
