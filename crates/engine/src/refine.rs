//! Local refinement of sparsely used sheets.
//!
//! A sheet wasting more than the configured fraction is re-laid out with a
//! deterministic grid scan: pieces are taken largest first and dropped at
//! the first grid position (column by column) where their padded footprint
//! fits. A piece that finds no slot keeps its original position. The new
//! layout only replaces the old one if it is valid and no more spread out.

use crate::piece::Piece;
use cutplan_core::geometry::EPSILON;
use cutplan_core::{PlanConfig, Placement, Rect, Sheet};

/// Returns true if the sheet's waste exceeds the refinement threshold.
pub fn needs_refinement(sheet: &Sheet, config: &PlanConfig) -> bool {
    sheet.efficiency().waste_percent > config.refine_waste_threshold
}

/// First grid position inside `envelope` where a `w x h` box avoids `taken`.
fn scan(envelope: &Rect, w: f64, h: f64, step: f64, taken: &[Rect]) -> Option<Rect> {
    let mut x = envelope.x;
    while x + w <= envelope.right() + EPSILON {
        let mut y = envelope.y;
        while y + h <= envelope.bottom() + EPSILON {
            let candidate = Rect::new(x, y, w, h);
            match taken.iter().find(|r| r.overlaps(&candidate)) {
                None => return Some(candidate),
                Some(blocker) => {
                    // Every grid row above the blocker's bottom edge collides too.
                    let steps = ((blocker.bottom() - envelope.y) / step - EPSILON).ceil();
                    y = (envelope.y + steps * step).max(y + step);
                }
            }
        }
        x += step;
    }
    None
}

/// Computes a refined layout, or `None` if refinement has to be abandoned.
pub fn refined_layout(sheet: &Sheet, config: &PlanConfig) -> Option<Vec<Placement>> {
    let margin = config.edge_margin;
    let envelope = Rect::new(
        margin,
        margin,
        sheet.size.width - 2.0 * margin,
        sheet.size.height - 2.0 * margin,
    );
    if envelope.is_empty() {
        return None;
    }

    let placements = sheet.placements();
    let mut order: Vec<usize> = (0..placements.len()).collect();
    order.sort_by(|&a, &b| placements[b].area().total_cmp(&placements[a].area()));

    let half = config.half_spacing();
    let step = config.refine_grid_step;
    let mut taken: Vec<Rect> = Vec::with_capacity(placements.len());
    let mut result: Vec<Option<Placement>> = vec![None; placements.len()];

    for idx in order {
        let original = &placements[idx];
        let piece = Piece::from_placement(original);
        let (pw, ph) = piece.padded(config.spacing);

        let mut slot = scan(&envelope, pw, ph, step, &taken).map(|r| (r, false));
        if slot.is_none() && (piece.width - piece.height).abs() > EPSILON {
            slot = scan(&envelope, ph, pw, step, &taken).map(|r| (r, true));
        }

        let placement = match slot {
            Some((spacing, rotated)) => {
                let (w, h) = if rotated {
                    (piece.height, piece.width)
                } else {
                    (piece.width, piece.height)
                };
                Placement::new(
                    piece.part_id,
                    piece.reference.clone(),
                    piece.instance,
                    spacing.x + half,
                    spacing.y + half,
                    w,
                    h,
                    rotated,
                )
                .with_spacing(spacing)
            }
            None => {
                let footprint = original.footprint();
                if taken.iter().any(|r| r.overlaps(&footprint)) {
                    log::debug!(
                        "sheet {}: {}#{} cannot keep its position, refinement abandoned",
                        sheet.index,
                        original.reference,
                        original.instance
                    );
                    return None;
                }
                original.clone()
            }
        };
        taken.push(placement.footprint());
        result[idx] = Some(placement);
    }

    result.into_iter().collect()
}

fn extent_area(sheet: &Sheet) -> f64 {
    sheet.occupied_extent().map_or(0.0, |r| r.area())
}

/// Refines `sheet` in place. Returns true if the new layout was accepted.
pub fn refine_sheet(sheet: &mut Sheet, config: &PlanConfig) -> bool {
    let Some(layout) = refined_layout(sheet, config) else {
        return false;
    };

    let mut candidate = sheet.clone();
    candidate.replace_placements(layout);
    if let Err(e) = candidate.validate() {
        log::warn!("sheet {}: refined layout rejected: {e}", sheet.index);
        return false;
    }
    if extent_area(&candidate) > extent_area(sheet) + EPSILON {
        log::debug!("sheet {}: refined layout is more spread out, kept original", sheet.index);
        return false;
    }

    candidate.refined = true;
    *sheet = candidate;
    true
}

/// Refines every sheet whose waste exceeds the threshold. Returns the number
/// of sheets whose layout changed.
pub fn refine_sheets(sheets: &mut [Sheet], config: &PlanConfig) -> usize {
    let mut refined = 0;
    for sheet in sheets.iter_mut() {
        if needs_refinement(sheet, config) && refine_sheet(sheet, config) {
            refined += 1;
        }
    }
    refined
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutplan_core::{GroupKey, PartId, SheetSize};

    fn placement(id: u32, x: f64, y: f64, w: f64, h: f64) -> Placement {
        Placement::new(PartId(id), format!("P{id}"), 0, x + 5.0, y + 5.0, w, h, false)
            .with_spacing(Rect::new(x, y, w + 10.0, h + 10.0))
    }

    fn sheet(placements: Vec<Placement>) -> Sheet {
        Sheet::new(0, SheetSize::new(1000.0, 1000.0), &GroupKey::new("MDF", 18.0), placements)
    }

    #[test]
    fn test_scan_skips_blockers() {
        let envelope = Rect::new(10.0, 10.0, 100.0, 100.0);
        let taken = [Rect::new(10.0, 10.0, 40.0, 35.0)];
        let r = scan(&envelope, 30.0, 30.0, 10.0, &taken).unwrap();
        assert_eq!((r.x, r.y), (10.0, 50.0));
    }

    #[test]
    fn test_scan_reports_no_room() {
        let envelope = Rect::new(0.0, 0.0, 50.0, 50.0);
        assert!(scan(&envelope, 60.0, 10.0, 10.0, &[]).is_none());
    }

    #[test]
    fn test_compacts_scattered_layout() {
        let mut s = sheet(vec![
            placement(0, 500.0, 500.0, 200.0, 100.0),
            placement(1, 800.0, 10.0, 100.0, 100.0),
        ]);
        assert!(needs_refinement(&s, &PlanConfig::default()));
        assert!(refine_sheet(&mut s, &PlanConfig::default()));
        assert!(s.refined);
        s.validate().unwrap();

        // Largest piece goes to the origin corner of the envelope.
        let big = &s.placements()[0];
        assert_eq!(big.spacing.unwrap(), Rect::new(10.0, 10.0, 210.0, 110.0));
        assert_eq!((big.x, big.y), (15.0, 15.0));
        let small = &s.placements()[1];
        assert_eq!(small.spacing.unwrap(), Rect::new(10.0, 120.0, 110.0, 110.0));
        assert_eq!(s.part_count(), 2);
    }

    #[test]
    fn test_full_sheet_is_not_refined() {
        let s = sheet(vec![placement(0, 10.0, 10.0, 970.0, 970.0)]);
        assert!(!needs_refinement(&s, &PlanConfig::default()));
    }

    #[test]
    fn test_refinement_uses_rotation_when_needed() {
        // Below a full-width block only 180 units of height remain, so the
        // 150 x 300 piece has to lie down.
        let lying = Placement::new(PartId(1), "P1", 0, 15.0, 815.0, 300.0, 150.0, true)
            .with_spacing(Rect::new(10.0, 810.0, 310.0, 160.0));
        let mut s = sheet(vec![placement(0, 10.0, 10.0, 970.0, 790.0), lying]);
        s.validate().unwrap();

        let layout = refined_layout(&s, &PlanConfig::default()).unwrap();
        assert!(layout[1].rotated);
        assert_eq!((layout[1].width, layout[1].height), (300.0, 150.0));
        assert_eq!(layout[1].spacing, Some(Rect::new(10.0, 810.0, 310.0, 160.0)));

        assert!(refine_sheet(&mut s, &PlanConfig::default()));
        s.validate().unwrap();
    }
}
