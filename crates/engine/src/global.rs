//! Global re-optimization per material group.
//!
//! After every group has been searched and refined, all pieces sharing a
//! material and thickness are pooled and re-packed in one go with
//! MaxRects best-area-fit. The pooled result replaces that group's sheets.

use crate::piece::Piece;
use crate::search::pack_with_growth;
use crate::sorting::SortOrder;
use cutplan_core::{GroupKey, PlanConfig, Sheet};
use cutplan_packing::Backend;

/// Algorithm label of sheets produced by the global pass.
pub const GLOBAL_LABEL: &str = "Global Optimization";

/// Re-packs each group's pieces together. Groups that cannot be re-packed
/// completely keep their sheets.
pub fn optimize_globally(sheets: Vec<Sheet>, config: &PlanConfig) -> Vec<Sheet> {
    let mut keys: Vec<GroupKey> = Vec::new();
    let mut buckets: Vec<Vec<Sheet>> = Vec::new();
    for sheet in sheets {
        let key = sheet.group_key();
        match keys.iter().position(|k| *k == key) {
            Some(i) => buckets[i].push(sheet),
            None => {
                keys.push(key);
                buckets.push(vec![sheet]);
            }
        }
    }

    let mut out = Vec::new();
    for (key, group_sheets) in keys.iter().zip(buckets) {
        let mut pieces: Vec<Piece> = group_sheets
            .iter()
            .flat_map(|s| s.placements().iter().map(Piece::from_placement))
            .collect();
        SortOrder::AreaDesc.sort(&mut pieces);

        match pack_with_growth(&pieces, Backend::MaxRectsBestAreaFit, config) {
            Ok(packed) => {
                log::info!(
                    "{key}: global pass {} -> {} sheets",
                    group_sheets.len(),
                    packed.len()
                );
                out.extend(packed.into_iter().map(|s| {
                    Sheet::new(0, s.size, key, s.placements)
                        .with_labels(GLOBAL_LABEL, SortOrder::AreaDesc.label())
                }));
            }
            Err(e) => {
                log::warn!("{key}: global pass failed ({e}), keeping per-group sheets");
                out.extend(group_sheets);
            }
        }
    }
    out
}
