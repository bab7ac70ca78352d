//! Cutting plan result representation.

use crate::sheet::{Sheet, SheetRecord};
use crate::Result;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of a cutting plan calculation.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CuttingPlan {
    /// Sheets of the plan, in order.
    pub sheets: Vec<Sheet>,

    /// Number of part instances placed across all sheets.
    pub total_parts: usize,

    /// Computation time in milliseconds.
    pub computation_time_ms: u64,
}

impl CuttingPlan {
    /// Creates a plan from sheets, renumbering them in order.
    pub fn new(mut sheets: Vec<Sheet>, computation_time_ms: u64) -> Self {
        for (i, sheet) in sheets.iter_mut().enumerate() {
            sheet.index = i;
        }
        let total_parts = sheets.iter().map(Sheet::part_count).sum();
        Self {
            sheets,
            total_parts,
            computation_time_ms,
        }
    }

    /// Number of sheets.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Returns true if the plan has no sheets.
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Used area over the total area of all sheets.
    pub fn utilization(&self) -> f64 {
        let sheet_area: f64 = self.sheets.iter().map(Sheet::area).sum();
        let used: f64 = self.sheets.iter().map(|s| s.efficiency().used_area).sum();
        crate::metrics::utilization(used, sheet_area)
    }

    /// Aggregated statistics of the plan.
    pub fn summary(&self) -> PlanSummary {
        let mut sheets_per_material: BTreeMap<String, usize> = BTreeMap::new();
        for sheet in &self.sheets {
            *sheets_per_material
                .entry(format!("{} {}mm", sheet.material, sheet.thickness))
                .or_default() += 1;
        }
        PlanSummary {
            sheet_count: self.sheets.len(),
            part_count: self.total_parts,
            utilization: self.utilization(),
            total_waste_area: self.sheets.iter().map(|s| s.efficiency().waste_area).sum(),
            refined_sheets: self.sheets.iter().filter(|s| s.refined).count(),
            sheets_per_material,
            computation_time_ms: self.computation_time_ms,
        }
    }

    /// Returns utilization as a percentage string.
    pub fn utilization_percent(&self) -> String {
        format!("{:.1}%", self.utilization() * 100.0)
    }

    /// Flat records of every sheet.
    pub fn to_records(&self) -> Vec<SheetRecord> {
        self.sheets.iter().map(Sheet::to_record).collect()
    }

    /// Rebuilds a plan from sheet records.
    pub fn from_records(records: &[SheetRecord]) -> Result<Self> {
        let sheets = records
            .iter()
            .enumerate()
            .map(|(i, r)| Sheet::from_record(i, r))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(sheets, 0))
    }
}

/// Summary statistics of a cutting plan.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanSummary {
    /// Number of sheets.
    pub sheet_count: usize,
    /// Number of placed parts.
    pub part_count: usize,
    /// Overall utilization (0.0 - 1.0).
    pub utilization: f64,
    /// Sum of waste area over all sheets.
    pub total_waste_area: f64,
    /// Sheets whose layout came from local refinement.
    pub refined_sheets: usize,
    /// Sheet count per material and thickness label.
    pub sheets_per_material: BTreeMap<String, usize>,
    /// Computation time in milliseconds.
    pub computation_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::{GroupKey, PartId};
    use crate::placement::Placement;
    use crate::sheet::SheetSize;
    use approx::assert_relative_eq;

    fn sheet(material: &str, parts: usize) -> Sheet {
        let placements = (0..parts)
            .map(|i| Placement::new(PartId(0), "A", i, i as f64 * 100.0, 0.0, 100.0, 100.0, false))
            .collect();
        Sheet::new(
            7,
            SheetSize::new(1000.0, 1000.0),
            &GroupKey::new(material, 18.0),
            placements,
        )
    }

    #[test]
    fn test_plan_renumbers_sheets() {
        let plan = CuttingPlan::new(vec![sheet("MDF", 2), sheet("MDF", 3)], 12);
        assert_eq!(plan.sheets[0].index, 0);
        assert_eq!(plan.sheets[1].index, 1);
        assert_eq!(plan.total_parts, 5);
    }

    #[test]
    fn test_summary() {
        let plan = CuttingPlan::new(
            vec![sheet("MDF", 2), sheet("MDF", 3), sheet("Birch", 1)],
            40,
        );
        let summary = plan.summary();
        assert_eq!(summary.sheet_count, 3);
        assert_eq!(summary.part_count, 6);
        assert_relative_eq!(summary.utilization, 60_000.0 / 3_000_000.0);
        assert_relative_eq!(summary.total_waste_area, 3_000_000.0 - 60_000.0);
        assert_eq!(summary.sheets_per_material["MDF 18mm"], 2);
        assert_eq!(summary.sheets_per_material["Birch 18mm"], 1);
        assert_eq!(plan.utilization_percent(), "2.0%");
    }

    #[test]
    fn test_records_round_trip() {
        let plan = CuttingPlan::new(vec![sheet("MDF", 2)], 0);
        let restored = CuttingPlan::from_records(&plan.to_records()).unwrap();
        assert_eq!(restored.sheets, plan.sheets);
    }

    #[test]
    fn test_empty_plan() {
        let plan = CuttingPlan::default();
        assert!(plan.is_empty());
        assert_eq!(plan.utilization(), 0.0);
    }
}
