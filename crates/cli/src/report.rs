//! Output documents written by `cutplan run`.

use anyhow::Result;
use cutplan_core::export::{detail_rows, summary_rows, write_csv};
use cutplan_core::{CuttingPlan, DetailRow, PlanSummary, SheetRecord, SummaryRow};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// JSON document describing a finished plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub summary: PlanSummary,
    pub sheets: Vec<SheetRecord>,
    pub summary_rows: Vec<SummaryRow>,
    pub detail_rows: Vec<DetailRow>,
}

impl RunReport {
    pub fn new(plan: &CuttingPlan) -> Self {
        Self {
            summary: plan.summary(),
            sheets: plan.to_records(),
            summary_rows: summary_rows(&plan.sheets),
            detail_rows: detail_rows(&plan.sheets),
        }
    }

    /// Restores the plan from the embedded sheet records.
    pub fn to_plan(&self) -> Result<CuttingPlan> {
        let mut plan = CuttingPlan::from_records(&self.sheets)?;
        plan.computation_time_ms = self.summary.computation_time_ms;
        Ok(plan)
    }

    pub fn write_json(&self, out: &mut impl Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)?;
        Ok(())
    }
}

/// Writes the summary and detail tables of `plan` as CSV.
pub fn write_plan_csv(out: &mut impl Write, plan: &CuttingPlan) -> Result<()> {
    write_csv(out, &plan.sheets)?;
    Ok(())
}

/// Human readable overview printed after a run.
pub fn overview(plan: &CuttingPlan) -> String {
    let summary = plan.summary();
    let mut text = format!(
        "{} sheets, {} parts, utilization {} ({} ms)",
        summary.sheet_count,
        summary.part_count,
        plan.utilization_percent(),
        summary.computation_time_ms
    );
    for (label, count) in &summary.sheets_per_material {
        text.push_str(&format!("\n  {label}: {count} sheets"));
    }
    if summary.refined_sheets > 0 {
        text.push_str(&format!("\n  refined: {} sheets", summary.refined_sheets));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutplan_core::{GroupKey, PartId, Placement, Sheet, SheetSize};

    fn plan() -> CuttingPlan {
        let placements = vec![
            Placement::new(PartId(0), "A", 0, 15.0, 15.0, 600.0, 400.0, false),
            Placement::new(PartId(0), "A", 1, 625.0, 15.0, 600.0, 400.0, false),
        ];
        let sheet = Sheet::new(0, SheetSize::new(2000.0, 1000.0), &GroupKey::new("MDF", 18.0), placements)
            .with_labels("Skyline Bottom-Left", "Area (descending)");
        CuttingPlan::new(vec![sheet], 12)
    }

    #[test]
    fn test_report_restores_plan() {
        let plan = plan();
        let report = RunReport::new(&plan);
        assert_eq!(report.summary_rows.len(), 1);
        assert_eq!(report.detail_rows.len(), 2);

        let restored = report.to_plan().unwrap();
        assert_eq!(restored.sheets, plan.sheets);
        assert_eq!(restored.computation_time_ms, 12);
    }

    #[test]
    fn test_json_parses_back() {
        let report = RunReport::new(&plan());
        let mut buf = Vec::new();
        report.write_json(&mut buf).unwrap();
        let parsed: RunReport = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_overview_lists_materials() {
        let text = overview(&plan());
        assert!(text.starts_with("1 sheets, 2 parts"));
        assert!(text.contains("MDF 18mm: 1 sheets"));
    }
}
