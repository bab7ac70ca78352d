//! Tabular export of cutting plans.
//!
//! Produces one summary row per sheet and one detail row per placed part.
//! Sheet numbers in exported rows are 1-based.

use crate::sheet::Sheet;
use std::io::{self, Write};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Column headers of the summary table.
pub const SUMMARY_HEADERS: [&str; 8] = [
    "Sheet #",
    "Dimensions (mm)",
    "Material",
    "Thickness (mm)",
    "Utilization",
    "Waste %",
    "Part Count",
    "Algorithm",
];

/// Column headers of the detail table.
pub const DETAIL_HEADERS: [&str; 9] = [
    "Sheet #",
    "Part Ref",
    "Width (mm)",
    "Height (mm)",
    "Orientation",
    "X Position",
    "Y Position",
    "Material",
    "Thickness (mm)",
];

/// One line of the summary table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SummaryRow {
    pub sheet: usize,
    pub dimensions: String,
    pub material: String,
    pub thickness: f64,
    /// Utilization in percent.
    pub utilization: f64,
    /// Waste in percent.
    pub waste: f64,
    pub part_count: usize,
    pub algorithm: String,
}

/// One line of the detail table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetailRow {
    pub sheet: usize,
    pub reference: String,
    pub width: f64,
    pub height: f64,
    /// "Rotated" or "Normal".
    pub orientation: String,
    pub x: f64,
    pub y: f64,
    pub material: String,
    pub thickness: f64,
}

/// Builds the summary table.
pub fn summary_rows(sheets: &[Sheet]) -> Vec<SummaryRow> {
    sheets
        .iter()
        .enumerate()
        .map(|(i, sheet)| SummaryRow {
            sheet: i + 1,
            dimensions: format!("{} x {}", sheet.size.width, sheet.size.height),
            material: sheet.material.clone(),
            thickness: sheet.thickness,
            utilization: sheet.utilization() * 100.0,
            waste: sheet.efficiency().waste_percent * 100.0,
            part_count: sheet.part_count(),
            algorithm: sheet.algorithm.clone(),
        })
        .collect()
}

/// Builds the detail table.
pub fn detail_rows(sheets: &[Sheet]) -> Vec<DetailRow> {
    sheets
        .iter()
        .enumerate()
        .flat_map(|(i, sheet)| {
            sheet.placements().iter().map(move |p| DetailRow {
                sheet: i + 1,
                reference: p.reference.clone(),
                width: p.width,
                height: p.height,
                orientation: if p.rotated { "Rotated" } else { "Normal" }.to_string(),
                x: p.x,
                y: p.y,
                material: sheet.material.clone(),
                thickness: sheet.thickness,
            })
        })
        .collect()
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn write_header(out: &mut impl Write, headers: &[&str]) -> io::Result<()> {
    let line: Vec<String> = headers.iter().map(|h| csv_field(h)).collect();
    writeln!(out, "{}", line.join(","))
}

/// Writes the summary table as CSV.
pub fn write_summary_csv(out: &mut impl Write, sheets: &[Sheet]) -> io::Result<()> {
    write_header(out, &SUMMARY_HEADERS)?;
    for row in summary_rows(sheets) {
        writeln!(
            out,
            "{},{},{},{},{:.1}%,{:.1}%,{},{}",
            row.sheet,
            csv_field(&row.dimensions),
            csv_field(&row.material),
            row.thickness,
            row.utilization,
            row.waste,
            row.part_count,
            csv_field(&row.algorithm)
        )?;
    }
    Ok(())
}

/// Writes the detail table as CSV.
pub fn write_detail_csv(out: &mut impl Write, sheets: &[Sheet]) -> io::Result<()> {
    write_header(out, &DETAIL_HEADERS)?;
    for row in detail_rows(sheets) {
        writeln!(
            out,
            "{},{},{:.1},{:.1},{},{:.1},{:.1},{},{}",
            row.sheet,
            csv_field(&row.reference),
            row.width,
            row.height,
            row.orientation,
            row.x,
            row.y,
            csv_field(&row.material),
            row.thickness
        )?;
    }
    Ok(())
}

/// Writes both tables, summary first, separated by a blank line.
pub fn write_csv(out: &mut impl Write, sheets: &[Sheet]) -> io::Result<()> {
    write_summary_csv(out, sheets)?;
    writeln!(out)?;
    write_detail_csv(out, sheets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::{GroupKey, PartId};
    use crate::placement::Placement;
    use crate::sheet::SheetSize;

    fn sample() -> Vec<Sheet> {
        let key = GroupKey::new("MDF, white", 18.0);
        let placements = vec![
            Placement::new(PartId(0), "A", 0, 15.0, 15.0, 600.0, 400.0, false),
            Placement::new(PartId(1), "B", 0, 625.0, 15.0, 400.0, 600.0, true),
        ];
        vec![Sheet::new(0, SheetSize::new(2000.0, 1000.0), &key, placements)
            .with_labels("MaxRects Best-Area-Fit", "Area (descending)")]
    }

    #[test]
    fn test_summary_rows() {
        let rows = summary_rows(&sample());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sheet, 1);
        assert_eq!(rows[0].dimensions, "2000 x 1000");
        assert_eq!(rows[0].part_count, 2);
        assert!((rows[0].utilization - 24.0).abs() < 1e-9);
        assert!((rows[0].waste - 76.0).abs() < 1e-9);
    }

    #[test]
    fn test_detail_rows_orientation() {
        let rows = detail_rows(&sample());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].orientation, "Normal");
        assert_eq!(rows[1].orientation, "Rotated");
        assert_eq!(rows[1].reference, "B");
        assert_eq!(rows[1].x, 625.0);
    }

    #[test]
    fn test_write_csv_quotes_fields() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &sample()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Sheet #,Dimensions (mm),Material,Thickness (mm),Utilization,Waste %,Part Count,Algorithm"
        );
        assert!(text.contains("\"MDF, white\""));
        assert!(text.contains("24.0%"));
        assert!(text.contains("\n\nSheet #,Part Ref,"));
    }

    #[test]
    fn test_export_does_not_touch_sheets() {
        let sheets = sample();
        let before = sheets.clone();
        let _ = summary_rows(&sheets);
        let _ = detail_rows(&sheets);
        assert_eq!(sheets, before);
    }
}
