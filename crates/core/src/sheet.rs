//! Sheets, sheet sizes and their flat records.

use crate::geometry::Rect;
use crate::metrics::{calculate_efficiency, Efficiency};
use crate::part::{GroupKey, PartId};
use crate::placement::Placement;
use crate::{Error, Result};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dimensions of a stock sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SheetSize {
    /// Sheet width.
    pub width: f64,
    /// Sheet height.
    pub height: f64,
}

/// Stock sizes offered when no sizes are configured.
pub const DEFAULT_SHEET_SIZES: [SheetSize; 3] = [
    SheetSize::new(2000.0, 1000.0),
    SheetSize::new(2500.0, 1250.0),
    SheetSize::new(3000.0, 1500.0),
];

impl SheetSize {
    /// Creates a sheet size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Full sheet area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Packable dimensions once `margin` is removed from every edge.
    pub fn effective(&self, margin: f64) -> (f64, f64) {
        (self.width - 2.0 * margin, self.height - 2.0 * margin)
    }

    /// Rejects non-finite or non-positive dimensions.
    pub fn validate(&self) -> Result<()> {
        if self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
        {
            Ok(())
        } else {
            Err(Error::InvalidSheetSize(format!(
                "{} x {} must be positive",
                self.width, self.height
            )))
        }
    }
}

impl fmt::Display for SheetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One stock sheet of a cutting plan with its placements and metrics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sheet {
    /// Position of the sheet within the plan (0-based).
    pub index: usize,
    /// Sheet dimensions.
    pub size: SheetSize,
    /// Material of every part on this sheet.
    pub material: String,
    /// Thickness of every part on this sheet.
    pub thickness: f64,
    placements: Vec<Placement>,
    /// Label of the packing backend that produced the layout.
    pub algorithm: String,
    /// Label of the sort order that produced the layout.
    pub sort_method: String,
    utilization: f64,
    efficiency: Efficiency,
    /// Whether local refinement replaced the layout.
    pub refined: bool,
}

impl Sheet {
    /// Creates a sheet and computes its metrics from `placements`.
    pub fn new(index: usize, size: SheetSize, key: &GroupKey, placements: Vec<Placement>) -> Self {
        let mut sheet = Self {
            index,
            size,
            material: key.material.clone(),
            thickness: key.thickness,
            placements,
            algorithm: String::new(),
            sort_method: String::new(),
            utilization: 0.0,
            efficiency: Efficiency::default(),
            refined: false,
        };
        sheet.recompute_metrics();
        sheet
    }

    /// Sets the algorithm and sort order labels.
    pub fn with_labels(mut self, algorithm: impl Into<String>, sort_method: impl Into<String>) -> Self {
        self.algorithm = algorithm.into();
        self.sort_method = sort_method.into();
        self
    }

    /// Placements on this sheet.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Used area over sheet area (0.0 - 1.0).
    pub fn utilization(&self) -> f64 {
        self.utilization
    }

    /// Efficiency metrics, always in sync with the placements.
    pub fn efficiency(&self) -> &Efficiency {
        &self.efficiency
    }

    /// Material/thickness key of this sheet.
    pub fn group_key(&self) -> GroupKey {
        GroupKey::new(self.material.clone(), self.thickness)
    }

    /// Full sheet area.
    pub fn area(&self) -> f64 {
        self.size.area()
    }

    /// Number of placed parts.
    pub fn part_count(&self) -> usize {
        self.placements.len()
    }

    /// Replaces every placement and recomputes the metrics.
    pub fn replace_placements(&mut self, placements: Vec<Placement>) {
        self.placements = placements;
        self.recompute_metrics();
    }

    /// Recomputes utilization and efficiency from the placements.
    pub fn recompute_metrics(&mut self) {
        self.efficiency = calculate_efficiency(&self.placements, self.size.width, self.size.height);
        self.utilization = self.efficiency.coverage;
    }

    /// Bounding box of all reserved rectangles, `None` for an empty sheet.
    pub fn occupied_extent(&self) -> Option<Rect> {
        let footprints: Vec<Rect> = self.placements.iter().map(Placement::footprint).collect();
        crate::geometry::bounding_box(&footprints)
    }

    /// Checks that reserved rectangles stay on the sheet and never overlap.
    pub fn validate(&self) -> Result<()> {
        let footprints: Vec<Rect> = self.placements.iter().map(Placement::footprint).collect();
        for (p, r) in self.placements.iter().zip(&footprints) {
            if !p.is_consistent() {
                return Err(Error::InvalidLayout(format!(
                    "sheet {}: spacing box of {}#{} does not contain the part",
                    self.index, p.reference, p.instance
                )));
            }
            if !r.within(self.size.width, self.size.height) {
                return Err(Error::InvalidLayout(format!(
                    "sheet {}: {}#{} at ({}, {}) lies outside {}",
                    self.index, p.reference, p.instance, r.x, r.y, self.size
                )));
            }
        }
        if let Some(&(i, j)) = crate::geometry::find_overlaps(&footprints).first() {
            return Err(Error::InvalidLayout(format!(
                "sheet {}: {}#{} overlaps {}#{}",
                self.index,
                self.placements[i].reference,
                self.placements[i].instance,
                self.placements[j].reference,
                self.placements[j].instance
            )));
        }
        Ok(())
    }

    /// Flattens the sheet into a serializable record.
    pub fn to_record(&self) -> SheetRecord {
        SheetRecord {
            width: self.size.width,
            height: self.size.height,
            material: self.material.clone(),
            thickness: self.thickness,
            placements: self.placements.iter().map(PlacementRecord::from).collect(),
            algorithm: self.algorithm.clone(),
            sort_method: self.sort_method.clone(),
            utilization: self.utilization,
            efficiency: self.efficiency,
        }
    }

    /// Rebuilds a sheet from a record. Metrics are recomputed from the placements.
    pub fn from_record(index: usize, record: &SheetRecord) -> Result<Self> {
        let size = SheetSize::new(record.width, record.height);
        size.validate()?;
        let key = GroupKey::new(record.material.clone(), record.thickness);
        let placements = record.placements.iter().map(Placement::from).collect();
        let sheet = Sheet::new(index, size, &key, placements)
            .with_labels(record.algorithm.clone(), record.sort_method.clone());

        if (sheet.utilization - record.utilization).abs() > 1e-9 {
            log::warn!(
                "sheet {index}: stored utilization {} differs from placements ({}), recomputed",
                record.utilization,
                sheet.utilization
            );
        }
        if let Err(e) = sheet.validate() {
            log::warn!("sheet {index}: restored layout is invalid: {e}");
        }
        Ok(sheet)
    }
}

/// Flat, serializable form of a [`Sheet`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SheetRecord {
    /// Sheet width.
    pub width: f64,
    /// Sheet height.
    pub height: f64,
    /// Material name.
    pub material: String,
    /// Material thickness.
    pub thickness: f64,
    /// Placed parts.
    pub placements: Vec<PlacementRecord>,
    /// Packing backend label.
    pub algorithm: String,
    /// Sort order label.
    pub sort_method: String,
    /// Used area over sheet area.
    pub utilization: f64,
    /// Efficiency metrics.
    pub efficiency: Efficiency,
}

/// Flat, serializable form of a [`Placement`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementRecord {
    /// Part id.
    pub part_id: PartId,
    /// Part reference.
    #[cfg_attr(feature = "serde", serde(rename = "ref"))]
    pub reference: String,
    /// Instance number.
    #[cfg_attr(feature = "serde", serde(default))]
    pub instance: usize,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Rotated by 90 degrees.
    pub rotated: bool,
    /// Occupied width.
    pub width: f64,
    /// Occupied height.
    pub height: f64,
    /// Reserved spacing box.
    #[cfg_attr(feature = "serde", serde(default, rename = "spacing_box"))]
    pub spacing: Option<Rect>,
}

impl From<&Placement> for PlacementRecord {
    fn from(p: &Placement) -> Self {
        Self {
            part_id: p.part_id,
            reference: p.reference.clone(),
            instance: p.instance,
            x: p.x,
            y: p.y,
            rotated: p.rotated,
            width: p.width,
            height: p.height,
            spacing: p.spacing,
        }
    }
}

impl From<&PlacementRecord> for Placement {
    fn from(r: &PlacementRecord) -> Self {
        Self {
            part_id: r.part_id,
            reference: r.reference.clone(),
            instance: r.instance,
            x: r.x,
            y: r.y,
            rotated: r.rotated,
            width: r.width,
            height: r.height,
            spacing: r.spacing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn key() -> GroupKey {
        GroupKey::new("MDF", 18.0)
    }

    fn placed(x: f64, y: f64, w: f64, h: f64) -> Placement {
        Placement::new(PartId(0), "A", 0, x + 5.0, y + 5.0, w - 10.0, h - 10.0, false)
            .with_spacing(Rect::new(x, y, w, h))
    }

    #[test]
    fn test_sheet_metrics_follow_placements() {
        let mut sheet = Sheet::new(0, SheetSize::new(2000.0, 1000.0), &key(), vec![]);
        assert_eq!(sheet.utilization(), 0.0);

        sheet.replace_placements(vec![placed(10.0, 10.0, 1010.0, 510.0)]);
        assert_relative_eq!(sheet.efficiency().used_area, 500_000.0);
        assert_relative_eq!(sheet.utilization(), 0.25);
        assert_eq!(sheet.part_count(), 1);
    }

    #[test]
    fn test_validate_detects_overlap() {
        let sheet = Sheet::new(
            0,
            SheetSize::new(2000.0, 1000.0),
            &key(),
            vec![placed(10.0, 10.0, 100.0, 100.0), placed(50.0, 50.0, 100.0, 100.0)],
        );
        assert!(matches!(sheet.validate(), Err(Error::InvalidLayout(_))));
    }

    #[test]
    fn test_validate_detects_out_of_bounds() {
        let sheet = Sheet::new(
            2,
            SheetSize::new(1000.0, 1000.0),
            &key(),
            vec![placed(950.0, 10.0, 100.0, 100.0)],
        );
        assert!(sheet.validate().is_err());
    }

    #[test]
    fn test_touching_boxes_are_valid() {
        let sheet = Sheet::new(
            0,
            SheetSize::new(1000.0, 1000.0),
            &key(),
            vec![placed(10.0, 10.0, 100.0, 100.0), placed(110.0, 10.0, 100.0, 100.0)],
        );
        assert!(sheet.validate().is_ok());
        assert_eq!(sheet.occupied_extent(), Some(Rect::new(10.0, 10.0, 200.0, 100.0)));
    }

    #[test]
    fn test_record_round_trip() {
        let sheet = Sheet::new(
            0,
            SheetSize::new(2000.0, 1000.0),
            &key(),
            vec![placed(10.0, 10.0, 610.0, 410.0), placed(620.0, 10.0, 410.0, 610.0)],
        )
        .with_labels("MaxRects Best-Area-Fit", "Area (descending)");

        let record = sheet.to_record();
        let restored = Sheet::from_record(0, &record).unwrap();
        assert_eq!(restored.size, sheet.size);
        assert_eq!(restored.material, "MDF");
        assert_eq!(restored.thickness, 18.0);
        assert_eq!(restored.utilization(), sheet.utilization());
        assert_eq!(restored.placements(), sheet.placements());
        assert_eq!(restored.algorithm, sheet.algorithm);
    }

    #[test]
    fn test_record_with_stale_metrics_is_recomputed() {
        let sheet = Sheet::new(
            0,
            SheetSize::new(1000.0, 1000.0),
            &key(),
            vec![placed(10.0, 10.0, 110.0, 110.0)],
        );
        let mut record = sheet.to_record();
        record.utilization = 0.9;

        let restored = Sheet::from_record(3, &record).unwrap();
        assert_eq!(restored.index, 3);
        assert_relative_eq!(restored.utilization(), 0.01);
        assert_eq!(restored.efficiency(), sheet.efficiency());
    }

    #[test]
    fn test_from_record_rejects_bad_size() {
        let mut record = Sheet::new(0, SheetSize::new(100.0, 100.0), &key(), vec![]).to_record();
        record.width = -5.0;
        assert!(matches!(
            Sheet::from_record(0, &record),
            Err(Error::InvalidSheetSize(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_record_json() {
        let sheet = Sheet::new(0, SheetSize::new(2000.0, 1000.0), &key(), vec![placed(10.0, 10.0, 110.0, 110.0)]);
        let json = serde_json::to_string(&sheet.to_record()).unwrap();
        assert!(json.contains("\"ref\":\"A\""));
        assert!(json.contains("spacing_box"));
        let back: SheetRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sheet.to_record());
    }
}
