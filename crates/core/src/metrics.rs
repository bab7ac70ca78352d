//! Sheet efficiency metrics.

use crate::placement::Placement;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Area based efficiency figures of one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Efficiency {
    /// Sum of the placed part areas.
    pub used_area: f64,
    /// Sheet area not covered by any part.
    pub waste_area: f64,
    /// Waste as a fraction of the sheet area (0.0 - 1.0).
    pub waste_percent: f64,
    /// Used area as a fraction of the sheet area (0.0 - 1.0).
    pub coverage: f64,
    /// Parts per square metre.
    pub density: f64,
    /// Coverage in percent.
    pub efficiency: f64,
}

/// Computes the efficiency of a sheet from its placements.
///
/// A sheet with no area yields all-zero metrics.
pub fn calculate_efficiency(placements: &[Placement], sheet_width: f64, sheet_height: f64) -> Efficiency {
    let sheet_area = sheet_width * sheet_height;
    let used_area: f64 = placements.iter().map(Placement::area).sum();
    if sheet_area <= 0.0 {
        return Efficiency {
            used_area,
            ..Default::default()
        };
    }

    let waste_area = sheet_area - used_area;
    let coverage = used_area / sheet_area;
    Efficiency {
        used_area,
        waste_area,
        waste_percent: waste_area / sheet_area,
        coverage,
        density: placements.len() as f64 / (sheet_area / 1_000_000.0),
        efficiency: coverage * 100.0,
    }
}

/// Used area over sheet area, 0 for an empty sheet.
pub fn utilization(used_area: f64, sheet_area: f64) -> f64 {
    if sheet_area > 0.0 {
        used_area / sheet_area
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::PartId;
    use approx::assert_relative_eq;

    fn placement(w: f64, h: f64) -> Placement {
        Placement::new(PartId(0), "P", 0, 0.0, 0.0, w, h, false)
    }

    #[test]
    fn test_efficiency_of_quarter_sheet() {
        let placements = vec![placement(500.0, 500.0), placement(500.0, 500.0)];
        let eff = calculate_efficiency(&placements, 2000.0, 1000.0);
        assert_relative_eq!(eff.used_area, 500_000.0);
        assert_relative_eq!(eff.waste_area, 1_500_000.0);
        assert_relative_eq!(eff.waste_percent, 0.75);
        assert_relative_eq!(eff.coverage, 0.25);
        assert_relative_eq!(eff.density, 1.0);
        assert_relative_eq!(eff.efficiency, 25.0);
    }

    #[test]
    fn test_efficiency_is_idempotent() {
        let placements = vec![placement(600.0, 400.0); 4];
        let a = calculate_efficiency(&placements, 2000.0, 1000.0);
        let b = calculate_efficiency(&placements, 2000.0, 1000.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_area_sheet() {
        let eff = calculate_efficiency(&[], 0.0, 1000.0);
        assert_eq!(eff.waste_percent, 0.0);
        assert_eq!(utilization(10.0, 0.0), 0.0);
    }
}
