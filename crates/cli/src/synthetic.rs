//! Synthetic job generator for load tests and demos.

use crate::job::Job;
use cutplan_core::{PartSpec, PlanConfig, SheetSize, DEFAULT_SHEET_SIZES};
use rand::prelude::*;

/// Materials offered by the generator, as (name, thickness) pairs.
pub const MATERIALS: [(&str, f64); 4] = [
    ("MDF", 18.0),
    ("MDF", 12.0),
    ("Birch plywood", 15.0),
    ("HDF", 3.0),
];

/// Generator for synthetic cutting jobs.
#[derive(Debug, Clone)]
pub struct SyntheticGenerator {
    rng: StdRng,
}

impl SyntheticGenerator {
    /// Creates a new generator with a random seed.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new generator with a specific seed for reproducibility.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates `count` part lines spread over `materials` groups.
    ///
    /// Every part fits the smallest default sheet with the default margin
    /// and spacing, so a generated job is always packable.
    pub fn mixed(&mut self, count: usize, materials: usize) -> Job {
        let materials = materials.clamp(1, MATERIALS.len());
        let limit = largest_part(&DEFAULT_SHEET_SIZES[0], &PlanConfig::default());

        let parts = (0..count)
            .map(|i| {
                let (material, thickness) = MATERIALS[self.rng.gen_range(0..materials)];
                let (width, height) = self.dimensions(limit);
                PartSpec::new(format!("P-{:03}", i + 1), width, height)
                    .with_name(format!("Panel {}", i + 1))
                    .with_material(material, thickness)
                    .with_quantity(self.rng.gen_range(1..=4))
            })
            .collect();

        Job {
            sheet_sizes: Vec::new(),
            config: PlanConfig::default(),
            parts,
        }
    }

    /// Generates `count` identical square parts, the classic grid layout case.
    pub fn uniform(&mut self, count: usize, side: f64) -> Job {
        Job {
            sheet_sizes: vec![[1000.0, 1000.0]],
            config: PlanConfig::default(),
            parts: vec![PartSpec::new("SQ", side, side).with_quantity(count)],
        }
    }

    /// Whole-millimetre dimensions, biased towards small and medium panels.
    fn dimensions(&mut self, (max_w, max_h): (f64, f64)) -> (f64, f64) {
        let scale = match self.rng.gen_range(0..10) {
            0..=5 => 0.3,
            6..=8 => 0.6,
            _ => 1.0,
        };
        let width = self.rng.gen_range(50.0..=(max_w * scale).max(51.0)).round();
        let height = self.rng.gen_range(50.0..=(max_h * scale).max(51.0)).round();
        (width, height)
    }
}

impl Default for SyntheticGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest part that still fits `size` once margin and spacing are applied.
fn largest_part(size: &SheetSize, config: &PlanConfig) -> (f64, f64) {
    let (w, h) = size.effective(config.edge_margin);
    (w - config.spacing, h - config.spacing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_reproducible() {
        let a = SyntheticGenerator::with_seed(42).mixed(20, 3);
        let b = SyntheticGenerator::with_seed(42).mixed(20, 3);
        assert_eq!(a, b);
    }

    #[test]
    fn test_parts_fit_smallest_sheet() {
        let job = SyntheticGenerator::with_seed(7).mixed(200, 4);
        let (max_w, max_h) = largest_part(&DEFAULT_SHEET_SIZES[0], &PlanConfig::default());
        for spec in &job.parts {
            spec.validate().unwrap();
            assert!(spec.width >= 50.0 && spec.width <= max_w);
            assert!(spec.height >= 50.0 && spec.height <= max_h);
            assert!((1..=4).contains(&spec.quantity));
        }
    }

    #[test]
    fn test_material_count_is_respected() {
        let job = SyntheticGenerator::with_seed(3).mixed(100, 2);
        for p in &job.parts {
            assert!(MATERIALS[..2]
                .iter()
                .any(|&(m, t)| m == p.material && t == p.thickness));
        }
    }

    #[test]
    fn test_uniform_job() {
        let job = SyntheticGenerator::with_seed(1).uniform(50, 100.0);
        assert_eq!(job.parts.len(), 1);
        assert_eq!(job.parts[0].quantity, 50);
        assert_eq!(job.plan_config().sheet_sizes, vec![SheetSize::new(1000.0, 1000.0)]);
    }
}
