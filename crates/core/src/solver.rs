//! Planner trait, configuration and progress reporting.

use crate::part::Part;
use crate::result::CuttingPlan;
use crate::sheet::{SheetSize, DEFAULT_SHEET_SIZES};
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a cutting plan calculation.
///
/// ```rust
/// use cutplan_core::{PlanConfig, SheetSize};
///
/// let config = PlanConfig::new()
///     .with_sheet_sizes(vec![SheetSize::new(2440.0, 1220.0)])
///     .with_spacing(6.0)
///     .with_time_limit(60_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlanConfig {
    /// Candidate sheet sizes, in preference order.
    pub sheet_sizes: Vec<SheetSize>,

    /// Clearance kept free along every sheet edge.
    pub edge_margin: f64,

    /// Additive clearance between parts (half on each side of a part).
    pub spacing: f64,

    /// Sheets wasting more than this fraction are re-packed locally.
    pub refine_waste_threshold: f64,

    /// Grid step of the local refinement scan.
    pub refine_grid_step: f64,

    /// Maximum computation time in milliseconds (0 = unlimited).
    pub time_limit_ms: u64,

    /// Tolerance when deciding whether a packed piece was rotated.
    pub rotation_tolerance: f64,

    /// Extra bins per size are `ceil(unplaced / extra_bin_divisor)`.
    pub extra_bin_divisor: usize,

    /// Upper bound on extra-bin rounds per attempt.
    pub max_bin_rounds: usize,

    /// Utilizations closer than this are considered equal.
    pub tie_epsilon: f64,

    /// Re-pack every material group with a single backend after the search.
    pub global_optimization: bool,

    /// Enable local refinement of sparse sheets.
    pub refine: bool,

    /// Evaluate attempts of a group in parallel.
    pub parallel: bool,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            sheet_sizes: DEFAULT_SHEET_SIZES.to_vec(),
            edge_margin: 10.0,
            spacing: 10.0,
            refine_waste_threshold: 0.15,
            refine_grid_step: 10.0,
            time_limit_ms: 300_000,
            rotation_tolerance: 0.1,
            extra_bin_divisor: 5,
            max_bin_rounds: 16,
            tie_epsilon: 1e-9,
            global_optimization: true,
            refine: true,
            parallel: true,
        }
    }
}

impl PlanConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the candidate sheet sizes.
    pub fn with_sheet_sizes(mut self, sizes: Vec<SheetSize>) -> Self {
        self.sheet_sizes = sizes;
        self
    }

    /// Sets the edge margin.
    pub fn with_edge_margin(mut self, margin: f64) -> Self {
        self.edge_margin = margin;
        self
    }

    /// Sets the spacing between parts.
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Sets the time limit in milliseconds.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Sets the waste fraction above which sheets are refined.
    pub fn with_refine_threshold(mut self, threshold: f64) -> Self {
        self.refine_waste_threshold = threshold;
        self
    }

    /// Sets the refinement grid step.
    pub fn with_refine_grid_step(mut self, step: f64) -> Self {
        self.refine_grid_step = step;
        self
    }

    /// Enables or disables local refinement.
    pub fn with_refine(mut self, enabled: bool) -> Self {
        self.refine = enabled;
        self
    }

    /// Enables or disables the global re-optimization pass.
    pub fn with_global_optimization(mut self, enabled: bool) -> Self {
        self.global_optimization = enabled;
        self
    }

    /// Enables or disables parallel attempt evaluation.
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the upper bound on extra-bin rounds.
    pub fn with_max_bin_rounds(mut self, rounds: usize) -> Self {
        self.max_bin_rounds = rounds;
        self
    }

    /// Half of the spacing, applied on each side of a part.
    pub fn half_spacing(&self) -> f64 {
        self.spacing / 2.0
    }

    /// Checks the configuration for values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.sheet_sizes.is_empty() {
            return Err(Error::ConfigError(
                "at least one sheet size is required".into(),
            ));
        }
        for size in &self.sheet_sizes {
            size.validate()?;
        }
        if !(self.edge_margin.is_finite() && self.edge_margin >= 0.0) {
            return Err(Error::ConfigError(format!(
                "edge_margin must be non-negative, got {}",
                self.edge_margin
            )));
        }
        if !(self.spacing.is_finite() && self.spacing >= 0.0) {
            return Err(Error::ConfigError(format!(
                "spacing must be non-negative, got {}",
                self.spacing
            )));
        }
        if !(0.0..=1.0).contains(&self.refine_waste_threshold) {
            return Err(Error::ConfigError(format!(
                "refine_waste_threshold must be within [0, 1], got {}",
                self.refine_waste_threshold
            )));
        }
        if !(self.refine_grid_step.is_finite() && self.refine_grid_step > 0.0) {
            return Err(Error::ConfigError(format!(
                "refine_grid_step must be positive, got {}",
                self.refine_grid_step
            )));
        }
        if !(self.rotation_tolerance.is_finite() && self.rotation_tolerance >= 0.0) {
            return Err(Error::ConfigError(
                "rotation_tolerance must be non-negative".into(),
            ));
        }
        if self.extra_bin_divisor == 0 {
            return Err(Error::ConfigError(
                "extra_bin_divisor must be at least 1".into(),
            ));
        }
        if !(self.tie_epsilon.is_finite() && self.tie_epsilon >= 0.0) {
            return Err(Error::ConfigError("tie_epsilon must be non-negative".into()));
        }
        Ok(())
    }
}

/// Progress callback for long-running calculations.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) + Send + Sync>;

/// Progress information during a calculation.
#[derive(Debug, Clone, Default)]
pub struct ProgressInfo {
    /// Human readable status line.
    pub message: String,
    /// Completion in percent (0 to 100).
    pub percent: f64,
    /// Number of material groups finished.
    pub groups_done: usize,
    /// Total number of material groups.
    pub groups_total: usize,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: u64,
    /// Whether the calculation is still running.
    pub running: bool,
}

impl ProgressInfo {
    /// Creates a new progress info with default values.
    pub fn new() -> Self {
        Self {
            running: true,
            ..Default::default()
        }
    }

    /// Sets the status message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets the completion percentage, clamped to `[0, 100]`.
    pub fn with_percent(mut self, percent: f64) -> Self {
        self.percent = percent.clamp(0.0, 100.0);
        self
    }

    /// Sets the group counters.
    pub fn with_groups(mut self, done: usize, total: usize) -> Self {
        self.groups_done = done;
        self.groups_total = total;
        self
    }

    /// Sets the elapsed time.
    pub fn with_elapsed(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    /// Marks the calculation as finished.
    pub fn finished(mut self) -> Self {
        self.running = false;
        self
    }
}

/// Trait for cutting plan calculators.
pub trait Planner {
    /// Computes a plan for the given parts.
    fn plan(&self, parts: &[Part]) -> Result<CuttingPlan>;

    /// Computes a plan, reporting progress through `callback`.
    fn plan_with_progress(&self, parts: &[Part], callback: ProgressCallback)
        -> Result<CuttingPlan>;

    /// Requests cancellation of an ongoing calculation.
    fn cancel(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PlanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sheet_sizes.len(), 3);
        assert_eq!(config.edge_margin, 10.0);
        assert_eq!(config.spacing, 10.0);
        assert_eq!(config.half_spacing(), 5.0);
        assert_eq!(config.time_limit_ms, 300_000);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(matches!(
            PlanConfig::new().with_sheet_sizes(vec![]).validate(),
            Err(Error::ConfigError(_))
        ));
        assert!(PlanConfig::new().with_spacing(-1.0).validate().is_err());
        assert!(PlanConfig::new().with_edge_margin(f64::NAN).validate().is_err());
        assert!(PlanConfig::new().with_refine_threshold(1.5).validate().is_err());
        assert!(PlanConfig::new().with_refine_grid_step(0.0).validate().is_err());
        assert!(matches!(
            PlanConfig::new()
                .with_sheet_sizes(vec![SheetSize::new(0.0, 100.0)])
                .validate(),
            Err(Error::InvalidSheetSize(_))
        ));
    }

    #[test]
    fn test_progress_info_builder() {
        let info = ProgressInfo::new()
            .with_message("MDF 18mm")
            .with_percent(140.0)
            .with_groups(1, 2)
            .with_elapsed(25);
        assert!(info.running);
        assert_eq!(info.percent, 100.0);
        assert_eq!(info.groups_done, 1);
        assert!(!info.finished().running);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_partial_deserialize() {
        let config: PlanConfig =
            serde_json::from_str(r#"{"spacing": 4.0, "parallel": false}"#).unwrap();
        assert_eq!(config.spacing, 4.0);
        assert!(!config.parallel);
        assert_eq!(config.edge_margin, 10.0);
        assert_eq!(config.sheet_sizes, DEFAULT_SHEET_SIZES.to_vec());
    }
}
