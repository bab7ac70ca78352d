//! Plan engine: runs the full pipeline and owns the in-flight guard.

use crate::budget::Budget;
use crate::global::optimize_globally;
use crate::grouping::group_parts;
use crate::refine::refine_sheets;
use crate::search::search_group;
use cutplan_core::{
    CuttingPlan, Error, Part, PlanConfig, Planner, ProgressCallback, ProgressInfo, Result,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Cutting plan calculator.
///
/// At most one calculation runs per engine at a time; a second request while
/// one is in flight fails with [`Error::Busy`].
pub struct PlanEngine {
    config: PlanConfig,
    cancelled: Arc<AtomicBool>,
    busy: Arc<AtomicBool>,
}

/// Releases the engine's in-flight flag when dropped.
struct BusyGuard(Arc<AtomicBool>);

impl BusyGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::Busy)?;
        Ok(Self(flag.clone()))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl PlanEngine {
    /// Creates a new engine with the given configuration.
    pub fn new(config: PlanConfig) -> Self {
        Self {
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates an engine with default configuration.
    pub fn default_config() -> Self {
        Self::new(PlanConfig::default())
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Returns true while a calculation is running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Requests cancellation of the running calculation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Runs a calculation on the calling thread.
    pub fn calculate(&self, parts: &[Part], callback: Option<ProgressCallback>) -> Result<CuttingPlan> {
        let _guard = BusyGuard::acquire(&self.busy)?;
        self.cancelled.store(false, Ordering::Relaxed);
        let budget = Budget::new(self.config.time_limit_ms, self.cancelled.clone());
        run(parts, &self.config, &budget, callback.as_deref())
    }

    /// Runs a calculation on a background thread.
    pub fn spawn(&self, parts: Vec<Part>, callback: Option<ProgressCallback>) -> Result<CalculationHandle> {
        let guard = BusyGuard::acquire(&self.busy)?;
        self.cancelled.store(false, Ordering::Relaxed);
        let config = self.config.clone();
        let cancelled = self.cancelled.clone();
        let budget = Budget::new(config.time_limit_ms, cancelled.clone());

        let thread = thread::Builder::new()
            .name("cutplan-calculation".into())
            .spawn(move || {
                let _guard = guard;
                run(&parts, &config, &budget, callback.as_deref())
            })
            .map_err(|e| Error::Internal(format!("failed to spawn worker: {e}")))?;

        Ok(CalculationHandle { thread, cancelled })
    }
}

impl Default for PlanEngine {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Planner for PlanEngine {
    fn plan(&self, parts: &[Part]) -> Result<CuttingPlan> {
        self.calculate(parts, None)
    }

    fn plan_with_progress(&self, parts: &[Part], callback: ProgressCallback) -> Result<CuttingPlan> {
        self.calculate(parts, Some(callback))
    }

    fn cancel(&self) {
        PlanEngine::cancel(self);
    }
}

/// Handle to a calculation running on a background thread.
pub struct CalculationHandle {
    thread: JoinHandle<Result<CuttingPlan>>,
    cancelled: Arc<AtomicBool>,
}

impl CalculationHandle {
    /// Requests cancellation; the worker stops at its next check.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Waits for the calculation to finish.
    pub fn join(self) -> Result<CuttingPlan> {
        self.thread
            .join()
            .map_err(|_| Error::Internal("calculation thread panicked".into()))?
    }
}

type Report<'a> = Option<&'a (dyn Fn(ProgressInfo) + Send + Sync)>;

fn run(parts: &[Part], config: &PlanConfig, budget: &Budget, callback: Report<'_>) -> Result<CuttingPlan> {
    let report = |info: ProgressInfo| {
        if let Some(cb) = callback {
            cb(info.with_elapsed(budget.elapsed_ms()));
        }
    };

    match run_stages(parts, config, budget, &report) {
        Ok(plan) => Ok(plan),
        Err(e) => {
            log::warn!("calculation failed: {e}");
            report(
                ProgressInfo::new()
                    .with_message(format!("Failed: {e}"))
                    .with_percent(100.0)
                    .finished(),
            );
            Err(e)
        }
    }
}

fn run_stages(
    parts: &[Part],
    config: &PlanConfig,
    budget: &Budget,
    report: &dyn Fn(ProgressInfo),
) -> Result<CuttingPlan> {
    config.validate()?;

    let groups = group_parts(parts);
    let total_pieces: usize = groups.iter().map(|g| g.piece_count()).sum();
    report(
        ProgressInfo::new()
            .with_message("Starting calculation")
            .with_percent(0.0)
            .with_groups(0, groups.len()),
    );
    log::info!(
        "calculating plan for {} pieces in {} groups",
        total_pieces,
        groups.len()
    );

    let mut sheets = Vec::new();
    let mut done_pieces = 0usize;
    for (i, group) in groups.iter().enumerate() {
        budget.check()?;

        let mut group_sheets = search_group(group, config, budget)?;
        if config.refine {
            let refined = refine_sheets(&mut group_sheets, config);
            if refined > 0 {
                log::debug!("{}: refined {} sheets", group.key, refined);
            }
        }
        sheets.extend(group_sheets);

        done_pieces += group.piece_count();
        report(
            ProgressInfo::new()
                .with_message(format!("Packed {}", group.key))
                .with_percent(done_pieces as f64 / total_pieces as f64 * 100.0)
                .with_groups(i + 1, groups.len()),
        );
    }

    if config.global_optimization && !sheets.is_empty() {
        sheets = optimize_globally(sheets, config);
    }

    let plan = CuttingPlan::new(sheets, budget.elapsed_ms());
    for sheet in &plan.sheets {
        sheet.validate()?;
    }
    log::info!(
        "plan ready: {} sheets, {} parts, utilization {}",
        plan.sheet_count(),
        plan.total_parts,
        plan.utilization_percent()
    );
    Ok(plan)
}
