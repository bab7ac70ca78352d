//! # Cutplan Engine
//!
//! Computes cutting plans: rectangular parts are laid out on as few stock
//! sheets as possible, with a spacing margin between parts and a clear
//! border along every sheet edge.
//!
//! ## Pipeline
//!
//! 1. **Grouping**: parts are split by material and thickness; parts of
//!    different groups never share a sheet.
//! 2. **Search**: every group is packed with each of four piece orders and
//!    five packing backends; the attempt with the best utilization wins.
//! 3. **Refinement**: sheets wasting more than 15% are re-laid out with a
//!    grid scan when that makes the layout more compact.
//! 4. **Global pass**: every group's pieces are re-packed together with
//!    MaxRects best-area-fit.
//!
//! ## Quick Start
//!
//! ```rust
//! use cutplan_core::{PartList, PartSpec, PlanConfig, SheetSize};
//! use cutplan_engine::PlanEngine;
//!
//! let mut parts = PartList::new();
//! parts.add(PartSpec::new("P-001", 600.0, 400.0).with_material("MDF", 18.0).with_quantity(4)).unwrap();
//!
//! let config = PlanConfig::new().with_sheet_sizes(vec![SheetSize::new(2000.0, 1000.0)]);
//! let engine = PlanEngine::new(config);
//! let plan = engine.calculate(parts.as_slice(), None).unwrap();
//!
//! println!("{} sheets, utilization {}", plan.sheet_count(), plan.utilization_percent());
//! ```

pub mod budget;
pub mod engine;
pub mod global;
pub mod grouping;
pub mod piece;
pub mod refine;
pub mod search;
pub mod sorting;

pub use budget::Budget;
pub use engine::{CalculationHandle, PlanEngine};
pub use global::{optimize_globally, GLOBAL_LABEL};
pub use grouping::{bin_counts, group_parts, Group};
pub use piece::{expand_pieces, Piece};
pub use refine::{needs_refinement, refine_sheet, refine_sheets};
pub use search::{pack_with_growth, search_group, Attempt};
pub use sorting::SortOrder;

// Re-export core types
pub use cutplan_core::{
    CuttingPlan, Error, Part, PartId, PartList, PartSpec, PlanConfig, Planner, ProgressCallback,
    ProgressInfo, Result, Sheet, SheetSize,
};
pub use cutplan_packing::Backend;
