//! # Cutplan Core
//!
//! Core data model and abstractions for the cutplan sheet cutting engine.
//!
//! This crate provides the types that are shared between the packing
//! backends, the plan engine and the command line tool.
//!
//! ## Core Components
//!
//! - **Parts**: [`Part`], [`PartSpec`], [`PartList`], [`GroupKey`]
//! - **Layout**: [`Placement`], [`Sheet`], [`SheetSize`], [`CuttingPlan`]
//! - **Geometry**: [`Rect`] with overlap and containment checks
//! - **Metrics**: [`Efficiency`], [`calculate_efficiency`]
//! - **Planner trait**: [`Planner`] - Common interface for plan calculators
//! - **Export**: [`export::summary_rows`], [`export::detail_rows`], [`export::write_csv`]
//!
//! ## Configuration
//!
//! Use [`PlanConfig`] to configure a calculation:
//!
//! ```rust
//! use cutplan_core::{PlanConfig, SheetSize};
//!
//! let config = PlanConfig::new()
//!     .with_sheet_sizes(vec![SheetSize::new(2000.0, 1000.0)])
//!     .with_spacing(10.0)
//!     .with_edge_margin(10.0)
//!     .with_time_limit(30_000);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support (default)

pub mod error;
pub mod export;
pub mod geometry;
pub mod metrics;
pub mod part;
pub mod placement;
pub mod result;
pub mod sheet;
pub mod solver;

// Re-exports
pub use error::{Error, Result};
pub use export::{DetailRow, SummaryRow};
pub use geometry::Rect;
pub use metrics::{calculate_efficiency, Efficiency};
pub use part::{GroupKey, Part, PartId, PartList, PartSpec};
pub use placement::Placement;
pub use result::{CuttingPlan, PlanSummary};
pub use sheet::{PlacementRecord, Sheet, SheetRecord, SheetSize, DEFAULT_SHEET_SIZES};
pub use solver::{PlanConfig, Planner, ProgressCallback, ProgressInfo};
