//! Job files and synthetic workloads for the `cutplan` binary.
//!
//! A job file bundles the stock sheet sizes, the engine configuration and
//! the part list of one calculation:
//!
//! ```json
//! {
//!   "sheet_sizes": [[2000, 1000], [2500, 1250]],
//!   "config": { "spacing": 10.0, "time_limit_ms": 60000 },
//!   "parts": [
//!     { "ref": "P-001", "material": "MDF", "thickness": 18, "width": 600, "height": 400, "quantity": 4 }
//!   ]
//! }
//! ```

pub mod job;
pub mod report;
pub mod synthetic;

pub use job::Job;
pub use report::RunReport;
pub use synthetic::SyntheticGenerator;
