//! # Cutplan Packing
//!
//! Rectangle packing backends for the cutplan engine.
//!
//! Every backend implements [`PackingStrategy`] for a single bin;
//! [`pack_bins`] drives a backend across a pool of bins with best-bin-fit.
//!
//! | Backend | Structure | Heuristic |
//! |---------|-----------|-----------|
//! | `MaxRectsBestAreaFit` | maximal free rectangles | least leftover area |
//! | `SkylineMinWasteFit` | skyline | least trapped area |
//! | `MaxRectsBottomLeft` | maximal free rectangles | towards the origin |
//! | `SkylineBottomLeftWasteMap` | skyline + gap map | towards the origin |
//! | `GuillotineBestAreaFit` | guillotine cuts | least leftover area, shorter-axis split |
//!
//! ```rust
//! use cutplan_packing::{pack_bins, Backend, BinSpec, PackItem};
//!
//! let items = [
//!     PackItem { id: 0, width: 610.0, height: 410.0 },
//!     PackItem { id: 1, width: 610.0, height: 410.0 },
//! ];
//! let outcome = pack_bins(Backend::MaxRectsBestAreaFit, &[BinSpec::new(1980.0, 980.0, 1)], &items, true);
//! assert!(outcome.is_complete());
//! ```

pub mod bins;
pub mod guillotine;
pub mod maxrects;
pub mod skyline;
pub mod strategy;

pub use bins::{pack_bins, BinSpec, PackItem, PackOutcome, PackedBin};
pub use guillotine::GuillotinePacker;
pub use maxrects::{MaxRectsHeuristic, MaxRectsPacker};
pub use skyline::{SkylineHeuristic, SkylinePacker};
pub use strategy::{Backend, Candidate, PackedRect, PackingStrategy, Score};
