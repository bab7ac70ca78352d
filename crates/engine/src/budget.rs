//! Wall-clock budget and cooperative cancellation.

use cutplan_core::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Time limit and cancel flag shared by every stage of one calculation.
#[derive(Debug, Clone)]
pub struct Budget {
    start: Instant,
    limit_ms: u64,
    cancelled: Arc<AtomicBool>,
}

impl Budget {
    /// Starts the clock. A limit of 0 means unlimited.
    pub fn new(limit_ms: u64, cancelled: Arc<AtomicBool>) -> Self {
        Self {
            start: Instant::now(),
            limit_ms,
            cancelled,
        }
    }

    /// A budget without a limit and with its own cancel flag.
    pub fn unlimited() -> Self {
        Self::new(0, Arc::new(AtomicBool::new(false)))
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Fails with `Cancelled` or `Timeout` once either applies.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let elapsed = self.elapsed_ms();
        if self.limit_ms > 0 && elapsed >= self.limit_ms {
            return Err(Error::Timeout(elapsed));
        }
        Ok(())
    }
}
