//! Platform scheduling profiles.
//!
//! Constrained devices crash when two heavy rasterizations overlap, so the
//! scheduler's thresholds, concurrency and cleanup cadence are a value
//! object selected once at startup rather than platform branches sprinkled
//! through the queue.

use std::time::Duration;

/// Scheduling and memory policy for one platform class.
#[derive(Debug, Clone)]
pub struct PlatformProfile {
    /// Heavy operations allowed in flight at once.
    pub max_concurrent: usize,
    /// Admission budget: reserved estimates may not exceed this.
    pub memory_threshold_mb: f64,
    /// Wait after a routine cleanup before re-checking admission.
    pub settle_delay: Duration,
    /// Mandatory pause between operations (strict-sequential class only).
    pub inter_op_delay: Duration,
    /// Age past which routine cleanup deletes temp files.
    pub temp_max_age: Duration,
    /// Whether routine cache clears drop everything instead of expired
    /// entries only.
    pub aggressive_cleanup: bool,
}

impl PlatformProfile {
    /// Strict-sequential policy for memory-constrained devices: one
    /// operation at a time, cleanup and a settle pause around every run.
    pub fn constrained() -> Self {
        Self {
            max_concurrent: 1,
            memory_threshold_mb: 180.0,
            settle_delay: Duration::from_millis(500),
            inter_op_delay: Duration::from_millis(150),
            temp_max_age: Duration::from_secs(5 * 60),
            aggressive_cleanup: true,
        }
    }

    /// Bounded-concurrency policy for roomier devices: two operations in
    /// flight, lenient admission, no mandatory inter-operation delay.
    pub fn standard() -> Self {
        Self {
            max_concurrent: 2,
            memory_threshold_mb: 512.0,
            settle_delay: Duration::from_millis(250),
            inter_op_delay: Duration::ZERO,
            temp_max_age: Duration::from_secs(15 * 60),
            aggressive_cleanup: false,
        }
    }

    pub fn is_strict_sequential(&self) -> bool {
        self.max_concurrent == 1
    }
}
