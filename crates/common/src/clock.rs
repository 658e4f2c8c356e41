//! Clock utilities for stamping live pointer samples.
//!
//! Pointer traces carry integer millisecond timestamps. Live sources that
//! do not receive timestamps from the OS stamp each sample with a
//! monotonic clock anchored at the moment capture started.

use std::time::Instant;

/// Monotonic millisecond clock relative to a fixed epoch.
#[derive(Debug, Clone)]
pub struct TraceClock {
    /// The instant capture started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl TraceClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Milliseconds elapsed since the epoch.
    pub fn elapsed_ms(&self) -> i64 {
        i64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(i64::MAX)
    }

    /// Wall-clock time at capture start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}
