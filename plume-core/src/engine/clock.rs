//! Time sources
//!
//! Race time is always `now − start`, so a clock only has to report a
//! monotonic millisecond reading and wait between frames.

use crate::race::states::epoch_millis;
use std::time::Duration;

pub trait Clock {
    /// Milliseconds since an arbitrary, fixed origin
    fn now_ms(&self) -> u64;

    /// Wait `ms` milliseconds
    fn sleep_ms(&mut self, ms: u64);
}

/// Wall clock, epoch milliseconds
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        epoch_millis()
    }

    fn sleep_ms(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

/// Manually advanced clock; sleeping advances it instantly
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedClock {
    now_ms: u64,
}

impl SimulatedClock {
    pub fn starting_at(now_ms: u64) -> Self {
        Self { now_ms }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now_ms = self.now_ms.saturating_add(ms);
    }
}

impl Clock for SimulatedClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn sleep_ms(&mut self, ms: u64) {
        self.advance(ms);
    }
}
