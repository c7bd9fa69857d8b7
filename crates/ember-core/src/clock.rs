//! Time sources
//!
//! Protocol operations never read a clock themselves; callers pass `now`
//! (unix seconds) into every state-mutating entry point so replays and
//! tests are deterministic. `TimeSource` is for embedders that drive the
//! protocol and need a `now` to pass in.

use parking_lot::RwLock;

/// Supplier of the current unix time in seconds
pub trait TimeSource: Send + Sync {
    fn unix_now(&self) -> u64;
}

/// Wall-clock time source
#[derive(Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn unix_now(&self) -> u64 {
        chrono::Utc::now().timestamp().max(0) as u64
    }
}

/// Manually driven time source for tests and simulations
pub struct ManualTimeSource {
    now: RwLock<u64>,
}

impl ManualTimeSource {
    pub fn new(start: u64) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    pub fn set(&self, now: u64) {
        *self.now.write() = now;
    }

    pub fn advance(&self, seconds: u64) -> u64 {
        let mut now = self.now.write();
        *now += seconds;
        *now
    }
}

impl TimeSource for ManualTimeSource {
    fn unix_now(&self) -> u64 {
        *self.now.read()
    }
}
