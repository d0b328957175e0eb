//! Lightweight per-tick timing.
//!
//! The tick loop runs synchronously, so a slow write sink stretches every
//! tick. `TickTimer` keeps enough statistics to notice that.

use std::time::{Duration, Instant};

/// Accumulating wall-clock statistics for a fixed-cadence loop.
#[derive(Clone, Debug, Default)]
pub struct TickTimer {
    count: u64,
    total: Duration,
    max: Duration,
    last: Duration,
    overruns: u64,
}

/// Guard returned by [`TickTimer::start`]; hand it back to [`TickTimer::finish`].
#[derive(Debug)]
pub struct TickGuard {
    start: Instant,
}

impl TickTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) -> TickGuard {
        TickGuard {
            start: Instant::now(),
        }
    }

    /// Record one tick. Returns `true` if it took longer than `budget`.
    pub fn finish(&mut self, guard: TickGuard, budget: Duration) -> bool {
        self.record(guard.start.elapsed(), budget)
    }

    /// Record a measured tick duration.
    pub fn record(&mut self, elapsed: Duration, budget: Duration) -> bool {
        self.count += 1;
        self.total += elapsed;
        self.last = elapsed;
        if elapsed > self.max {
            self.max = elapsed;
        }
        let overrun = elapsed > budget;
        if overrun {
            self.overruns += 1;
        }
        overrun
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    pub fn last(&self) -> Duration {
        self.last
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Average tick duration, zero before the first tick.
    pub fn average(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            self.total.div_f64(self.count as f64)
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
