//! Running latency statistics.
//!
//! [`RunningMean`] is the accumulator, owned by the store writer so every
//! settling event is folded in under the writer's serialization.
//! [`StatsCell`] publishes its result for lock-free readers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use hb_types::StatsSnapshot;

/// Online arithmetic mean of latencies.
#[derive(Clone, Debug, Default)]
pub struct RunningMean {
    count: u64,
    mean_nanos: f64,
}

impl RunningMean {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in one sample and return the new sample count.
    ///
    /// Uses `mean += (x - mean) / n`, which equals
    /// `(mean * (n - 1) + x) / n` without the growing intermediate product.
    pub fn push(&mut self, latency: Duration) -> u64 {
        self.count += 1;
        let sample = latency.as_nanos() as f64;
        self.mean_nanos += (sample - self.mean_nanos) / self.count as f64;
        self.count
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> Duration {
        Duration::from_nanos(self.mean_nanos.round() as u64)
    }
}

/// Published statistics, readable without locking.
///
/// Only the writer stores into the cell. Readers may observe the count and
/// the average from two different settling events; that relaxation is
/// accepted because the numbers are advisory.
#[derive(Debug, Default)]
pub struct StatsCell {
    count: AtomicU64,
    average_nanos: AtomicU64,
}

impl StatsCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the accumulator's current state.
    pub fn publish(&self, mean: &RunningMean) {
        let nanos = u64::try_from(mean.mean().as_nanos()).unwrap_or(u64::MAX);
        self.average_nanos.store(nanos, Ordering::Relaxed);
        self.count.store(mean.count(), Ordering::Release);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let count = self.count.load(Ordering::Acquire);
        let average = Duration::from_nanos(self.average_nanos.load(Ordering::Relaxed));
        StatsSnapshot::new(count, average)
    }

    /// Number of entries made visible so far.
    pub fn available(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }
}
