use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Point-in-time view of a store's statistics.
///
/// `count` is the number of entries made visible so far and `average` the
/// mean digest latency over those entries. The two fields may come from
/// slightly different moments; the statistic is advisory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub count: u64,
    pub average: Duration,
}

impl StatsSnapshot {
    pub fn new(count: u64, average: Duration) -> Self {
        Self { count, average }
    }

    /// Average latency in whole microseconds, the unit used on the wire.
    pub fn average_micros(&self) -> u64 {
        u64::try_from(self.average.as_micros()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        let s = StatsSnapshot::default();
        assert_eq!(s.count, 0);
        assert_eq!(s.average, Duration::ZERO);
    }

    #[test]
    fn micros_truncate() {
        let s = StatsSnapshot::new(2, Duration::from_nanos(12_999));
        assert_eq!(s.average_micros(), 12);
    }
}
