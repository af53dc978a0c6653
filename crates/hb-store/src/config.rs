use std::time::Duration;

use hb_crypto::DigestAlgorithm;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Configuration for a [`HashStore`](crate::HashStore).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Number of hashing workers.
    pub pool_size: usize,
    /// Maximum number of jobs waiting for a worker before `put` is rejected.
    pub queue_capacity: usize,
    /// Capacity of the request channel into the store writer.
    pub writer_capacity: usize,
    /// Delay between a hash being committed and it becoming visible.
    pub settle_delay_ms: u64,
    /// Digest algorithm used by the workers.
    pub algorithm: DigestAlgorithm,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            pool_size: 10,
            queue_capacity: 40,
            writer_capacity: 10,
            settle_delay_ms: 5_000,
            algorithm: DigestAlgorithm::default(),
        }
    }
}

impl StoreConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Reject configurations that would deadlock or never make progress.
    pub fn validate(&self) -> StoreResult<()> {
        if self.pool_size == 0 {
            return Err(StoreError::InvalidConfig("pool_size must be at least 1".into()));
        }
        if self.queue_capacity == 0 {
            return Err(StoreError::InvalidConfig(
                "queue_capacity must be at least 1".into(),
            ));
        }
        if self.writer_capacity == 0 {
            return Err(StoreError::InvalidConfig(
                "writer_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = StoreConfig::default();
        assert_eq!(c.pool_size, 10);
        assert_eq!(c.queue_capacity, 40);
        assert_eq!(c.writer_capacity, 10);
        assert_eq!(c.settle_delay(), Duration::from_secs(5));
        assert_eq!(c.algorithm, DigestAlgorithm::Sha512);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_sizes_are_invalid() {
        let zero_pool = StoreConfig {
            pool_size: 0,
            ..Default::default()
        };
        assert!(matches!(zero_pool.validate(), Err(StoreError::InvalidConfig(_))));

        let zero_queue = StoreConfig {
            queue_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(zero_queue.validate(), Err(StoreError::InvalidConfig(_))));

        let zero_writer = StoreConfig {
            writer_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(zero_writer.validate(), Err(StoreError::InvalidConfig(_))));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let c: StoreConfig = serde_json::from_str(r#"{"pool_size": 3}"#).unwrap();
        assert_eq!(c.pool_size, 3);
        assert_eq!(c.queue_capacity, 40);
    }
}
