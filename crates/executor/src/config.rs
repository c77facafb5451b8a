use std::time::Duration;

use crate::retry::RetryStrategy;

/// Runtime tuning shared by every group's queue and worker.
///
/// Per-group behavior (retry budget, pacing) comes from the group's
/// settings; this only holds process-wide knobs.
///
/// # Examples
///
/// ```
/// use autoreact_executor::ExecutorConfig;
///
/// let config = ExecutorConfig::default();
/// assert_eq!(config.queue_capacity, 1000);
/// ```
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Capacity of each group's admission queue.
    pub queue_capacity: usize,
    /// Strategy used to compute the delay between retries.
    pub retry_strategy: RetryStrategy,
    /// Minimum time between two permission warnings for the same channel.
    pub permission_warn_cooldown: Duration,
    /// How long a worker pauses after an unexpected fault.
    pub fault_pause: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1000,
            retry_strategy: RetryStrategy::default(),
            permission_warn_cooldown: Duration::from_secs(60),
            fault_pause: Duration::from_secs(1),
        }
    }
}

impl ExecutorConfig {
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry_strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_permission_warn_cooldown(mut self, cooldown: Duration) -> Self {
        self.permission_warn_cooldown = cooldown;
        self
    }

    #[must_use]
    pub fn with_fault_pause(mut self, pause: Duration) -> Self {
        self.fault_pause = pause;
        self
    }
}
