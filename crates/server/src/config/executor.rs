use std::time::Duration;

use serde::Deserialize;

use autoreact_executor::{ExecutorConfig, RetryStrategy};

/// Queue, retry and worker tuning shared by every group.
#[derive(Debug, Deserialize)]
pub struct ExecutorSection {
    /// Capacity of each group's queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Delay before the first retry, in milliseconds.
    #[serde(default = "default_retry_initial_ms")]
    pub retry_initial_ms: u64,
    /// Amount added to the delay for every further retry, in milliseconds.
    #[serde(default = "default_retry_step_ms")]
    pub retry_step_ms: u64,
    /// Minimum seconds between two permission warnings for one channel.
    #[serde(default = "default_permission_warn_cooldown")]
    pub permission_warn_cooldown_seconds: u64,
    /// Pause after an unexpected worker fault, in milliseconds.
    #[serde(default = "default_fault_pause_ms")]
    pub fault_pause_ms: u64,
}

impl Default for ExecutorSection {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            retry_initial_ms: default_retry_initial_ms(),
            retry_step_ms: default_retry_step_ms(),
            permission_warn_cooldown_seconds: default_permission_warn_cooldown(),
            fault_pause_ms: default_fault_pause_ms(),
        }
    }
}

impl ExecutorSection {
    /// Build the runtime executor configuration from these values.
    pub fn to_executor_config(&self) -> ExecutorConfig {
        ExecutorConfig::default()
            .with_queue_capacity(self.queue_capacity)
            .with_retry_strategy(RetryStrategy::Stepped {
                initial: Duration::from_millis(self.retry_initial_ms),
                step: Duration::from_millis(self.retry_step_ms),
            })
            .with_permission_warn_cooldown(Duration::from_secs(
                self.permission_warn_cooldown_seconds,
            ))
            .with_fault_pause(Duration::from_millis(self.fault_pause_ms))
    }
}

fn default_queue_capacity() -> usize {
    1000
}

fn default_retry_initial_ms() -> u64 {
    1000
}

fn default_retry_step_ms() -> u64 {
    2000
}

fn default_permission_warn_cooldown() -> u64 {
    60
}

fn default_fault_pause_ms() -> u64 {
    1000
}
