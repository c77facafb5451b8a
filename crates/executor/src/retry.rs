use std::time::Duration;

/// Strategy for computing the delay between reaction attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryStrategy {
    /// Stepped backoff: `initial + step * attempt`.
    Stepped {
        /// Delay before the first retry.
        initial: Duration,
        /// Amount added for every further retry.
        step: Duration,
    },
    /// Constant delay between every retry attempt.
    Constant {
        /// Fixed delay duration.
        delay: Duration,
    },
}

impl RetryStrategy {
    /// Compute the delay duration for the given zero-based `attempt` number.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use autoreact_executor::RetryStrategy;
    ///
    /// let strategy = RetryStrategy::default();
    /// assert_eq!(strategy.delay_for(0), Duration::from_secs(1));
    /// assert_eq!(strategy.delay_for(2), Duration::from_secs(5));
    /// ```
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self {
            Self::Stepped { initial, step } => initial.saturating_add(step.saturating_mul(attempt)),
            Self::Constant { delay } => *delay,
        }
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::Stepped {
            initial: Duration::from_secs(1),
            step: Duration::from_secs(2),
        }
    }
}
