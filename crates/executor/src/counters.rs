use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use autoreact_core::{ChannelId, GroupDiagnostics};

/// Per-group runtime counters and permission-warning cooldowns.
///
/// Counters only ever increase and live as long as the process. Nothing
/// here is persisted.
#[derive(Debug, Default)]
pub struct GroupCounters {
    dropped: AtomicU64,
    failed: AtomicU64,
    last_warned: Mutex<HashMap<ChannelId, Instant>>,
}

impl GroupCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message dropped on queue overflow.
    pub fn record_drop(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an item that ended in a counted failure.
    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Check the permission-warning cooldown for `channel`.
    ///
    /// Returns `true` (and records now as the last warning) when no warning
    /// was issued for this channel within `cooldown`.
    pub fn try_begin_warning(&self, channel: ChannelId, cooldown: Duration) -> bool {
        let now = Instant::now();
        let mut last_warned = self.last_warned.lock();
        match last_warned.get(&channel) {
            Some(previous) if now.duration_since(*previous) <= cooldown => false,
            _ => {
                last_warned.insert(channel, now);
                true
            }
        }
    }

    /// Snapshot for the status surface.
    pub fn snapshot(&self, queue_length: usize) -> GroupDiagnostics {
        GroupDiagnostics {
            queue_length,
            dropped_count: self.dropped(),
            failure_count: self.failed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let counters = GroupCounters::new();
        counters.record_drop();
        counters.record_drop();
        counters.record_failure();
        let snap = counters.snapshot(7);
        assert_eq!(snap.queue_length, 7);
        assert_eq!(snap.dropped_count, 2);
        assert_eq!(snap.failure_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn warning_cooldown_per_channel() {
        let counters = GroupCounters::new();
        let cooldown = Duration::from_secs(60);
        let a = ChannelId::new(1);
        let b = ChannelId::new(2);

        assert!(counters.try_begin_warning(a, cooldown));
        assert!(!counters.try_begin_warning(a, cooldown));
        assert!(counters.try_begin_warning(b, cooldown), "channels cool down independently");

        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(!counters.try_begin_warning(a, cooldown), "exactly 60s is still cooling down");

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(counters.try_begin_warning(a, cooldown));
        assert!(!counters.try_begin_warning(a, cooldown));
    }
}
