use serde::{Deserialize, Serialize};

/// Read-only snapshot of a group's pipeline state, for status displays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDiagnostics {
    /// Number of messages currently waiting in the group's queue.
    pub queue_length: usize,
    /// Messages dropped because the queue was full.
    pub dropped_count: u64,
    /// Items that ended in a counted failure.
    pub failure_count: u64,
}
