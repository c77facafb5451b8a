use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use autoreact_core::{GroupId, InboundMessage};
use autoreact_executor::GroupCounters;

/// One group's admission queue, worker handle, and counters.
pub(crate) struct GroupLane {
    group: GroupId,
    sender: mpsc::Sender<InboundMessage>,
    receiver: Arc<tokio::sync::Mutex<mpsc::Receiver<InboundMessage>>>,
    counters: Arc<GroupCounters>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl GroupLane {
    pub(crate) fn new(group: GroupId, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity);
        Self {
            group,
            sender,
            receiver: Arc::new(tokio::sync::Mutex::new(receiver)),
            counters: Arc::new(GroupCounters::new()),
            worker: Mutex::new(None),
        }
    }

    pub(crate) fn group(&self) -> GroupId {
        self.group
    }

    pub(crate) fn counters(&self) -> &Arc<GroupCounters> {
        &self.counters
    }

    pub(crate) fn receiver(&self) -> Arc<tokio::sync::Mutex<mpsc::Receiver<InboundMessage>>> {
        Arc::clone(&self.receiver)
    }

    /// Messages waiting in the queue. Does not touch the queue itself.
    pub(crate) fn queue_length(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    /// Non-blocking enqueue. Hands the message back when the queue is full.
    pub(crate) fn try_enqueue(&self, message: InboundMessage) -> Result<(), InboundMessage> {
        self.sender.try_send(message).map_err(|e| match e {
            mpsc::error::TrySendError::Full(m) | mpsc::error::TrySendError::Closed(m) => m,
        })
    }

    /// Start the worker unless one is already running.
    ///
    /// A worker whose task has finished is replaced; the new worker resumes
    /// draining the same queue.
    pub(crate) fn ensure_worker(&self, spawn: impl FnOnce() -> JoinHandle<()>) {
        let mut worker = self.worker.lock();
        match worker.as_ref() {
            Some(handle) if !handle.is_finished() => return,
            Some(_) => warn!(group_id = %self.group, "worker stopped unexpectedly, restarting"),
            None => {}
        }
        *worker = Some(spawn());
    }

    #[cfg(test)]
    pub(crate) fn abort_worker(&self) {
        if let Some(handle) = self.worker.lock().as_ref() {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub(crate) fn worker_finished(&self) -> bool {
        self.worker
            .lock()
            .as_ref()
            .is_none_or(JoinHandle::is_finished)
    }
}
