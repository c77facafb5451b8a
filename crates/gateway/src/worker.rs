use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use autoreact_core::{GroupId, InboundMessage};
use autoreact_executor::processor::sleep_or_cancel;
use autoreact_executor::{GroupCounters, ReactionProcessor};

/// How the worker loop should react to a failed item.
#[derive(Debug)]
pub(crate) enum WorkerFault {
    /// Log, pause, keep draining.
    Recoverable(String),
    /// Shutdown was signaled; leave the loop.
    Fatal,
}

pub(crate) struct Worker {
    pub group: GroupId,
    pub receiver: Arc<tokio::sync::Mutex<mpsc::Receiver<InboundMessage>>>,
    pub counters: Arc<GroupCounters>,
    pub processor: Arc<ReactionProcessor>,
    pub cancel: CancellationToken,
    pub fault_pause: Duration,
}

impl Worker {
    /// Drain the group's queue serially until cancelled.
    pub(crate) async fn run(self) {
        let mut receiver = self.receiver.lock().await;
        info!(group_id = %self.group, "worker started");

        loop {
            let message = tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                next = receiver.recv() => match next {
                    Some(message) => message,
                    None => break,
                },
            };

            match self.process(&message).await {
                Ok(()) => {}
                Err(WorkerFault::Fatal) => break,
                Err(WorkerFault::Recoverable(reason)) => {
                    error!(
                        group_id = %self.group,
                        message_id = %message.id,
                        reason,
                        "worker fault, pausing"
                    );
                    if sleep_or_cancel(self.fault_pause, &self.cancel).await.is_err() {
                        break;
                    }
                }
            }
        }

        info!(group_id = %self.group, "worker stopped");
    }

    /// Run one item. Cancellation wins over any await the processor is
    /// parked on, including provider and store calls.
    async fn process(&self, message: &InboundMessage) -> Result<(), WorkerFault> {
        let guarded = AssertUnwindSafe(self.processor.process(
            message,
            &self.counters,
            &self.cancel,
        ))
        .catch_unwind();
        let result = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return Err(WorkerFault::Fatal),
            result = guarded => result,
        };

        match result {
            Ok(Ok(outcome)) => {
                debug!(group_id = %self.group, message_id = %message.id, ?outcome, "processed");
                Ok(())
            }
            Ok(Err(e)) if e.is_cancellation() => Err(WorkerFault::Fatal),
            Ok(Err(e)) => Err(WorkerFault::Recoverable(e.to_string())),
            Err(panic) => Err(WorkerFault::Recoverable(panic_message(panic.as_ref()))),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_owned()
    }
}
