//! One-shot cancellation for polling tasks.
//!
//! The manager keeps the [`CancelHandle`]; the task only observes a
//! [`CancelSignal`]. Dropping the handle counts as cancellation.

use tokio::sync::watch;

/// Owner half, held in the manager's enabled set
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Observer half, moved into the polling task
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}

impl CancelHandle {
    pub fn cancel(self) {
        self.tx.send_replace(true);
    }
}

impl CancelSignal {
    /// Non-blocking check
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolves once cancellation has been requested
    pub async fn cancelled(&mut self) {
        // Err means the handle was dropped, which is also a cancel.
        let _ = self.rx.wait_for(|cancelled| *cancelled).await;
    }
}
