//! Process-wide assistant status with a single writer.

use aide_core::AssistantStatus;
use tokio::sync::watch;
use tracing::debug;

/// Write side of the status. Owned by the dispatcher; not cloneable.
#[derive(Debug)]
pub(crate) struct StatusCell {
    tx: watch::Sender<AssistantStatus>,
}

impl StatusCell {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(AssistantStatus::default());
        Self { tx }
    }

    pub(crate) fn set(&self, status: AssistantStatus) {
        let previous = self.tx.send_replace(status);
        if previous != status {
            debug!(from = %previous, to = %status, "Assistant status changed");
        }
    }

    /// Guard that puts a busy status back to `Available` when dropped.
    pub(crate) fn busy_guard(&self) -> BusyGuard<'_> {
        BusyGuard { cell: self }
    }

    pub(crate) fn reader(&self) -> StatusReader {
        StatusReader {
            rx: self.tx.subscribe(),
        }
    }
}

/// Held for the length of one dispatch. If the dispatch future is dropped
/// midway the assistant would otherwise stay `Thinking...` forever.
pub(crate) struct BusyGuard<'a> {
    cell: &'a StatusCell,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let current = *self.cell.tx.borrow();
        if matches!(
            current,
            AssistantStatus::Thinking | AssistantStatus::Searching | AssistantStatus::Answering
        ) {
            self.cell.set(AssistantStatus::Available);
        }
    }
}

/// Read-only view of the assistant status for polling UIs.
#[derive(Debug, Clone)]
pub struct StatusReader {
    rx: watch::Receiver<AssistantStatus>,
}

impl StatusReader {
    /// Current status.
    pub fn get(&self) -> AssistantStatus {
        *self.rx.borrow()
    }

    /// Wait until the status differs from the last one seen, then return it.
    ///
    /// Returns `None` once the dispatcher has been dropped.
    pub async fn changed(&mut self) -> Option<AssistantStatus> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}
