use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::Stream;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::debug;

use harbor_core::DownloadCommand;

/// Single-slot command channel with drop-oldest overflow.
///
/// [`send`](Self::send) never blocks: it replaces whatever command is still
/// waiting in the slot. Each command is handed to at most one receiver.
///
/// The slot is a standard (non-async) mutex; it is never held across an
/// `.await`.
#[derive(Debug, Default)]
pub struct CommandChannel {
    slot: Mutex<Option<DownloadCommand>>,
    notify: Notify,
    closed: AtomicBool,
}

impl CommandChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `command`, returning the unconsumed command it replaced.
    pub fn send(&self, command: DownloadCommand) -> Option<DownloadCommand> {
        let dropped = self.slot.lock().replace(command);
        if let Some(dropped) = &dropped {
            debug!(
                message_id = ?dropped.message_id(),
                "dropping unconsumed download command"
            );
        }
        self.notify.notify_one();
        dropped
    }

    /// Take the pending command without waiting.
    pub fn try_recv(&self) -> Option<DownloadCommand> {
        self.slot.lock().take()
    }

    /// Wait for the next command.
    ///
    /// Returns `None` once the channel is closed and the slot is empty.
    pub async fn recv(&self) -> Option<DownloadCommand> {
        loop {
            // Register before checking so a concurrent `close` cannot be missed.
            let notified = self.notify.notified();

            let pending = self.slot.lock().take();
            if pending.is_some() {
                return pending;
            }
            if self.closed.load(Ordering::Acquire) {
                return None;
            }

            notified.await;
        }
    }

    /// Close the channel. A command still in the slot remains receivable.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Consume commands as a stream that ends when the channel closes.
    pub fn stream(channel: Arc<Self>) -> impl Stream<Item = DownloadCommand> + Send + 'static {
        async_stream::stream! {
            while let Some(command) = channel.recv().await {
                yield command;
            }
        }
    }
}
