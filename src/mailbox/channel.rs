//! Single-producer / single-consumer mailbox
//!
//! A thin wrapper over an unbounded `flume` channel. Neither half is
//! `Clone`, and `push` takes the entry by value, so an entry belongs to
//! exactly one side at any moment and one producer's pushes arrive in
//! push order.

use std::time::Duration;

use flume::RecvTimeoutError;

/// Create a connected sender/receiver pair
pub fn mailbox<T>() -> (MailboxSender<T>, MailboxReceiver<T>) {
    let (tx, rx) = flume::unbounded();
    (MailboxSender { tx }, MailboxReceiver { rx })
}

/// Producer half, owned by the simulation thread
///
/// Dropping it closes the mailbox; the consumer still drains what is left.
#[derive(Debug)]
pub struct MailboxSender<T> {
    tx: flume::Sender<T>,
}

impl<T> MailboxSender<T> {
    /// Append an entry to the tail; ownership moves to the consumer side
    pub fn push(&self, entry: T) {
        if self.tx.send(entry).is_err() {
            tracing::trace!("mailbox consumer gone, entry discarded");
        }
    }

    /// Append several entries back to back
    ///
    /// With a single producer nothing can land between them.
    pub fn push_all(&self, entries: impl IntoIterator<Item = T>) {
        for entry in entries {
            self.push(entry);
        }
    }
}

/// Consumer half, owned by the render or network thread
#[derive(Debug)]
pub struct MailboxReceiver<T> {
    rx: flume::Receiver<T>,
}

impl<T> MailboxReceiver<T> {
    /// Remove and return everything currently queued, in push order
    pub fn drain_all(&self) -> Vec<T> {
        self.rx.try_iter().collect()
    }

    /// Wait up to `timeout` for an entry, then drain
    ///
    /// Returns `None` once the sender is gone and nothing is left to drain.
    /// A timeout with nothing queued yields `Some` of an empty batch.
    pub fn recv_batch(&self, timeout: Duration) -> Option<Vec<T>> {
        match self.rx.recv_timeout(timeout) {
            Ok(first) => {
                let mut batch = vec![first];
                batch.extend(self.rx.try_iter());
                Some(batch)
            }
            Err(RecvTimeoutError::Timeout) => Some(Vec::new()),
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// True once the producer has been dropped
    pub fn is_closed(&self) -> bool {
        self.rx.is_disconnected()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
