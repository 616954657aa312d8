//! Shared channel-end primitives used by the rendezvous ports.
//!
//! The original system leans on a language with true multi-waiter `select`:
//! many goroutines can each `select { case <-ch: ... }` on the very same
//! channel, and exactly one of them wins each send. Tokio's `mpsc::Receiver`
//! has a single owner, so the same "many competitors, one winner per value"
//! shape is built here with a mutex-guarded receiver shared behind an `Arc`:
//! whichever task next acquires the lock receives the next value. Tokio's
//! mutex grants the lock FIFO, which is at least as fair as the random
//! selection the original relied on.

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// A receiver end shared by many competing consumers.
///
/// Cloning shares the same underlying channel; only one clone's `recv` call
/// observes any given value.
pub(crate) struct SharedReceiver<T>(Arc<Mutex<mpsc::Receiver<T>>>);

impl<T> Clone for SharedReceiver<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> SharedReceiver<T> {
    pub(crate) fn new(rx: mpsc::Receiver<T>) -> Self {
        Self(Arc::new(Mutex::new(rx)))
    }

    /// Waits for and returns the next value, or `None` once the channel is
    /// closed and drained. Cancel-safe: a cancelled call before the
    /// underlying `recv` observes a value leaves that value for the next
    /// competitor.
    pub(crate) async fn recv(&self) -> Option<T> {
        self.0.lock().await.recv().await
    }
}
