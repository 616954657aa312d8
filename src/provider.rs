//! The producer-side port a [`crate::gopher::Gopher`] exposes to incinerators.

use crate::book::Book;
use crate::port::SharedReceiver;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Channel depth for a provider's ready-announce and batch-delivery channels.
///
/// Mirrors the taker port's depth-1 rendezvous reasoning, applied on the
/// incinerator side of a gopher.
const PORT_DEPTH: usize = 1;

/// A producer-side port: incinerators announce readiness on it, then race
/// to receive the next delivered batch.
///
/// Cheaply cloneable; every incinerator registered against this provider
/// holds its own clone, all sharing the same underlying channels.
#[derive(Clone)]
pub struct Provider {
    id: String,
    ready_tx: mpsc::Sender<String>,
    batch_rx: SharedReceiver<Vec<Arc<Book>>>,
}

/// The half of a provider port retained by the owning gopher.
pub(crate) struct ProviderControl {
    pub(crate) ready_rx: mpsc::Receiver<String>,
    pub(crate) batch_tx: mpsc::Sender<Vec<Arc<Book>>>,
}

impl Provider {
    /// Builds a new provider port, returning the incinerator-facing handle
    /// and the gopher-facing control half.
    pub(crate) fn new(id: String) -> (Self, ProviderControl) {
        let (ready_tx, ready_rx) = mpsc::channel(PORT_DEPTH);
        let (batch_tx, batch_rx) = mpsc::channel(PORT_DEPTH);
        let provider = Self {
            id,
            ready_tx,
            batch_rx: SharedReceiver::new(batch_rx),
        };
        (provider, ProviderControl { ready_rx, batch_tx })
    }

    /// The provider's identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Announces that `incinerator_id` has at least one free slot. Returns
    /// `Err` if the gopher is gone.
    pub(crate) async fn announce_ready(&self, incinerator_id: String) -> Result<(), ()> {
        self.ready_tx.send(incinerator_id).await.map_err(|_| ())
    }

    /// Waits for a delivered batch. Returns `None` once the gopher is gone.
    pub(crate) async fn recv_batch(&self) -> Option<Vec<Arc<Book>>> {
        self.batch_rx.recv().await
    }
}
