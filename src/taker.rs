//! The consumer-side port a [`crate::gopher::Gopher`] exposes to piles.

use crate::book::Book;
use crate::port::SharedReceiver;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Channel capacity for a taker's ready-token and load channels.
///
/// Both are effectively rendezvous channels: the gopher owning this taker
/// only ever has one outstanding ready token or one batch in flight at a
/// time, so a depth-1 buffer is enough to avoid forcing the sender to block
/// on an already-registered receiver.
const PORT_DEPTH: usize = 1;

/// A consumer-side port: piles race to observe its ready token, then deliver
/// a batch on its load channel.
///
/// Cheaply cloneable; every pile registered against this taker holds its own
/// clone, all sharing the same underlying channels.
#[derive(Clone)]
pub struct Taker {
    id: String,
    capacity: usize,
    ready_rx: SharedReceiver<()>,
    load_tx: mpsc::Sender<Vec<Arc<Book>>>,
}

/// The half of a taker port retained by the owning gopher.
pub(crate) struct TakerControl {
    pub(crate) ready_tx: mpsc::Sender<()>,
    pub(crate) load_rx: mpsc::Receiver<Vec<Arc<Book>>>,
}

impl Taker {
    /// Builds a new taker port, returning the pile-facing handle and the
    /// gopher-facing control half.
    pub(crate) fn new(id: String, capacity: usize) -> (Self, TakerControl) {
        let (ready_tx, ready_rx) = mpsc::channel(PORT_DEPTH);
        let (load_tx, load_rx) = mpsc::channel(PORT_DEPTH);
        let taker = Self {
            id,
            capacity,
            ready_rx: SharedReceiver::new(ready_rx),
            load_tx,
        };
        (taker, TakerControl { ready_tx, load_rx })
    }

    /// The taker's identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The maximum batch size this taker will accept, `C`.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Waits for a ready token. Returns `None` once the gopher is gone.
    pub(crate) async fn recv_ready(&self) -> Option<()> {
        self.ready_rx.recv().await
    }

    /// Delivers a batch of `[1, capacity]` items. Returns `Err` if the
    /// gopher is gone.
    pub(crate) async fn send_batch(&self, batch: Vec<Arc<Book>>) -> Result<(), ()> {
        self.load_tx.send(batch).await.map_err(|_| ())
    }
}
