//! A source of work items that supplies takers on demand.

use crate::book::Book;
use crate::port::SharedReceiver;
use crate::results::TakeResult;
use crate::taker::Taker;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{instrument, trace, warn};

/// A pile of books, pre-loaded at construction, drained by every taker
/// registered against it via [`Pile::spawn_supply`].
///
/// The item inventory is exposed only through a [`SharedReceiver`]: every
/// concurrently-running supply loop (one per registered taker) races to
/// drain it, so a given item is delivered to exactly one taker.
pub struct Pile {
    id: String,
    items: SharedReceiver<Arc<Book>>,
    supply_timeout: Duration,
}

impl Pile {
    /// Builds a pile from its full initial inventory.
    pub(crate) fn new(id: String, items: Vec<Book>, supply_timeout: Duration) -> Self {
        let (tx, rx) = mpsc::channel(items.len().max(1));
        for book in items {
            tx.try_send(Arc::new(book))
                .expect("channel sized to item count");
        }
        drop(tx);

        Self {
            id,
            items: SharedReceiver::new(rx),
            supply_timeout,
        }
    }

    /// The pile's identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Spawns a supply loop that feeds `taker` from this pile for as long as
    /// this pile has items to give and `taker` keeps advertising readiness.
    /// Publishes one [`TakeResult`] per non-empty batch delivered.
    pub(crate) fn spawn_supply(
        self: &Arc<Self>,
        taker: Taker,
        take_results: broadcast::Sender<TakeResult>,
    ) {
        let pile = Arc::clone(self);
        tokio::spawn(async move { pile.supply_loop(taker, take_results).await });
    }

    /// The per-(pile, taker) rendezvous state machine: wait for a ready
    /// token, fill a batch up to capacity or until the supply timeout
    /// elapses, deliver it (even if empty, to complete the rendezvous),
    /// publish a result for a non-empty batch, and repeat. The loop only
    /// exits once this pile's item channel is actually closed and drained —
    /// a batch that merely fell short of capacity because the supply
    /// timeout fired while other takers were winning the race for this
    /// pile's items does not mean the pile is out of items.
    #[instrument(skip_all, fields(pile = %self.id, taker = %taker.id()))]
    async fn supply_loop(&self, taker: Taker, take_results: broadcast::Sender<TakeResult>) {
        loop {
            if taker.recv_ready().await.is_none() {
                return;
            }

            let capacity = taker.capacity();
            let mut loaded: Vec<Arc<Book>> = Vec::new();
            let mut exhausted = false;
            let timer = tokio::time::sleep(self.supply_timeout);
            tokio::pin!(timer);

            while loaded.len() < capacity {
                tokio::select! {
                    item = self.items.recv() => {
                        match item {
                            Some(book) => loaded.push(book),
                            None => {
                                exhausted = true;
                                break;
                            }
                        }
                    }
                    () = &mut timer => break,
                }
            }

            let item_ids: Vec<String> = loaded.iter().map(|b| b.id().to_string()).collect();
            let batch_was_empty = loaded.is_empty();

            if taker.send_batch(loaded).await.is_err() {
                return;
            }

            if batch_was_empty {
                trace!(pile = %self.id, taker = %taker.id(), "delivered empty batch");
            } else {
                trace!(pile = %self.id, taker = %taker.id(), count = item_ids.len(), "delivered batch");
                let _ = take_results.send(TakeResult {
                    pile_id: self.id.clone(),
                    taker_id: taker.id().to_string(),
                    item_ids,
                });
            }

            if exhausted {
                warn!(pile = %self.id, taker = %taker.id(), "item channel closed, pile exhausted");
                return;
            }
        }
    }
}
