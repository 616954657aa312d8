//! A bounded-parallelism sink that burns the items a provider delivers.

use crate::book::Book;
use crate::error::BuildError;
use crate::provider::Provider;
use crate::results::BurnResult;
use crate::spec::IncineratorSpec;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Notify, Semaphore};
use tokio::task::JoinSet;
use tracing::{instrument, trace, warn};

/// A sink that burns up to `burn_capacity` items concurrently, and
/// re-advertises readiness once fewer than `min_free` items of the current
/// batch remain in flight.
pub struct Incinerator {
    id: String,
    burn_capacity: usize,
    min_free: usize,
    burn_results: broadcast::Sender<BurnResult>,
}

impl Incinerator {
    /// Builds an incinerator, rejecting a spec where `min_free` exceeds
    /// `burn_capacity`.
    pub(crate) fn new(
        spec: IncineratorSpec,
        burn_results: broadcast::Sender<BurnResult>,
    ) -> Result<Self, BuildError> {
        if spec.min_free > spec.burn_capacity {
            return Err(BuildError::InvalidCapacity {
                id: spec.id,
                capacity: spec.burn_capacity,
                min_free: spec.min_free,
            });
        }

        Ok(Self {
            id: spec.id,
            burn_capacity: spec.burn_capacity,
            min_free: spec.min_free,
            burn_results,
        })
    }

    /// The incinerator's identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Maximum number of items this incinerator burns concurrently.
    pub fn burn_capacity(&self) -> usize {
        self.burn_capacity
    }

    /// Spawns a consume loop that registers readiness with `provider` and
    /// burns every batch it delivers.
    pub(crate) fn spawn_consume(self: &Arc<Self>, provider: Provider) {
        let incinerator = Arc::clone(self);
        tokio::spawn(async move { incinerator.consume_loop(provider).await });
    }

    /// Registers readiness, waits for a batch, burns it at up to
    /// `burn_capacity` concurrency, waits for the low-watermark to fire,
    /// then repeats.
    #[instrument(skip(self, provider), fields(incinerator = %self.id))]
    async fn consume_loop(&self, provider: Provider) {
        let permits = Arc::new(Semaphore::new(self.burn_capacity));

        loop {
            if provider.announce_ready(self.id.clone()).await.is_err() {
                return;
            }

            let batch = match provider.recv_batch().await {
                Some(batch) => batch,
                None => return,
            };

            if batch.is_empty() {
                continue;
            }

            trace!(incinerator = %self.id, count = batch.len(), "received batch");
            self.burn_batch(batch, &provider, &permits).await;
        }
    }

    /// Burns every item in `batch` concurrently (bounded by `permits`), and
    /// waits until fewer than `min_free` items remain unburned — or the
    /// whole batch has burned, whichever comes first regardless of
    /// `min_free` — before returning.
    ///
    /// Per-item tasks are tracked in a [`JoinSet`] rather than fire-and-forget
    /// `tokio::spawn`. Since this function must be able to return as soon as
    /// the watermark fires — by design, before every item has necessarily
    /// finished burning — the `JoinSet` is handed off to a detached reaper
    /// task instead of being dropped locally, since dropping a `JoinSet`
    /// aborts whatever it still holds.
    #[instrument(skip(self, batch, provider, permits), fields(incinerator = %self.id, total = batch.len()))]
    async fn burn_batch(
        &self,
        batch: Vec<Arc<Book>>,
        provider: &Provider,
        permits: &Arc<Semaphore>,
    ) {
        let total = batch.len();
        let remaining = Arc::new(AtomicUsize::new(total));
        let enough_processed = Arc::new(AtomicBool::new(false));
        let notify = Arc::new(Notify::new());
        let min_free = self.min_free;
        let mut tasks: JoinSet<()> = JoinSet::new();

        for item in batch {
            let permits = Arc::clone(permits);
            let remaining = Arc::clone(&remaining);
            let enough_processed = Arc::clone(&enough_processed);
            let notify = Arc::clone(&notify);
            let burn_results = self.burn_results.clone();
            let incinerator_id = self.id.clone();
            let provider_id = provider.id().to_string();

            tasks.spawn(async move {
                let permit = permits
                    .acquire_owned()
                    .await
                    .expect("incinerator semaphore is never closed");
                item.work().await;
                drop(permit);

                let left = remaining.fetch_sub(1, Ordering::AcqRel) - 1;
                // `left == 0` is a safety net: the literal "fewer than
                // min_free remain" condition can never trip when
                // `min_free` is 0, so a full batch must always fire on
                // its own regardless of the watermark.
                if (left < min_free || left == 0)
                    && enough_processed
                        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                {
                    notify.notify_one();
                }

                let _ = burn_results.send(BurnResult {
                    item,
                    incinerator_id,
                    provider_id,
                });
            });
        }

        notify.notified().await;
        trace!(incinerator = %self.id, total, min_free, "enough processed, re-advertising");

        let incinerator_id = self.id.clone();
        tokio::spawn(async move {
            while let Some(result) = tasks.join_next().await {
                if let Err(err) = result {
                    warn!(incinerator = %incinerator_id, error = %err, "burn task panicked");
                }
            }
        });
    }
}
