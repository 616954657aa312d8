//! The mobile carrier that shuttles a batch from a pile to an incinerator.

use crate::provider::{Provider, ProviderControl};
use crate::taker::{Taker, TakerControl};
use std::time::Duration;
use tracing::{instrument, trace, warn};

/// A single carrier: exposes a [`Taker`] port to piles and a [`Provider`]
/// port to incinerators, and ferries each taken batch between the two after
/// sleeping for `transit_delay`.
///
/// Only one batch is ever in flight on a given gopher at a time — the
/// original system's gopher loop is strictly sequential (take, sleep,
/// deliver, repeat), so no extra synchronization is needed between the
/// taker and provider halves beyond the channels themselves.
pub struct Gopher {
    id: String,
    taker: Taker,
    provider: Provider,
}

impl Gopher {
    /// Builds a gopher with the given taker capacity, and spawns its run
    /// loop.
    pub(crate) fn spawn(id: String, taker_capacity: usize, transit_delay: Duration) -> Self {
        let (taker, taker_control) = Taker::new(id.clone(), taker_capacity);
        let (provider, provider_control) = Provider::new(id.clone());

        tokio::spawn(run(id.clone(), transit_delay, taker_control, provider_control));

        Self { id, taker, provider }
    }

    /// The gopher's identifier, shared by its taker and provider ports.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The taker port piles deliver batches to.
    pub fn taker(&self) -> &Taker {
        &self.taker
    }

    /// The provider port incinerators receive batches from.
    pub fn provider(&self) -> &Provider {
        &self.provider
    }
}

/// The gopher's run loop: advertise readiness, wait for a batch, sleep out
/// the transit delay, then hand the batch to whichever incinerator answers.
///
/// Exits once either control channel closes — in practice when every pile
/// (or every incinerator) registered against this gopher has been dropped.
#[instrument(skip(transit_delay, taker_control, provider_control), fields(gopher = %id))]
async fn run(
    id: String,
    transit_delay: Duration,
    mut taker_control: TakerControl,
    mut provider_control: ProviderControl,
) {
    loop {
        if taker_control.ready_tx.send(()).await.is_err() {
            warn!(gopher = %id, "taker ready channel closed, stopping");
            return;
        }

        let batch = match taker_control.load_rx.recv().await {
            Some(batch) => batch,
            None => {
                warn!(gopher = %id, "taker load channel closed, stopping");
                return;
            }
        };
        trace!(gopher = %id, count = batch.len(), "picked up batch");

        tokio::time::sleep(transit_delay).await;

        let incinerator_id = match provider_control.ready_rx.recv().await {
            Some(incinerator_id) => incinerator_id,
            None => {
                warn!(gopher = %id, "provider ready channel closed, stopping");
                return;
            }
        };

        if provider_control.batch_tx.send(batch).await.is_err() {
            warn!(gopher = %id, "provider batch channel closed, stopping");
            return;
        }
        trace!(gopher = %id, incinerator = %incinerator_id, "delivered batch");
    }
}
