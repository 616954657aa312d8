//! Fans a single taker registration out to every pile in a group, and fans
//! every pile's take-result stream back in to one aggregate stream.

use crate::pile::Pile;
use crate::results::TakeResult;
use crate::spec::PileSpec;
use crate::taker::Taker;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Broadcast channel depth for the group's take-result stream. Generous
/// enough that a slow subscriber falls behind rather than blocking piles,
/// at the cost of occasionally lagging (`RecvError::Lagged`) rather than
/// losing throughput.
const RESULT_BACKLOG: usize = 4096;

/// A group of piles presented to callers as a single supply source.
///
/// Registering a taker against the group registers it against every member
/// pile independently; whichever pile is first to fill that taker's next
/// batch wins, which is how load balances across piles without a central
/// dispatcher.
pub struct PileGroup {
    piles: Vec<Arc<Pile>>,
    take_results: broadcast::Sender<TakeResult>,
    taken: Arc<RwLock<Vec<TakeResult>>>,
}

impl PileGroup {
    /// Builds a group from its member specs and starts the fan-in
    /// aggregator that records every published [`TakeResult`].
    pub(crate) fn new(specs: Vec<PileSpec>) -> Self {
        let piles: Vec<Arc<Pile>> = specs
            .into_iter()
            .map(|spec| Arc::new(Pile::new(spec.id, spec.items, spec.supply_timeout)))
            .collect();

        let (take_results, _) = broadcast::channel(RESULT_BACKLOG);
        let taken = Arc::new(RwLock::new(Vec::new()));

        let mut aggregate_rx = take_results.subscribe();
        let aggregate_taken = Arc::clone(&taken);
        tokio::spawn(async move {
            loop {
                match aggregate_rx.recv().await {
                    Ok(result) => aggregate_taken.write().await.push(result),
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => return,
                }
            }
        });

        Self {
            piles,
            take_results,
            taken,
        }
    }

    /// The number of member piles.
    pub fn len(&self) -> usize {
        self.piles.len()
    }

    /// Whether the group has no member piles.
    pub fn is_empty(&self) -> bool {
        self.piles.is_empty()
    }

    /// Registers `taker` against every member pile.
    pub(crate) fn supply(&self, taker: &Taker) {
        for pile in &self.piles {
            pile.spawn_supply(taker.clone(), self.take_results.clone());
        }
    }

    /// A live stream of every [`TakeResult`] published by any member pile.
    pub fn take_result_stream(&self) -> broadcast::Receiver<TakeResult> {
        self.take_results.subscribe()
    }

    /// All take results recorded so far, oldest first.
    pub async fn taken(&self) -> Vec<TakeResult> {
        self.taken.read().await.clone()
    }

    /// Total items supplied per pile id, computed from one snapshot.
    pub async fn pile_contribution(&self) -> HashMap<String, usize> {
        let taken = self.taken.read().await.clone();
        contribution_by(&taken, |r| &r.pile_id)
    }

    /// Total items supplied per taker id, computed from one snapshot.
    pub async fn taker_contribution(&self) -> HashMap<String, usize> {
        let taken = self.taken.read().await.clone();
        contribution_by(&taken, |r| &r.taker_id)
    }
}

fn contribution_by(
    taken: &[TakeResult],
    key: impl Fn(&TakeResult) -> &String,
) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for result in taken {
        *map.entry(key(result).clone()).or_insert(0) += result.item_ids.len();
    }
    map
}
