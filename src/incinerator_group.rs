//! Fans a single provider registration out to every incinerator in a group,
//! and fans every incinerator's burn-result stream back in to one stream.

use crate::error::BuildError;
use crate::incinerator::Incinerator;
use crate::provider::Provider;
use crate::results::BurnResult;
use crate::spec::IncineratorSpec;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Broadcast channel depth for the group's burn-result stream. Mirrors the
/// pile group's result-backlog sizing rationale.
const RESULT_BACKLOG: usize = 4096;

/// A group of incinerators presented to callers as a single sink.
///
/// Registering a provider against the group registers it against every
/// member incinerator independently; whichever incinerator is first to
/// advertise readiness wins the next batch, which is how load balances
/// across sinks without a central dispatcher.
pub struct IncineratorGroup {
    incinerators: Vec<Arc<Incinerator>>,
    burn_results: broadcast::Sender<BurnResult>,
    burned: Arc<RwLock<Vec<BurnResult>>>,
}

impl IncineratorGroup {
    /// Builds a group from its member specs and starts the fan-in
    /// aggregator that records every published [`BurnResult`].
    ///
    /// Fails if any member spec has `min_free > burn_capacity`.
    pub(crate) fn new(specs: Vec<IncineratorSpec>) -> Result<Self, BuildError> {
        let (burn_results, _) = broadcast::channel(RESULT_BACKLOG);

        let incinerators = specs
            .into_iter()
            .map(|spec| Incinerator::new(spec, burn_results.clone()).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;

        let burned = Arc::new(RwLock::new(Vec::new()));

        let mut aggregate_rx = burn_results.subscribe();
        let aggregate_burned = Arc::clone(&burned);
        tokio::spawn(async move {
            loop {
                match aggregate_rx.recv().await {
                    Ok(result) => aggregate_burned.write().await.push(result),
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => return,
                }
            }
        });

        Ok(Self {
            incinerators,
            burn_results,
            burned,
        })
    }

    /// The number of member incinerators.
    pub fn len(&self) -> usize {
        self.incinerators.len()
    }

    /// Whether the group has no member incinerators.
    pub fn is_empty(&self) -> bool {
        self.incinerators.is_empty()
    }

    /// Registers `provider` against every member incinerator.
    pub(crate) fn consume(&self, provider: &Provider) {
        for incinerator in &self.incinerators {
            incinerator.spawn_consume(provider.clone());
        }
    }

    /// A live stream of every [`BurnResult`] published by any member
    /// incinerator.
    pub fn burn_result_stream(&self) -> broadcast::Receiver<BurnResult> {
        self.burn_results.subscribe()
    }

    /// All burn results recorded so far, oldest first.
    pub async fn burned(&self) -> Vec<BurnResult> {
        self.burned.read().await.clone()
    }

    /// Burn count per item id. Every id in a well-formed run maps to 1.
    pub async fn burned_id_map(&self) -> HashMap<String, usize> {
        let burned = self.burned.read().await.clone();
        let mut map = HashMap::new();
        for result in &burned {
            *map.entry(result.item.id().to_string()).or_insert(0) += 1;
        }
        map
    }

    /// Burn count per incinerator id, computed from one snapshot.
    pub async fn incinerator_contribution(&self) -> HashMap<String, usize> {
        let burned = self.burned.read().await.clone();
        contribution_by(&burned, |r| &r.incinerator_id)
    }

    /// Burn count per provider id, computed from one snapshot.
    pub async fn provider_contribution(&self) -> HashMap<String, usize> {
        let burned = self.burned.read().await.clone();
        contribution_by(&burned, |r| &r.provider_id)
    }
}

fn contribution_by(
    burned: &[BurnResult],
    key: impl Fn(&BurnResult) -> &String,
) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for result in burned {
        *map.entry(key(result).clone()).or_insert(0) += 1;
    }
    map
}
