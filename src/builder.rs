//! Wires piles, gophers, and incinerators into a running pipeline.

use crate::error::BuildError;
use crate::gopher::Gopher;
use crate::incinerator_group::IncineratorGroup;
use crate::pile_group::PileGroup;
use crate::spec::{GopherSpec, IncineratorSpec, PileSpec};

/// Builds and starts a complete pipeline: every pile, every gopher, and
/// every incinerator is spawned and wired together before this returns.
///
/// Every gopher's taker port is registered against every pile (via
/// `pile_group`), and every gopher's provider port is registered against
/// every incinerator (via `incinerator_group`) — no central dispatcher
/// mediates either rendezvous.
///
/// Returns the two group handles callers use to observe the run: feed
/// [`PileGroup::take_result_stream`] and
/// [`IncineratorGroup::burn_result_stream`], or poll their contribution
/// snapshots, to track progress to quiescence.
///
/// # Errors
///
/// Returns [`BuildError::InvalidCapacity`] if any incinerator spec has
/// `min_free` greater than its `burn_capacity`. Nothing is spawned if
/// construction fails.
pub fn build_pipeline(
    piles: Vec<PileSpec>,
    gophers: Vec<GopherSpec>,
    incinerators: Vec<IncineratorSpec>,
) -> Result<(PileGroup, IncineratorGroup), BuildError> {
    let incinerator_group = IncineratorGroup::new(incinerators)?;
    let pile_group = PileGroup::new(piles);

    for spec in gophers {
        let gopher = Gopher::spawn(spec.id, spec.taker_capacity, spec.transit_delay);
        pile_group.supply(gopher.taker());
        incinerator_group.consume(gopher.provider());
    }

    Ok((pile_group, incinerator_group))
}
