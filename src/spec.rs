//! Builder input configuration for piles, gophers, and incinerators.

use crate::book::Book;
use std::time::Duration;

/// Configuration for one [`crate::pile::Pile`].
#[derive(Debug, Clone)]
pub struct PileSpec {
    /// The pile's identifier.
    pub id: String,
    /// The pile's full initial inventory.
    pub items: Vec<Book>,
    /// How long the pile waits to fill a batch before shipping what it has.
    pub supply_timeout: Duration,
}

/// Configuration for one [`crate::gopher::Gopher`].
#[derive(Debug, Clone)]
pub struct GopherSpec {
    /// The gopher's identifier (shared by its taker and provider ports).
    pub id: String,
    /// Maximum batch size the gopher's taker will accept.
    pub taker_capacity: usize,
    /// How long the gopher sleeps between taking a batch and handing it off.
    pub transit_delay: Duration,
}

/// Configuration for one [`crate::incinerator::Incinerator`].
#[derive(Debug, Clone)]
pub struct IncineratorSpec {
    /// The incinerator's identifier.
    pub id: String,
    /// Maximum number of items burning concurrently (`K`).
    pub burn_capacity: usize,
    /// Low-watermark of free slots at which the incinerator re-advertises (`M`).
    ///
    /// Defaults to half of `burn_capacity` when built via [`IncineratorSpec::new`].
    pub min_free: usize,
}

impl IncineratorSpec {
    /// Creates a spec with `min_free` defaulted to half of `burn_capacity`,
    /// the balance the original system ran its demo topology with.
    pub fn new(id: impl Into<String>, burn_capacity: usize) -> Self {
        Self {
            id: id.into(),
            burn_capacity,
            min_free: burn_capacity / 2,
        }
    }
}
