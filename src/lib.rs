//! Burnbooks — a concurrent work-item pipeline.
//!
//! Work items ("books") sit in piles, get carried by mobile gophers across a
//! simulated transit delay, and are burned by bounded-parallelism
//! incinerators. The hard engineering is in the rendezvous protocol that
//! matches a pile to a ready taker, bounds per-taker load, and enforces
//! per-sink in-flight capacity with a low-watermark before re-advertising —
//! all without a central dispatcher.
//!
//! # Topology
//!
//! Build a pipeline with [`build_pipeline`], then drive it to quiescence by
//! counting items on [`IncineratorGroup::burn_result_stream`].
//!
//! ```no_run
//! use burnbooks::{build_pipeline, Book, PileSpec, GopherSpec, IncineratorSpec};
//! use std::time::Duration;
//!
//! # async fn run() {
//! let piles = vec![PileSpec {
//!     id: "pile-0".into(),
//!     items: vec![Book::new("book-0", Duration::from_millis(10))],
//!     supply_timeout: Duration::from_millis(100),
//! }];
//! let gophers = vec![GopherSpec {
//!     id: "gopher-0".into(),
//!     taker_capacity: 4,
//!     transit_delay: Duration::from_millis(50),
//! }];
//! let incinerators = vec![IncineratorSpec {
//!     id: "incinerator-0".into(),
//!     burn_capacity: 8,
//!     min_free: 4,
//! }];
//!
//! let (_pile_group, incinerator_group) = build_pipeline(piles, gophers, incinerators).unwrap();
//! let mut results = incinerator_group.burn_result_stream();
//! let _ = results.recv().await;
//! # }
//! ```

pub mod book;
pub mod builder;
pub mod error;
mod gopher;
pub mod incinerator_group;
mod incinerator;
mod pile;
pub mod pile_group;
mod port;
mod provider;
pub mod results;
pub mod spec;
mod taker;

pub use book::Book;
pub use builder::build_pipeline;
pub use error::BuildError;
pub use incinerator_group::IncineratorGroup;
pub use pile_group::PileGroup;
pub use results::{BurnResult, TakeResult};
pub use spec::{GopherSpec, IncineratorSpec, PileSpec};
