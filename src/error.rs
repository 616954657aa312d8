//! Error types for pipeline construction.

use thiserror::Error;

/// Errors that can occur while building pipeline actors.
///
/// Every runtime path (draining a pile, delivering a batch, burning an item)
/// is infallible — the only failure mode is a misconfigured incinerator,
/// surfaced here at construction time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// An incinerator was configured with `min_free` greater than its `burn_capacity`.
    #[error(
        "incinerator `{id}` has burn_capacity {capacity} < min_free {min_free}: \
         0 <= min_free <= burn_capacity must hold"
    )]
    InvalidCapacity {
        id: String,
        capacity: usize,
        min_free: usize,
    },
}
