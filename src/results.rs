//! Published result records: one per completed load, one per burned item.

use crate::book::Book;
use std::fmt;
use std::sync::Arc;

/// Published once per successful batch load from a pile to a taker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakeResult {
    pub pile_id: String,
    pub taker_id: String,
    pub item_ids: Vec<String>,
}

impl fmt::Display for TakeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "taker {} took {} books from pile {}",
            self.taker_id,
            self.item_ids.len(),
            self.pile_id
        )
    }
}

/// Published once per item that finishes burning.
#[derive(Debug, Clone)]
pub struct BurnResult {
    pub item: Arc<Book>,
    pub incinerator_id: String,
    pub provider_id: String,
}

impl fmt::Display for BurnResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "burned {} with incinerator {}, provided by {}",
            self.item.id(),
            self.incinerator_id,
            self.provider_id
        )
    }
}
