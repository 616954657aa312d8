//! The work item that flows through the pipeline.

use std::time::Duration;

/// An indivisible unit of work ("book").
///
/// Immutable once constructed. [`Book::work`] models the cost of processing
/// this item — it sleeps for [`Book::burn_duration`] and never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    id: String,
    burn_duration: Duration,
}

impl Book {
    /// Creates a new book with the given id and processing cost.
    pub fn new(id: impl Into<String>, burn_duration: Duration) -> Self {
        Self {
            id: id.into(),
            burn_duration,
        }
    }

    /// The book's globally unique identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The duration `work` will sleep for.
    pub fn burn_duration(&self) -> Duration {
        self.burn_duration
    }

    /// Simulates processing this item. Never fails.
    pub async fn work(&self) {
        tokio::time::sleep(self.burn_duration).await;
    }
}
