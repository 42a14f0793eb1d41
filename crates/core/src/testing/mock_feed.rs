//! Mock upstream feed for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::card::RawCard;
use crate::upstream::{FeedBatch, FeedError, UpstreamFeed};

/// Mock implementation of the UpstreamFeed trait.
///
/// Provides controllable behavior for testing:
/// - Return a configurable batch of records
/// - Count fetches for assertions
/// - Simulate failures
///
/// # Example
///
/// ```rust,ignore
/// use cardcatalog_core::testing::{MockUpstreamFeed, fixtures};
///
/// let feed = MockUpstreamFeed::with_records(vec![fixtures::inspiring_veteran()]);
/// let report = run_update(&feed, dir.path()).await?;
/// assert_eq!(feed.fetch_count().await, 1);
/// ```
#[derive(Debug)]
pub struct MockUpstreamFeed {
    /// Records returned by every fetch.
    records: Arc<RwLock<Vec<RawCard>>>,
    /// Number of fetches performed.
    fetches: Arc<RwLock<usize>>,
    /// If set, the next fetch will fail with this error.
    next_error: Arc<RwLock<Option<FeedError>>>,
}

impl Default for MockUpstreamFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl MockUpstreamFeed {
    /// Create a feed that returns no records.
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Create a feed that returns `records`.
    pub fn with_records(records: Vec<RawCard>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            fetches: Arc::new(RwLock::new(0)),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Replace the records returned by later fetches.
    pub async fn set_records(&self, records: Vec<RawCard>) {
        *self.records.write().await = records;
    }

    /// Get the number of fetches performed.
    pub async fn fetch_count(&self) -> usize {
        *self.fetches.read().await
    }

    /// Configure the next fetch to fail with the given error.
    pub async fn set_next_error(&self, error: FeedError) {
        *self.next_error.write().await = Some(error);
    }

    /// Clear any pending error.
    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }
}

#[async_trait]
impl UpstreamFeed for MockUpstreamFeed {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_default_cards(&self) -> Result<FeedBatch, FeedError> {
        *self.fetches.write().await += 1;

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(FeedBatch::from(self.records.read().await.clone()))
    }
}
