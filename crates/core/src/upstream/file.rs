//! Records read from a local JSON file, as used in fixture mode.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use super::scryfall::parse_records;
use super::{FeedBatch, FeedError, UpstreamFeed};

pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl UpstreamFeed for FileFeed {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_default_cards(&self) -> Result<FeedBatch, FeedError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| FeedError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        let batch = tokio::task::spawn_blocking(move || parse_records(&bytes))
            .await
            .map_err(|e| FeedError::Parse(format!("Parse task failed: {}", e)))??;

        info!(
            path = %self.path.display(),
            records = batch.len(),
            malformed = batch.malformed,
            "Read records from file"
        );
        Ok(batch)
    }
}
