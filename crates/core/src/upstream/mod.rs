//! Sources of raw card records.
//!
//! The ingestion job only sees the `UpstreamFeed` trait, so the bulk-data
//! client, a local file, and the test mock are interchangeable.

mod file;
mod scryfall;

pub use file::FileFeed;
pub use scryfall::{ScryfallBulkFeed, ScryfallConfig, DEFAULT_CARDS_TYPE};

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::card::RawCard;
use crate::config::{UpstreamConfig, UpstreamSource};

/// Errors that can occur while fetching raw records.
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The bulk-data index has no entry of the requested type.
    #[error("Bulk data entry not found: {0}")]
    MissingBulkEntry(String),

    /// Failed to parse response or file.
    #[error("Failed to parse records: {0}")]
    Parse(String),

    /// Local file could not be read.
    #[error("Failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Feed is not usable with the given configuration.
    #[error("Feed not configured: {0}")]
    NotConfigured(String),
}

/// Records returned by one fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedBatch {
    pub records: Vec<RawCard>,
    /// Array elements that did not have the shape of a printing record.
    pub malformed: usize,
}

impl FeedBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<RawCard>> for FeedBatch {
    fn from(records: Vec<RawCard>) -> Self {
        Self {
            records,
            malformed: 0,
        }
    }
}

/// A source of default-card printing records.
#[async_trait]
pub trait UpstreamFeed: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Every printing record the source currently offers. Individual
    /// malformed records are counted, not fatal.
    async fn fetch_default_cards(&self) -> Result<FeedBatch, FeedError>;
}

/// Build the feed selected by `config`.
pub fn feed_from_config(config: &UpstreamConfig) -> Result<Box<dyn UpstreamFeed>, FeedError> {
    match config.source {
        UpstreamSource::Scryfall => Ok(Box::new(ScryfallBulkFeed::new(ScryfallConfig::from(config))?)),
        UpstreamSource::File => {
            let path = config.file.clone().ok_or_else(|| {
                FeedError::NotConfigured("upstream.file is not set".to_string())
            })?;
            Ok(Box::new(FileFeed::new(path)))
        }
    }
}
