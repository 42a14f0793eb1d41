//! Scryfall bulk-data client.
//!
//! Two requests per fetch: the bulk-data index, then the download URI of the
//! `default_cards` entry. The second response is one large JSON array and is
//! parsed off the async runtime.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{FeedBatch, FeedError, UpstreamFeed};
use crate::card::RawCard;
use crate::config::UpstreamConfig;

/// Bulk-data type holding one record per printing in its default language.
pub const DEFAULT_CARDS_TYPE: &str = "default_cards";

/// Scryfall client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScryfallConfig {
    pub bulk_data_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl From<&UpstreamConfig> for ScryfallConfig {
    fn from(config: &UpstreamConfig) -> Self {
        Self {
            bulk_data_url: config.bulk_data_url.clone(),
            user_agent: config.user_agent.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

impl Default for ScryfallConfig {
    fn default() -> Self {
        Self::from(&UpstreamConfig::default())
    }
}

/// Fetches the default-cards bulk file.
pub struct ScryfallBulkFeed {
    client: Client,
    bulk_data_url: String,
}

impl ScryfallBulkFeed {
    pub fn new(config: ScryfallConfig) -> Result<Self, FeedError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            bulk_data_url: config.bulk_data_url,
        })
    }

    async fn get(&self, url: &str) -> Result<Response, FeedError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(response)
    }

    /// Resolve the download URI of the default-cards file.
    pub async fn default_cards_uri(&self) -> Result<String, FeedError> {
        debug!(url = %self.bulk_data_url, "Fetching bulk-data index");
        let index: BulkDataIndex = self.get(&self.bulk_data_url).await?.json().await.map_err(|e| {
            FeedError::Parse(format!("Failed to parse bulk-data index: {}", e))
        })?;
        select_download_uri(&index, DEFAULT_CARDS_TYPE)
    }
}

#[async_trait]
impl UpstreamFeed for ScryfallBulkFeed {
    fn name(&self) -> &str {
        "scryfall"
    }

    async fn fetch_default_cards(&self) -> Result<FeedBatch, FeedError> {
        let uri = self.default_cards_uri().await?;
        info!(uri = %uri, "Downloading default cards");

        let bytes = self.get(&uri).await?.bytes().await?;
        let size = bytes.len();

        let batch = tokio::task::spawn_blocking(move || parse_records(&bytes))
            .await
            .map_err(|e| FeedError::Parse(format!("Parse task failed: {}", e)))??;

        info!(
            bytes = size,
            records = batch.len(),
            malformed = batch.malformed,
            "Downloaded default cards"
        );
        Ok(batch)
    }
}

/// Parse a JSON array of printing records.
///
/// Only a document that is not an array fails. Elements that do not fit the
/// record shape are logged and counted in `FeedBatch::malformed`.
pub(crate) fn parse_records(bytes: &[u8]) -> Result<FeedBatch, FeedError> {
    let values: Vec<serde_json::Value> =
        serde_json::from_slice(bytes).map_err(|e| FeedError::Parse(e.to_string()))?;

    let mut batch = FeedBatch {
        records: Vec::with_capacity(values.len()),
        malformed: 0,
    };
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<RawCard>(value) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed record");
                batch.malformed += 1;
            }
        }
    }
    Ok(batch)
}

#[derive(Debug, Deserialize)]
struct BulkDataIndex {
    #[serde(default)]
    data: Vec<BulkDataEntry>,
}

#[derive(Debug, Deserialize)]
struct BulkDataEntry {
    #[serde(rename = "type")]
    kind: String,
    download_uri: String,
}

fn select_download_uri(index: &BulkDataIndex, kind: &str) -> Result<String, FeedError> {
    index
        .data
        .iter()
        .find(|entry| entry.kind == kind)
        .map(|entry| entry.download_uri.clone())
        .ok_or_else(|| FeedError::MissingBulkEntry(kind.to_string()))
}
