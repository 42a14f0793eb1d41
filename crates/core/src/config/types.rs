use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of suggestions returned by autocomplete.
pub const DEFAULT_AUTOCOMPLETE_LIMIT: usize = 10;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

/// Where snapshots live and how they are served
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Snapshot directory, read by the service and written by the job
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Load snapshots without requiring a manifest
    #[serde(default)]
    pub fixture_mode: bool,
    #[serde(default = "default_autocomplete_limit")]
    pub autocomplete_limit: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            fixture_mode: false,
            autocomplete_limit: default_autocomplete_limit(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("private")
}

fn default_autocomplete_limit() -> usize {
    DEFAULT_AUTOCOMPLETE_LIMIT
}

/// Where raw card records come from
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamSource {
    #[default]
    Scryfall,
    File,
}

/// Upstream feed configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default)]
    pub source: UpstreamSource,
    /// Bulk-data index URL (source = "scryfall")
    #[serde(default = "default_bulk_data_url")]
    pub bulk_data_url: String,
    /// Local JSON array of records (required when source = "file")
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Request timeout in seconds (default: 300, the bulk file is large)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            source: UpstreamSource::default(),
            bulk_data_url: default_bulk_data_url(),
            file: None,
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_bulk_data_url() -> String {
    "https://api.scryfall.com/bulk-data".to_string()
}

fn default_timeout() -> u64 {
    300
}

fn default_user_agent() -> String {
    format!("CardCatalog/{}", env!("CARGO_PKG_VERSION"))
}
