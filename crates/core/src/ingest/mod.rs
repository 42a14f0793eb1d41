//! Ingestion: upstream records to a persisted catalog.

mod job;

pub use job::{build_catalog, build_catalog_parallel, run_update, BuildReport, DEFAULT_SHARD_SIZE};

use thiserror::Error;

use crate::snapshot::SnapshotError;
use crate::upstream::FeedError;

/// Errors that abort an ingestion run.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Fetching records failed. Nothing was written.
    #[error("Upstream feed failed: {0}")]
    Feed(#[from] FeedError),

    /// The feed returned records but none of them converted.
    #[error("None of the {0} upstream records could be converted")]
    NoConvertibleRecords(usize),

    /// Persisting the catalog failed.
    #[error("Failed to save catalog: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Background build task panicked or was cancelled.
    #[error("Catalog build task failed: {0}")]
    Task(String),
}
