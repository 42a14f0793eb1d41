//! Snapshot persistence: one JSON artifact per catalog index.
//!
//! A snapshot directory holds eight artifacts plus `manifest.json`. Each file
//! is written to a temporary name and renamed into place.

mod artifact;
mod manifest;
mod store;

pub use artifact::{Artifact, ArtifactData};
pub use manifest::{Manifest, MANIFEST_FILE};
pub use store::{load, load_artifact, load_verified, read_manifest, save};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while saving or loading a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// File system operation failed.
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An artifact file does not exist.
    #[error("Artifact {name} not found in {dir}")]
    MissingArtifact { name: String, dir: PathBuf },

    /// An artifact could not be parsed or serialized.
    #[error("Failed to parse {name}: {message}")]
    Parse { name: String, message: String },

    /// Loaded artifacts disagree with the manifest.
    #[error("Manifest mismatch: {0}")]
    ManifestMismatch(String),

    /// Background parsing task panicked or was cancelled.
    #[error("Snapshot task failed: {0}")]
    Task(String),
}

impl SnapshotError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(name: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            name: name.into(),
            message: err.to_string(),
        }
    }
}
