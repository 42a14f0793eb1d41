//! Process-wide catalog handle and lookup API.
//!
//! The service owns the active catalog. Readers take an `Arc` to the current
//! catalog for the duration of a lookup; reloads publish a new catalog with a
//! single pointer swap, so a lookup never sees a partially replaced index.

mod catalog_service;

pub use catalog_service::CatalogService;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::snapshot::SnapshotError;

/// Errors returned by the catalog service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No catalog has been loaded, or it was unloaded.
    #[error("Catalog is not loaded")]
    NotLoaded,

    /// Loading a snapshot failed. The previous catalog is still active.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Lookup of one printing by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetailsQuery {
    pub card_id: String,
}

/// Which end of a card's printing history to prefer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Printing {
    #[default]
    Recent,
    First,
}

/// Lookup of every printing sharing a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameQuery {
    pub name: String,
}
