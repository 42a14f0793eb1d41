//! Types for the in-memory card catalog.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::tree::PrefixTree;
use crate::card::Card;

/// Artwork attribution for one printing, keyed by normalized full name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    /// Art crop URL.
    pub uri: String,
    pub artist: String,
}

/// Default images for a card name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardImages {
    pub image_normal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_flip: Option<String>,
}

/// The synchronized lookup indices plus the flat name list.
///
/// Built once per ingestion run and treated as immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    /// Identifier to card. Source of truth for every other index.
    pub dict: HashMap<String, Card>,
    /// Normalized name to identifiers, in insertion order.
    pub name_to_id: HashMap<String, Vec<String>>,
    /// Normalized full name to artwork.
    pub imagedict: HashMap<String, ImageEntry>,
    /// Normalized name to default images. Primary faces only.
    pub cardimages: HashMap<String, CardImages>,
    /// Prefix tree of normalized names.
    pub cardtree: PrefixTree,
    /// Distinct display names in first-seen order.
    pub names: Vec<String>,
    /// Prefix tree of normalized full names.
    pub full_names: PrefixTree,
    /// Oracle identifier to printing identifiers, in insertion order.
    pub oracle_to_id: HashMap<String, Vec<String>>,
}

/// Entry counts for every index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub cards: usize,
    pub name_keys: usize,
    pub names: usize,
    pub image_entries: usize,
    pub card_images: usize,
    pub tree_buckets: usize,
    pub full_names: usize,
    pub full_name_buckets: usize,
    #[serde(default)]
    pub oracle_ids: usize,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.dict.is_empty()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            cards: self.dict.len(),
            name_keys: self.name_to_id.len(),
            names: self.names.len(),
            image_entries: self.imagedict.len(),
            card_images: self.cardimages.len(),
            tree_buckets: self.cardtree.first_letter_count(),
            full_names: self.full_names.len(),
            full_name_buckets: self.full_names.first_letter_count(),
            oracle_ids: self.oracle_to_id.len(),
        }
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.dict.get(id)
    }

    /// Identifiers for a normalized name.
    pub fn ids_for_key(&self, key: &str) -> &[String] {
        self.name_to_id.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Printings sharing an oracle identifier.
    pub fn ids_for_oracle(&self, oracle_id: &str) -> &[String] {
        self.oracle_to_id
            .get(oracle_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The first reasonable printing among `ids`, else the first known one.
    pub fn first_reasonable(&self, ids: &[String]) -> Option<&Card> {
        ids.iter()
            .filter_map(|id| self.dict.get(id))
            .find(|card| card.is_reasonable())
            .or_else(|| ids.first().and_then(|id| self.dict.get(id)))
    }
}
