//! Upstream printing records as delivered by the bulk-data provider.
//!
//! Only the fields the converter reads are modeled. Everything is optional:
//! the provider omits fields freely depending on layout and card age.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One printing from the bulk-data feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCard {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub oracle_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub set: Option<String>,
    #[serde(default)]
    pub collector_number: Option<String>,
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub scryfall_uri: Option<String>,
    #[serde(default)]
    pub border_color: Option<String>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub cmc: Option<f64>,
    #[serde(default)]
    pub colors: Option<Vec<String>>,
    #[serde(default)]
    pub color_identity: Option<Vec<String>>,
    /// Format key (lowercase) to status such as `legal` or `banned`.
    #[serde(default)]
    pub legalities: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
    #[serde(default)]
    pub loyalty: Option<String>,
    #[serde(default)]
    pub promo: Option<bool>,
    #[serde(default)]
    pub digital: Option<bool>,
    #[serde(default)]
    pub full_art: Option<bool>,
    #[serde(default)]
    pub tcgplayer_id: Option<u64>,
    #[serde(default)]
    pub released_at: Option<String>,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
    #[serde(default)]
    pub card_faces: Option<Vec<RawCardFace>>,
}

/// One side of a multi-face printing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCardFace {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub oracle_id: Option<String>,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub cmc: Option<f64>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub colors: Option<Vec<String>>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
    #[serde(default)]
    pub loyalty: Option<String>,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
}

/// Image links for a printing or face.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageUris {
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub normal: Option<String>,
    #[serde(default)]
    pub art_crop: Option<String>,
}

impl RawCard {
    pub fn layout(&self) -> &str {
        self.layout.as_deref().unwrap_or("")
    }

    pub fn faces(&self) -> &[RawCardFace] {
        self.card_faces.as_deref().unwrap_or(&[])
    }

    pub fn has_faces(&self) -> bool {
        !self.faces().is_empty()
    }
}
