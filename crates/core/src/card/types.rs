//! Canonical card record shared by every index in the catalog.

use serde::{Deserialize, Serialize};

/// Image shown for identifiers the catalog does not know about.
pub const MISSING_IMAGE_URL: &str = "https://img.scryfall.com/errors/missing.jpg";

/// Name carried by placeholder cards.
pub const PLACEHOLDER_NAME: &str = "Invalid Card";

/// One printing of a card, converted from an upstream record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Stable printing identifier. Back faces carry the front id plus `2`.
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub oracle_id: String,
    pub name: String,
    /// `normalize(name)`.
    pub name_lower: String,
    /// `"{name} [{set}-{collector_number}]"`.
    pub full_name: String,
    #[serde(default)]
    pub set: String,
    #[serde(default)]
    pub collector_number: String,
    #[serde(default)]
    pub rarity: String,
    #[serde(default)]
    pub oracle_text: String,
    #[serde(default)]
    pub cmc: f64,
    /// Mana symbols, lowercased and in reverse printed order.
    #[serde(default)]
    pub parsed_cost: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub color_identity: Vec<String>,
    #[serde(default)]
    pub colorcategory: Option<ColorCategory>,
    #[serde(default)]
    pub legalities: Legalities,
    #[serde(rename = "type", default)]
    pub type_line: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toughness: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loyalty: Option<String>,
    #[serde(default)]
    pub layout: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub scryfall_uri: String,
    #[serde(default)]
    pub border_color: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub promo: bool,
    #[serde(default)]
    pub digital: bool,
    #[serde(rename = "isToken", default)]
    pub is_token: bool,
    #[serde(default)]
    pub full_art: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcgplayer_id: Option<u64>,
    /// Release date of the printing's set, `YYYY-MM-DD`.
    #[serde(default)]
    pub released_at: String,
    /// Set for secondary faces; those never feed the `cardimages` index.
    #[serde(rename = "isExtra", default)]
    pub is_extra: bool,
    #[serde(default)]
    pub image_small: String,
    #[serde(default)]
    pub image_normal: String,
    #[serde(default)]
    pub art_crop: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_flip: Option<String>,
    /// True only for placeholder cards.
    #[serde(default)]
    pub error: bool,
}

impl Card {
    /// Sentinel card for an identifier that could not be resolved.
    pub fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            oracle_id: String::new(),
            name: PLACEHOLDER_NAME.to_string(),
            name_lower: PLACEHOLDER_NAME.to_lowercase(),
            full_name: PLACEHOLDER_NAME.to_string(),
            set: String::new(),
            collector_number: String::new(),
            rarity: String::new(),
            oracle_text: String::new(),
            cmc: 0.0,
            parsed_cost: Vec::new(),
            colors: Vec::new(),
            color_identity: Vec::new(),
            colorcategory: Some(ColorCategory::Colorless),
            legalities: Legalities::default(),
            type_line: String::new(),
            power: None,
            toughness: None,
            loyalty: None,
            layout: String::new(),
            artist: String::new(),
            scryfall_uri: String::new(),
            border_color: String::new(),
            language: String::new(),
            promo: false,
            digital: false,
            is_token: false,
            full_art: false,
            tcgplayer_id: None,
            released_at: String::new(),
            is_extra: false,
            image_small: String::new(),
            image_normal: MISSING_IMAGE_URL.to_string(),
            art_crop: String::new(),
            image_flip: None,
            error: true,
        }
    }

    /// Whether this printing is a sensible default to show for its name.
    ///
    /// Rules out secondary faces, promos, digital-only and token printings,
    /// gold-bordered and non-English printings, printings without a
    /// marketplace id, the Mystery Booster sets, starred collector numbers
    /// and art series cards.
    pub fn is_reasonable(&self) -> bool {
        !self.is_extra
            && !self.promo
            && !self.digital
            && !self.is_token
            && self.border_color != "gold"
            && self.language == "en"
            && self.tcgplayer_id.is_some()
            && !UNREASONABLE_SETS.contains(&self.set.as_str())
            && !self.collector_number.contains('\u{2605}')
            && self.layout != "art_series"
    }
}

/// Sets whose printings are never picked as a default.
const UNREASONABLE_SETS: [&str; 2] = ["myb", "mb1"];

/// Coarse single-letter color grouping used for sorting and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorCategory {
    #[serde(rename = "w")]
    White,
    #[serde(rename = "u")]
    Blue,
    #[serde(rename = "b")]
    Black,
    #[serde(rename = "r")]
    Red,
    #[serde(rename = "g")]
    Green,
    #[serde(rename = "m")]
    Multicolored,
    #[serde(rename = "c")]
    Colorless,
    #[serde(rename = "l")]
    Lands,
}

impl ColorCategory {
    /// Category for a single color letter, case-insensitive.
    pub fn from_color(color: &str) -> Option<Self> {
        match color.to_ascii_lowercase().as_str() {
            "w" => Some(Self::White),
            "u" => Some(Self::Blue),
            "b" => Some(Self::Black),
            "r" => Some(Self::Red),
            "g" => Some(Self::Green),
            _ => None,
        }
    }

    /// Derive the category from a type line and a color identity.
    ///
    /// Lands win over everything else. An identity holding one token that is
    /// not a known color has no category.
    pub fn derive(type_line: &str, color_identity: &[String]) -> Option<Self> {
        if type_line.contains("Land") {
            return Some(Self::Lands);
        }

        let mut distinct: Vec<String> = color_identity
            .iter()
            .map(|c| c.to_ascii_lowercase())
            .collect();
        distinct.sort();
        distinct.dedup();

        match distinct.as_slice() {
            [] => Some(Self::Colorless),
            [single] => Self::from_color(single),
            _ => Some(Self::Multicolored),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::White => "w",
            Self::Blue => "u",
            Self::Black => "b",
            Self::Red => "r",
            Self::Green => "g",
            Self::Multicolored => "m",
            Self::Colorless => "c",
            Self::Lands => "l",
        }
    }
}

/// Formats tracked in the legality table.
pub const SUPPORTED_FORMATS: [&str; 10] = [
    "Legacy",
    "Modern",
    "Standard",
    "Pioneer",
    "Pauper",
    "Brawl",
    "Historic",
    "Commander",
    "Penny",
    "Vintage",
];

/// Per-format legality. Formats missing upstream are not legal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Legalities {
    #[serde(default)]
    pub legacy: bool,
    #[serde(default)]
    pub modern: bool,
    #[serde(default)]
    pub standard: bool,
    #[serde(default)]
    pub pioneer: bool,
    #[serde(default)]
    pub pauper: bool,
    #[serde(default)]
    pub brawl: bool,
    #[serde(default)]
    pub historic: bool,
    #[serde(default)]
    pub commander: bool,
    #[serde(default)]
    pub penny: bool,
    #[serde(default)]
    pub vintage: bool,
}

impl Legalities {
    /// Look up a format by its display name (`"Modern"`) or upstream key (`"modern"`).
    pub fn get(&self, format: &str) -> Option<bool> {
        self.slot(format).map(|slot| *slot)
    }

    /// Record a legality, ignoring formats outside the table.
    pub fn set(&mut self, format: &str, legal: bool) {
        if let Some(slot) = self.slot_mut(format) {
            *slot = legal;
        }
    }

    fn slot(&self, format: &str) -> Option<&bool> {
        match format.to_ascii_lowercase().as_str() {
            "legacy" => Some(&self.legacy),
            "modern" => Some(&self.modern),
            "standard" => Some(&self.standard),
            "pioneer" => Some(&self.pioneer),
            "pauper" => Some(&self.pauper),
            "brawl" => Some(&self.brawl),
            "historic" => Some(&self.historic),
            "commander" => Some(&self.commander),
            "penny" => Some(&self.penny),
            "vintage" => Some(&self.vintage),
            _ => None,
        }
    }

    fn slot_mut(&mut self, format: &str) -> Option<&mut bool> {
        match format.to_ascii_lowercase().as_str() {
            "legacy" => Some(&mut self.legacy),
            "modern" => Some(&mut self.modern),
            "standard" => Some(&mut self.standard),
            "pioneer" => Some(&mut self.pioneer),
            "pauper" => Some(&mut self.pauper),
            "brawl" => Some(&mut self.brawl),
            "historic" => Some(&mut self.historic),
            "commander" => Some(&mut self.commander),
            "penny" => Some(&mut self.penny),
            "vintage" => Some(&mut self.vintage),
            _ => None,
        }
    }
}

/// A card as served to display code, with the image to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDetails {
    #[serde(flatten)]
    pub card: Card,
    pub display_image: String,
}

impl From<Card> for CardDetails {
    fn from(card: Card) -> Self {
        let display_image = card.image_normal.clone();
        Self {
            card,
            display_image,
        }
    }
}
