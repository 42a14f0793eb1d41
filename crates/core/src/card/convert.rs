//! Conversion of upstream records into canonical cards.

use thiserror::Error;
use tracing::warn;

use super::raw::{ImageUris, RawCard, RawCardFace};
use super::types::{Card, ColorCategory, Legalities, SUPPORTED_FORMATS};
use crate::normalize::normalize;

/// Separator between face names in a multi-face record name.
const FACE_SEPARATOR: &str = "//";

/// Errors that make a record unconvertible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("record has no identifier")]
    MissingId,

    #[error("record {0} has no name")]
    MissingName(String),
}

/// Layouts whose back face becomes its own catalog entry.
pub fn has_separate_back_face(raw: &RawCard) -> bool {
    matches!(raw.layout(), "transform" | "modal_dfc")
}

/// Convert one upstream record into a canonical card.
///
/// With `use_back_face` the result describes the second face: its id gets a
/// `2` suffix and it is marked as an extra face.
pub fn convert_card(raw: &RawCard, use_back_face: bool) -> Result<Card, ConvertError> {
    let upstream_id = raw
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(ConvertError::MissingId)?;
    if raw.name.as_deref().map_or(true, str::is_empty) {
        return Err(ConvertError::MissingName(upstream_id.to_string()));
    }

    let face = face_source(raw, use_back_face);
    let id = if use_back_face {
        format!("{}2", upstream_id)
    } else {
        upstream_id.to_string()
    };

    let name = convert_name(raw, use_back_face);
    let set = raw.set.clone().unwrap_or_default();
    let collector_number = raw.collector_number.clone().unwrap_or_default();
    let full_name = format!("{} [{}-{}]", name, set, collector_number);
    let type_line = convert_type(raw, use_back_face);
    let color_identity = raw.color_identity.clone().unwrap_or_default();
    let colorcategory = ColorCategory::derive(&type_line, &color_identity);

    let images = face
        .and_then(|f| f.image_uris.as_ref())
        .or(raw.image_uris.as_ref());
    let image_flip = raw
        .faces()
        .get(1)
        .and_then(|f| f.image_uris.as_ref())
        .and_then(|i| i.normal.clone());

    let oracle_id = face
        .and_then(|f| f.oracle_id.clone())
        .or_else(|| raw.oracle_id.clone())
        .unwrap_or_default();
    let (power, toughness, loyalty) = match face {
        Some(f) => (f.power.clone(), f.toughness.clone(), f.loyalty.clone()),
        None => (raw.power.clone(), raw.toughness.clone(), raw.loyalty.clone()),
    };

    Ok(Card {
        id,
        oracle_id,
        name_lower: normalize(&name),
        name,
        full_name,
        set,
        collector_number,
        rarity: raw.rarity.clone().unwrap_or_default(),
        oracle_text: convert_oracle_text(raw, use_back_face),
        cmc: convert_cmc(raw, use_back_face),
        parsed_cost: convert_parsed_cost(raw, use_back_face),
        colors: convert_colors(raw, use_back_face),
        color_identity,
        colorcategory,
        legalities: convert_legalities(raw, use_back_face),
        type_line,
        power,
        toughness,
        loyalty,
        layout: raw.layout().to_string(),
        artist: raw.artist.clone().unwrap_or_default(),
        scryfall_uri: raw.scryfall_uri.clone().unwrap_or_default(),
        border_color: raw.border_color.clone().unwrap_or_default(),
        language: raw.lang.clone().unwrap_or_default(),
        promo: raw.promo.unwrap_or(false),
        digital: raw.digital.unwrap_or(false),
        is_token: raw.layout() == "token",
        full_art: raw.full_art.unwrap_or(false),
        tcgplayer_id: raw.tcgplayer_id,
        released_at: raw.released_at.clone().unwrap_or_default(),
        is_extra: use_back_face,
        image_small: image_field(images, |i| i.small.as_ref()),
        image_normal: image_field(images, |i| i.normal.as_ref()),
        art_crop: image_field(images, |i| i.art_crop.as_ref()),
        image_flip,
        error: false,
    })
}

fn face_source(raw: &RawCard, use_back_face: bool) -> Option<&RawCardFace> {
    let faces = raw.faces();
    if use_back_face {
        faces.get(1)
    } else {
        faces.first()
    }
}

fn image_field(images: Option<&ImageUris>, pick: impl Fn(&ImageUris) -> Option<&String>) -> String {
    images.and_then(pick).cloned().unwrap_or_default()
}

/// Display name for the requested face.
pub fn convert_name(raw: &RawCard, use_back_face: bool) -> String {
    let full = raw.name.as_deref().unwrap_or("");
    let name = match full.split_once(FACE_SEPARATOR) {
        Some((_, back)) if use_back_face => back,
        Some((front, _)) if raw.layout() != "split" => front,
        _ => full,
    };

    let name = name.trim();
    if raw.layout() == "art_series" {
        format!("{} Art Card", name)
    } else {
        name.to_string()
    }
}

/// Per-format legality. Back faces are never legal on their own.
pub fn convert_legalities(raw: &RawCard, use_back_face: bool) -> Legalities {
    let mut legalities = Legalities::default();
    if use_back_face {
        return legalities;
    }

    if let Some(upstream) = &raw.legalities {
        for format in SUPPORTED_FORMATS {
            let status = upstream
                .get(&format.to_ascii_lowercase())
                .map(String::as_str);
            legalities.set(format, matches!(status, Some("legal" | "restricted")));
        }
    }
    legalities
}

/// Split a mana cost such as `{2}{W/U}` into lowercased symbols, last symbol first.
pub fn tokenize_mana_cost(cost: &str) -> Vec<String> {
    let mut chars = cost.chars();
    chars.next();
    chars.next_back();
    chars
        .as_str()
        .to_lowercase()
        .rsplit("}{")
        .map(|symbol| symbol.replace('/', "-"))
        .collect()
}

pub fn convert_parsed_cost(raw: &RawCard, use_back_face: bool) -> Vec<String> {
    // Back faces cannot be cast on their own.
    if use_back_face {
        return Vec::new();
    }

    let faces = raw.faces();
    match raw.layout() {
        _ if faces.is_empty() => raw
            .mana_cost
            .as_deref()
            .map(tokenize_mana_cost)
            .unwrap_or_default(),
        "flip" => raw
            .mana_cost
            .as_deref()
            .map(tokenize_mana_cost)
            .unwrap_or_default(),
        "split" | "adventure" => raw
            .mana_cost
            .as_deref()
            .map(|cost| tokenize_mana_cost(&cost.replace(" // ", "{split}")))
            .unwrap_or_default(),
        layout => match &faces[0] {
            RawCardFace {
                colors: Some(_),
                mana_cost,
                ..
            } => mana_cost
                .as_deref()
                .map(tokenize_mana_cost)
                .unwrap_or_default(),
            _ => {
                warn!(
                    id = raw.id.as_deref().unwrap_or(""),
                    layout, "multi-face record without face colors, leaving mana cost empty"
                );
                Vec::new()
            }
        },
    }
}

/// Mana value. A back face without its own non-zero value takes the record's.
pub fn convert_cmc(raw: &RawCard, use_back_face: bool) -> f64 {
    let face_cmc = if use_back_face {
        raw.faces().get(1).and_then(|f| f.cmc).filter(|cmc| *cmc != 0.0)
    } else {
        None
    };
    face_cmc.or(raw.cmc).unwrap_or(0.0)
}

pub fn convert_colors(raw: &RawCard, use_back_face: bool) -> Vec<String> {
    let faces = raw.faces();

    if use_back_face {
        if faces.len() < 2 {
            return Vec::new();
        }
        // Adventure faces carry no colors upstream.
        if raw.layout() == "adventure" {
            return raw.colors.clone().unwrap_or_default();
        }
        if let Some(colors) = &faces[1].colors {
            return colors.clone();
        }
    }

    if faces.is_empty() || matches!(raw.layout(), "flip" | "split" | "adventure") {
        return raw.colors.clone().unwrap_or_default();
    }

    match &faces[0].colors {
        Some(colors) => colors.clone(),
        None => {
            warn!(
                id = raw.id.as_deref().unwrap_or(""),
                layout = raw.layout(),
                "multi-face record without face colors"
            );
            Vec::new()
        }
    }
}

pub fn convert_type(raw: &RawCard, use_back_face: bool) -> String {
    if let Some(type_line) = face_source(raw, use_back_face).and_then(|f| f.type_line.as_deref()) {
        return type_line.trim().to_string();
    }

    let type_line = raw.type_line.as_deref().unwrap_or("");
    let side = match type_line.split_once(FACE_SEPARATOR) {
        Some((_, back)) if use_back_face => back,
        Some((front, _)) => front,
        None => type_line,
    };
    side.trim().to_string()
}

pub fn convert_oracle_text(raw: &RawCard, use_back_face: bool) -> String {
    let faces = raw.faces();

    if use_back_face {
        if let Some(face) = faces.get(1) {
            return face.oracle_text.clone().unwrap_or_default();
        }
    } else if !faces.is_empty() {
        return faces
            .iter()
            .map(|f| f.oracle_text.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join("\n");
    }

    raw.oracle_text.clone().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn named(name: &str, layout: &str) -> RawCard {
        RawCard {
            id: Some("id".to_string()),
            name: Some(name.to_string()),
            layout: Some(layout.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_convert_single_faced_card() {
        let card = convert_card(&fixtures::inspiring_veteran(), false).unwrap();

        assert_eq!(card.id, "0c3f372d-259d-4a31-9491-2d369b3f3f8b");
        assert_eq!(card.name, "Inspiring Veteran");
        assert_eq!(card.name_lower, "inspiring veteran");
        assert_eq!(card.full_name, "Inspiring Veteran [eld-194]");
        assert_eq!(card.parsed_cost, vec!["w", "r"]);
        assert_eq!(card.cmc, 2.0);
        assert_eq!(card.colors, vec!["R", "W"]);
        assert_eq!(card.color_identity, vec!["R", "W"]);
        assert_eq!(card.colorcategory, Some(ColorCategory::Multicolored));
        assert_eq!(card.type_line, "Creature — Human Knight");
        assert_eq!(card.power.as_deref(), Some("2"));
        assert_eq!(card.toughness.as_deref(), Some("2"));
        assert_eq!(card.language, "en");
        assert_eq!(card.tcgplayer_id, Some(198561));
        assert!(card.legalities.modern);
        assert!(card.legalities.standard);
        assert!(!card.legalities.pauper);
        assert!(card.image_flip.is_none());
        assert!(card.image_normal.contains("/normal/front/"));
        assert!(!card.is_extra);
        assert!(!card.error);
    }

    #[test]
    fn test_convert_double_faced_front() {
        let card = convert_card(&fixtures::scorned_villager(), false).unwrap();

        assert_eq!(card.id, "6f35e364-81d9-4888-993b-acc7a53d963c");
        assert_eq!(card.name, "Scorned Villager");
        assert_eq!(card.type_line, "Creature — Human Werewolf");
        assert_eq!(card.parsed_cost, vec!["g", "1"]);
        assert_eq!(card.cmc, 2.0);
        assert_eq!(card.colors, vec!["G"]);
        assert_eq!(card.colorcategory, Some(ColorCategory::Green));
        assert_eq!(card.power.as_deref(), Some("1"));
        assert!(card.oracle_text.starts_with("{T}: Add {G}.\n"));
        assert!(card.oracle_text.ends_with("transform Moonscarred Werewolf."));
        assert!(card.image_normal.contains("/normal/front/"));
        assert!(card
            .image_flip
            .as_deref()
            .is_some_and(|url| url.contains("/normal/back/")));
        assert!(card.legalities.pauper);
    }

    #[test]
    fn test_convert_double_faced_back() {
        let card = convert_card(&fixtures::scorned_villager(), true).unwrap();

        assert_eq!(card.id, "6f35e364-81d9-4888-993b-acc7a53d963c2");
        assert_eq!(card.name, "Moonscarred Werewolf");
        assert_eq!(card.full_name, "Moonscarred Werewolf [dka-125]");
        assert_eq!(card.type_line, "Creature — Werewolf");
        assert!(card.oracle_text.starts_with("Vigilance"));
        // The face has no mana value of its own.
        assert_eq!(card.cmc, 2.0);
        assert!(card.parsed_cost.is_empty());
        assert_eq!(card.colors, vec!["G"]);
        assert_eq!(card.color_identity, vec!["G"]);
        assert_eq!(card.legalities, Legalities::default());
        assert!(card.image_normal.contains("/normal/back/"));
        assert!(card.art_crop.contains("/art_crop/back/"));
        assert!(card.is_extra);
    }

    #[test]
    fn test_convert_adventure_front() {
        let card = convert_card(&fixtures::flaxen_intruder(), false).unwrap();

        assert_eq!(card.name, "Flaxen Intruder");
        assert_eq!(card.parsed_cost, vec!["g", "g", "5", "split", "g"]);
        assert_eq!(card.cmc, 1.0);
        assert_eq!(card.colors, vec!["G"]);
        assert_eq!(card.type_line, "Creature — Human Berserker");
        assert!(card.image_flip.is_none());
        assert!(card.oracle_text.contains('\n'));
    }

    #[test]
    fn test_convert_adventure_back() {
        let card = convert_card(&fixtures::flaxen_intruder(), true).unwrap();

        assert_eq!(card.id, "06bd1ad2-fb5d-4aef-87d1-13a341c686fa2");
        assert_eq!(card.name, "Welcome Home");
        assert!(card.parsed_cost.is_empty());
        assert_eq!(card.cmc, 1.0);
        assert_eq!(card.colors, vec!["G"]);
        assert_eq!(card.colorcategory, Some(ColorCategory::Green));
        assert_eq!(card.type_line, "Sorcery — Adventure");
        // Adventure faces share the printing's artwork.
        assert!(card.image_normal.contains("/normal/front/"));
    }

    #[test]
    fn test_back_face_uses_own_mana_value_and_colors() {
        let mut raw = fixtures::scorned_villager();
        if let Some(faces) = raw.card_faces.as_mut() {
            faces[1].cmc = Some(5.0);
            faces[1].colors = Some(vec!["R".to_string()]);
        }

        let card = convert_card(&raw, true).unwrap();
        assert_eq!(card.cmc, 5.0);
        assert_eq!(card.colors, vec!["R"]);
        assert!(card.parsed_cost.is_empty());
    }

    #[test]
    fn test_back_face_without_colors_falls_back_to_front() {
        let mut raw = fixtures::scorned_villager();
        if let Some(faces) = raw.card_faces.as_mut() {
            faces[1].colors = None;
        }

        let card = convert_card(&raw, true).unwrap();
        assert_eq!(card.colors, vec!["G"]);
    }

    #[test]
    fn test_back_face_of_single_faced_record() {
        let card = convert_card(&fixtures::inspiring_veteran(), true).unwrap();
        assert!(card.colors.is_empty());
        assert!(card.parsed_cost.is_empty());
        assert_eq!(card.cmc, 2.0);
    }

    #[test]
    fn test_convert_missing_id() {
        let mut raw = named("Shock", "normal");
        raw.id = None;
        assert_eq!(convert_card(&raw, false), Err(ConvertError::MissingId));

        raw.id = Some(String::new());
        assert_eq!(convert_card(&raw, false), Err(ConvertError::MissingId));
    }

    #[test]
    fn test_convert_missing_name() {
        let mut raw = named("", "normal");
        assert_eq!(
            convert_card(&raw, false),
            Err(ConvertError::MissingName("id".to_string()))
        );

        raw.name = None;
        assert!(matches!(
            convert_card(&raw, false),
            Err(ConvertError::MissingName(_))
        ));
    }

    #[test]
    fn test_convert_sparse_record_defaults() {
        let card = convert_card(&named("Shock", "normal"), false).unwrap();
        assert_eq!(card.full_name, "Shock [-]");
        assert_eq!(card.artist, "");
        assert_eq!(card.image_normal, "");
        assert!(card.parsed_cost.is_empty());
        assert_eq!(card.colorcategory, Some(ColorCategory::Colorless));
        assert_eq!(card.tcgplayer_id, None);
    }

    #[test]
    fn test_convert_name_preserves_punctuation() {
        for name in [
            "Kharis & the Beholder",
            "Kharis \"The Beholder\"",
            "Kharis 'The Beholder'",
            "Kharis <The Beholder>",
            "Question Elemental?",
        ] {
            assert_eq!(convert_name(&named(name, ""), false), name);
        }
    }

    #[test]
    fn test_convert_name_multi_face() {
        let raw = named("Kharis // The Beholder", "flip");
        assert_eq!(convert_name(&raw, false), "Kharis");
        assert_eq!(convert_name(&raw, true), "The Beholder");
    }

    #[test]
    fn test_convert_name_split_keeps_both_halves() {
        let raw = named("Kharis // The Beholder", "split");
        assert_eq!(convert_name(&raw, false), "Kharis // The Beholder");
    }

    #[test]
    fn test_convert_name_art_series() {
        let raw = named("Kharis", "art_series");
        assert_eq!(convert_name(&raw, false), "Kharis Art Card");
    }

    #[test]
    fn test_tokenize_mana_cost() {
        assert_eq!(tokenize_mana_cost("{2}{B}{B}"), vec!["b", "b", "2"]);
        assert_eq!(tokenize_mana_cost("{W/U}{W/U}"), vec!["w-u", "w-u"]);
        assert_eq!(tokenize_mana_cost("{G}"), vec!["g"]);
        assert_eq!(tokenize_mana_cost(""), vec![""]);
    }

    #[test]
    fn test_parsed_cost_split_layout() {
        let mut raw = named("Fire // Ice", "split");
        raw.mana_cost = Some("{1}{R} // {1}{U}".to_string());
        raw.card_faces = Some(vec![RawCardFace::default(), RawCardFace::default()]);
        assert_eq!(
            convert_parsed_cost(&raw, false),
            vec!["u", "1", "split", "r", "1"]
        );
    }

    #[test]
    fn test_parsed_cost_face_without_colors_is_empty() {
        let mut raw = named("Front // Back", "transform");
        raw.card_faces = Some(vec![
            RawCardFace {
                mana_cost: Some("{1}{G}".to_string()),
                ..Default::default()
            },
            RawCardFace::default(),
        ]);
        assert!(convert_parsed_cost(&raw, false).is_empty());
        assert!(convert_colors(&raw, false).is_empty());
    }

    #[test]
    fn test_legalities_restricted_counts_as_legal() {
        let mut raw = named("Ancestral Recall", "normal");
        raw.legalities = Some(
            [
                ("vintage", "restricted"),
                ("legacy", "banned"),
                ("oathbreaker", "legal"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        );

        let legalities = convert_legalities(&raw, false);
        assert!(legalities.vintage);
        assert!(!legalities.legacy);
        assert!(!legalities.commander);
    }

    #[test]
    fn test_convert_type_splits_record_type_line() {
        let mut raw = named("Front // Back", "flip");
        raw.type_line = Some("Creature — Human // Creature — Spirit".to_string());
        assert_eq!(convert_type(&raw, false), "Creature — Human");
        assert_eq!(convert_type(&raw, true), "Creature — Spirit");
    }

    #[test]
    fn test_land_category_beats_identity() {
        let mut raw = named("Breeding Pool", "normal");
        raw.type_line = Some("Land — Forest Island".to_string());
        raw.color_identity = Some(vec!["G".to_string(), "U".to_string()]);
        let card = convert_card(&raw, false).unwrap();
        assert_eq!(card.colorcategory, Some(ColorCategory::Lands));
    }

    #[test]
    fn test_separate_back_face_layouts() {
        assert!(has_separate_back_face(&named("a // b", "transform")));
        assert!(has_separate_back_face(&named("a // b", "modal_dfc")));
        assert!(!has_separate_back_face(&named("a // b", "adventure")));
        assert!(!has_separate_back_face(&named("a // b", "split")));
        assert!(!has_separate_back_face(&named("a", "normal")));
    }
}
