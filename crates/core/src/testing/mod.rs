//! Testing utilities and mock implementations.
//!
//! This module provides a mock upstream feed and upstream record fixtures,
//! allowing ingestion and lookup tests without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use cardcatalog_core::testing::{fixtures, MockUpstreamFeed};
//!
//! let feed = MockUpstreamFeed::with_records(fixtures::raw_printings(99, 21));
//!
//! // Simulate an upstream outage
//! feed.set_next_error(FeedError::Parse("truncated".into())).await;
//! ```

mod mock_feed;

pub use mock_feed::MockUpstreamFeed;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::collections::BTreeMap;

    use crate::card::{convert_card, Card, ImageUris, RawCard, RawCardFace};

    fn s(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    fn colors(letters: &[&str]) -> Option<Vec<String>> {
        Some(letters.iter().map(|c| c.to_string()).collect())
    }

    fn legalities(entries: &[(&str, &str)]) -> Option<BTreeMap<String, String>> {
        Some(
            entries
                .iter()
                .map(|(format, status)| (format.to_string(), status.to_string()))
                .collect(),
        )
    }

    fn images(side: &str, id: &str, version: &str) -> Option<ImageUris> {
        let prefix = format!("{}/{}", &id[..1], &id[1..2]);
        let url = |size: &str| {
            format!(
                "https://img.scryfall.com/cards/{}/{}/{}/{}.jpg?{}",
                size, side, prefix, id, version
            )
        };
        Some(ImageUris {
            small: Some(url("small")),
            normal: Some(url("normal")),
            art_crop: Some(url("art_crop")),
        })
    }

    /// A plain single-faced printing with reasonable defaults.
    pub fn raw_card(id: &str, name: &str, set: &str) -> RawCard {
        RawCard {
            id: s(id),
            oracle_id: Some(format!("oracle-{}", id)),
            name: s(name),
            lang: s("en"),
            set: s(set),
            collector_number: s("1"),
            layout: s("normal"),
            rarity: s("common"),
            artist: s("Test Artist"),
            scryfall_uri: Some(format!("https://scryfall.com/card/{}/1", set)),
            border_color: s("black"),
            type_line: s("Artifact Creature — Construct"),
            oracle_text: s("Vigilance"),
            mana_cost: s("{2}"),
            cmc: Some(2.0),
            colors: colors(&[]),
            color_identity: colors(&[]),
            legalities: legalities(&[("modern", "legal"), ("legacy", "legal")]),
            power: s("2"),
            toughness: s("2"),
            tcgplayer_id: Some(1000),
            released_at: s("2020-01-01"),
            image_uris: Some(ImageUris {
                small: Some(format!("https://img.example/small/{}.jpg", id)),
                normal: Some(format!("https://img.example/normal/{}.jpg", id)),
                art_crop: Some(format!("https://img.example/art_crop/{}.jpg", id)),
            }),
            ..Default::default()
        }
    }

    /// `raw_card` run through the converter.
    pub fn card(id: &str, name: &str, set: &str) -> Card {
        convert_card(&raw_card(id, name, set), false).unwrap_or_else(|_| Card::placeholder(id))
    }

    /// `count` printings with distinct names spread over `letters` first
    /// letters (at most 26), round robin.
    pub fn raw_printings(count: usize, letters: usize) -> Vec<RawCard> {
        let letters = letters.clamp(1, 26);
        (0..count)
            .map(|i| {
                let letter = char::from(b'A' + (i % letters) as u8);
                raw_card(
                    &format!("printing-{}", i),
                    &format!("{}aer Sentinel {}", letter, i),
                    "tst",
                )
            })
            .collect()
    }

    /// Converted `raw_printings`.
    pub fn printings(count: usize, letters: usize) -> Vec<Card> {
        raw_printings(count, letters)
            .iter()
            .filter_map(|raw| convert_card(raw, false).ok())
            .collect()
    }

    /// Single-faced, two-color creature.
    pub fn inspiring_veteran() -> RawCard {
        let id = "0c3f372d-259d-4a31-9491-2d369b3f3f8b";
        RawCard {
            id: s(id),
            oracle_id: s("aa1a63dd-acb1-465f-8970-667b8d7c57c9"),
            name: s("Inspiring Veteran"),
            lang: s("en"),
            set: s("eld"),
            collector_number: s("194"),
            layout: s("normal"),
            rarity: s("uncommon"),
            artist: s("Scott Murphy"),
            scryfall_uri: s("https://scryfall.com/card/eld/194/inspiring-veteran?utm_source=api"),
            border_color: s("black"),
            type_line: s("Creature — Human Knight"),
            oracle_text: s("Other Knights you control get +1/+1."),
            mana_cost: s("{R}{W}"),
            cmc: Some(2.0),
            colors: colors(&["R", "W"]),
            color_identity: colors(&["R", "W"]),
            legalities: legalities(&[
                ("standard", "legal"),
                ("pioneer", "legal"),
                ("modern", "legal"),
                ("legacy", "legal"),
                ("pauper", "not_legal"),
                ("vintage", "legal"),
                ("commander", "legal"),
            ]),
            power: s("2"),
            toughness: s("2"),
            promo: Some(false),
            digital: Some(false),
            full_art: Some(false),
            tcgplayer_id: Some(198561),
            released_at: s("2019-10-04"),
            image_uris: images("front", id, "1572490775"),
            card_faces: None,
            loyalty: None,
        }
    }

    /// Transforming double-faced card with images on each face.
    pub fn scorned_villager() -> RawCard {
        let id = "6f35e364-81d9-4888-993b-acc7a53d963c";
        RawCard {
            id: s(id),
            oracle_id: s("52855f90-19c1-46c9-8eed-88b3c1722bb0"),
            name: s("Scorned Villager // Moonscarred Werewolf"),
            lang: s("en"),
            set: s("dka"),
            collector_number: s("125"),
            layout: s("transform"),
            rarity: s("common"),
            artist: s("Cynthia Sheppard"),
            scryfall_uri: s(
                "https://scryfall.com/card/dka/125/scorned-villager-moonscarred-werewolf?utm_source=api",
            ),
            border_color: s("black"),
            type_line: s("Creature — Human Werewolf // Creature — Werewolf"),
            cmc: Some(2.0),
            color_identity: colors(&["G"]),
            legalities: legalities(&[
                ("standard", "not_legal"),
                ("pioneer", "not_legal"),
                ("modern", "legal"),
                ("legacy", "legal"),
                ("pauper", "legal"),
            ]),
            promo: Some(false),
            digital: Some(false),
            full_art: Some(false),
            tcgplayer_id: Some(57617),
            released_at: s("2012-02-03"),
            card_faces: Some(vec![
                RawCardFace {
                    name: s("Scorned Villager"),
                    mana_cost: s("{1}{G}"),
                    type_line: s("Creature — Human Werewolf"),
                    oracle_text: s(
                        "{T}: Add {G}.\nAt the beginning of each upkeep, if no spells were cast last turn, transform Scorned Villager.",
                    ),
                    colors: colors(&["G"]),
                    power: s("1"),
                    toughness: s("1"),
                    image_uris: images("front", id, "1562921188"),
                    ..Default::default()
                },
                RawCardFace {
                    name: s("Moonscarred Werewolf"),
                    mana_cost: s(""),
                    type_line: s("Creature — Werewolf"),
                    oracle_text: s(
                        "Vigilance\n{T}: Add {G}{G}.\nAt the beginning of each upkeep, if a player cast two or more spells last turn, transform Moonscarred Werewolf.",
                    ),
                    colors: colors(&["G"]),
                    power: s("2"),
                    toughness: s("2"),
                    image_uris: images("back", id, "1562921188"),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        }
    }

    /// Adventure card: two faces, one image set on the record.
    pub fn flaxen_intruder() -> RawCard {
        let id = "06bd1ad2-fb5d-4aef-87d1-13a341c686fa";
        RawCard {
            id: s(id),
            oracle_id: s("bacedc99-46d9-4757-8a27-8df77d7c2f02"),
            name: s("Flaxen Intruder // Welcome Home"),
            lang: s("en"),
            set: s("eld"),
            collector_number: s("155"),
            layout: s("adventure"),
            rarity: s("uncommon"),
            artist: s("Gabor Szikszai"),
            scryfall_uri: s(
                "https://scryfall.com/card/eld/155/flaxen-intruder-welcome-home?utm_source=api",
            ),
            border_color: s("black"),
            type_line: s("Creature — Human Berserker // Sorcery — Adventure"),
            mana_cost: s("{G} // {5}{G}{G}"),
            cmc: Some(1.0),
            colors: colors(&["G"]),
            color_identity: colors(&["G"]),
            legalities: legalities(&[
                ("standard", "legal"),
                ("pioneer", "legal"),
                ("modern", "legal"),
                ("legacy", "legal"),
                ("pauper", "not_legal"),
            ]),
            promo: Some(false),
            digital: Some(false),
            full_art: Some(false),
            tcgplayer_id: Some(198574),
            released_at: s("2019-10-04"),
            image_uris: images("front", id, "1572490543"),
            card_faces: Some(vec![
                RawCardFace {
                    name: s("Flaxen Intruder"),
                    mana_cost: s("{G}"),
                    type_line: s("Creature — Human Berserker"),
                    oracle_text: s(
                        "Whenever Flaxen Intruder deals combat damage to a player, you may sacrifice it. When you do, destroy target artifact or enchantment.",
                    ),
                    power: s("1"),
                    toughness: s("2"),
                    ..Default::default()
                },
                RawCardFace {
                    name: s("Welcome Home"),
                    mana_cost: s("{5}{G}{G}"),
                    type_line: s("Sorcery — Adventure"),
                    oracle_text: s(
                        "Create three 2/2 green Bear creature tokens. (Then exile this card. You may cast the creature later from exile.)",
                    ),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        }
    }
}
