//! Folding canonical cards into a catalog.

use super::types::{CardImages, Catalog, ImageEntry};
use crate::card::Card;
use crate::normalize::normalize;

/// Add one card to every index.
///
/// Extra faces are indexed by name and artwork but never become the default
/// images for their name. A later card with the same identifier replaces the
/// earlier one in `dict`. Cards without an oracle identifier stay out of
/// `oracle_to_id`.
pub fn add_card_to_catalog(catalog: &mut Catalog, card: Card, is_extra: bool) {
    add_and_report_new_name(catalog, card, is_extra);
}

/// Name keys seen for the first time, with the full name that introduced them.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NewName {
    name: String,
    key: String,
    full_key: String,
}

fn add_and_report_new_name(catalog: &mut Catalog, card: Card, is_extra: bool) -> Option<NewName> {
    let key = normalize(&card.name);
    let full_key = normalize(&card.full_name);

    let new_name = match catalog.name_to_id.get_mut(&key) {
        Some(ids) => {
            ids.push(card.id.clone());
            None
        }
        None => {
            catalog.name_to_id.insert(key.clone(), vec![card.id.clone()]);
            catalog.names.push(card.name.clone());
            catalog.cardtree.insert(&key);
            catalog.full_names.insert(&full_key);
            Some(NewName {
                name: card.name.clone(),
                key: key.clone(),
                full_key: full_key.clone(),
            })
        }
    };

    if !card.oracle_id.is_empty() {
        catalog
            .oracle_to_id
            .entry(card.oracle_id.clone())
            .or_default()
            .push(card.id.clone());
    }

    catalog.imagedict.insert(
        full_key,
        ImageEntry {
            uri: card.art_crop.clone(),
            artist: card.artist.clone(),
        },
    );

    if !is_extra {
        catalog.cardimages.insert(
            key,
            CardImages {
                image_normal: card.image_normal.clone(),
                image_flip: card.image_flip.clone(),
            },
        );
    }

    catalog.dict.insert(card.id.clone(), card);
    new_name
}

impl Catalog {
    pub fn add_card(&mut self, card: Card, is_extra: bool) {
        add_card_to_catalog(self, card, is_extra);
    }

    /// Fold a shard built from later records into this catalog.
    ///
    /// The result equals adding both record runs in sequence to a single
    /// catalog: the shard wins every overwrite and its name buckets follow
    /// ours.
    pub fn merge(&mut self, shard: CatalogShard) {
        let CatalogShard { catalog, new_names } = shard;
        let Catalog {
            dict,
            mut name_to_id,
            imagedict,
            cardimages,
            cardtree: _,
            names: _,
            full_names: _,
            oracle_to_id,
        } = catalog;

        for NewName {
            name,
            key,
            full_key,
        } in new_names
        {
            let Some(ids) = name_to_id.remove(&key) else {
                continue;
            };

            match self.name_to_id.get_mut(&key) {
                Some(existing) => existing.extend(ids),
                None => {
                    self.cardtree.insert(&key);
                    self.full_names.insert(&full_key);
                    self.name_to_id.insert(key, ids);
                    self.names.push(name);
                }
            }
        }

        for (oracle_id, ids) in oracle_to_id {
            self.oracle_to_id.entry(oracle_id).or_default().extend(ids);
        }
        self.imagedict.extend(imagedict);
        self.cardimages.extend(cardimages);
        self.dict.extend(dict);
    }
}

/// A catalog built from one contiguous run of records, to be merged in order.
///
/// Remembers the full name that introduced each name key, which `dict` alone
/// cannot recover once a repeated identifier overwrites its entry.
#[derive(Debug, Clone, Default)]
pub struct CatalogShard {
    catalog: Catalog,
    new_names: Vec<NewName>,
}

impl CatalogShard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_card(&mut self, card: Card, is_extra: bool) {
        if let Some(new_name) = add_and_report_new_name(&mut self.catalog, card, is_extra) {
            self.new_names.push(new_name);
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }
}

impl From<CatalogShard> for Catalog {
    fn from(shard: CatalogShard) -> Self {
        shard.into_catalog()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{convert_card, Card};
    use crate::testing::fixtures;

    fn printing(id: &str, name: &str, set: &str) -> Card {
        convert_card(&fixtures::raw_card(id, name, set), false).unwrap()
    }

    #[test]
    fn test_add_single_card() {
        let card = convert_card(&fixtures::inspiring_veteran(), false).unwrap();
        let mut catalog = Catalog::new();
        add_card_to_catalog(&mut catalog, card.clone(), false);

        assert_eq!(catalog.dict.len(), 1);
        assert_eq!(catalog.dict[&card.id], card);
        assert_eq!(catalog.name_to_id["inspiring veteran"], vec![card.id.clone()]);
        assert_eq!(
            catalog.imagedict["inspiring veteran [eld-194]"],
            ImageEntry {
                uri: card.art_crop.clone(),
                artist: "Scott Murphy".to_string(),
            }
        );
        assert_eq!(
            catalog.cardimages["inspiring veteran"],
            CardImages {
                image_normal: card.image_normal.clone(),
                image_flip: None,
            }
        );
        assert_eq!(catalog.names, vec!["Inspiring Veteran"]);
        assert!(catalog.cardtree.contains("inspiring veteran"));
        assert!(catalog.full_names.contains("inspiring veteran [eld-194]"));
    }

    #[test]
    fn test_add_extra_face_skips_cardimages() {
        let card = convert_card(&fixtures::scorned_villager(), true).unwrap();
        let mut catalog = Catalog::new();
        catalog.add_card(card.clone(), true);

        assert_eq!(catalog.dict.len(), 1);
        assert_eq!(catalog.imagedict.len(), 1);
        assert!(catalog.cardimages.is_empty());
        assert_eq!(catalog.name_to_id["moonscarred werewolf"], vec![card.id]);
        assert_eq!(catalog.names.len(), 1);
        assert_eq!(catalog.full_names.len(), 1);
    }

    #[test]
    fn test_reprints_share_name_bucket() {
        let mut catalog = Catalog::new();
        catalog.add_card(printing("a", "Shock", "m19"), false);
        catalog.add_card(printing("b", "Shock", "m20"), false);
        catalog.add_card(printing("c", "Shock", "m21"), false);

        assert_eq!(catalog.name_to_id["shock"], vec!["a", "b", "c"]);
        assert_eq!(catalog.names, vec!["Shock"]);
        assert_eq!(catalog.imagedict.len(), 3);
        assert_eq!(catalog.cardimages.len(), 1);
        // Only the first printing's full name enters the tree.
        assert_eq!(catalog.full_names.len(), 1);
        assert!(catalog.full_names.contains("shock [m19-1]"));
        assert_eq!(
            catalog.cardimages["shock"].image_normal,
            catalog.dict["c"].image_normal
        );
    }

    #[test]
    fn test_same_id_last_write_wins() {
        let mut catalog = Catalog::new();
        catalog.add_card(printing("a", "Shock", "m19"), false);
        catalog.add_card(printing("a", "Shock", "m20"), false);

        assert_eq!(catalog.dict.len(), 1);
        assert_eq!(catalog.dict["a"].set, "m20");
        assert_eq!(catalog.name_to_id["shock"], vec!["a", "a"]);
    }

    #[test]
    fn test_diacritic_names_share_key() {
        let mut catalog = Catalog::new();
        catalog.add_card(printing("a", "Lim-Dûl's Vault", "all"), false);
        catalog.add_card(printing("b", "Lim-Dul's Vault", "ema"), false);

        assert_eq!(catalog.name_to_id["lim-dul's vault"], vec!["a", "b"]);
        assert_eq!(catalog.names, vec!["Lim-Dûl's Vault"]);
    }

    #[test]
    fn test_stats_counts_every_index() {
        let mut catalog = Catalog::new();
        for card in fixtures::printings(99, 21) {
            catalog.add_card(card, false);
        }

        let stats = catalog.stats();
        assert_eq!(stats.cards, 99);
        assert_eq!(stats.name_keys, 99);
        assert_eq!(stats.names, 99);
        assert_eq!(stats.image_entries, 99);
        assert_eq!(stats.card_images, 99);
        assert_eq!(stats.tree_buckets, 21);
        assert_eq!(stats.full_name_buckets, 21);
        assert_eq!(stats.full_names, 99);
        assert_eq!(stats.oracle_ids, 99);
    }

    fn build_sequential(cards: &[Card]) -> Catalog {
        let mut catalog = Catalog::new();
        for card in cards.iter().cloned() {
            catalog.add_card(card, false);
        }
        catalog
    }

    fn build_merged(cards: &[Card], shard_size: usize) -> Catalog {
        let mut merged = Catalog::new();
        for chunk in cards.chunks(shard_size) {
            let mut shard = CatalogShard::new();
            for card in chunk.iter().cloned() {
                shard.add_card(card, false);
            }
            merged.merge(shard);
        }
        merged
    }

    #[test]
    fn test_merge_matches_sequential_build() {
        let mut cards = fixtures::printings(40, 7);
        cards.push(printing("dup-1", "Shock", "m19"));
        cards.insert(3, printing("dup-0", "Shock", "a25"));
        cards.push(printing("dup-2", "Shock", "m21"));

        let sequential = build_sequential(&cards);
        let merged = build_merged(&cards, 9);

        assert_eq!(merged, sequential);
        assert_eq!(merged.name_to_id["shock"], vec!["dup-0", "dup-1", "dup-2"]);
    }

    #[test]
    fn test_merge_repeated_identifier_keeps_first_full_name() {
        let cards = vec![printing("a", "Shock", "m19"), printing("a", "Opt", "xln")];

        let sequential = build_sequential(&cards);
        assert!(sequential.full_names.contains("shock [m19-1]"));
        assert!(sequential.full_names.contains("opt [xln-1]"));

        assert_eq!(build_merged(&cards, 2), sequential);
        assert_eq!(build_merged(&cards, 1), sequential);
    }

    #[test]
    fn test_merge_repeated_identifier_across_shards() {
        let cards = vec![
            printing("a", "Shock", "m19"),
            printing("b", "Opt", "xln"),
            printing("a", "Duress", "m20"),
            printing("c", "Shock", "m21"),
        ];
        assert_eq!(build_merged(&cards, 3), build_sequential(&cards));
    }

    #[test]
    fn test_merge_into_empty() {
        let mut shard = CatalogShard::new();
        shard.add_card(printing("a", "Shock", "m19"), false);
        let expected = shard.catalog().clone();

        let mut merged = Catalog::new();
        merged.merge(shard);
        assert_eq!(merged, expected);
    }

    #[test]
    fn test_oracle_index_groups_printings() {
        let mut first = printing("a", "Shock", "m19");
        let mut second = printing("b", "Shock", "m20");
        first.oracle_id = "oracle-shock".to_string();
        second.oracle_id = "oracle-shock".to_string();
        let mut orphan = printing("c", "Opt", "xln");
        orphan.oracle_id = String::new();

        let mut catalog = Catalog::new();
        catalog.add_card(first, false);
        catalog.add_card(second, false);
        catalog.add_card(orphan, false);

        assert_eq!(catalog.ids_for_oracle("oracle-shock"), ["a", "b"]);
        assert!(catalog.ids_for_oracle("").is_empty());
        assert_eq!(catalog.stats().oracle_ids, 1);
    }

    #[test]
    fn test_first_reasonable_skips_promos() {
        let mut promo = printing("a", "Shock", "m19");
        promo.promo = true;
        let regular = printing("b", "Shock", "m20");

        let mut catalog = Catalog::new();
        catalog.add_card(promo, false);
        catalog.add_card(regular, false);

        let ids = catalog.ids_for_key("shock").to_vec();
        assert_eq!(catalog.first_reasonable(&ids).map(|c| c.id.as_str()), Some("b"));

        let promo_only = vec!["a".to_string()];
        assert_eq!(
            catalog.first_reasonable(&promo_only).map(|c| c.id.as_str()),
            Some("a")
        );
        assert!(catalog.first_reasonable(&[]).is_none());
    }
}
