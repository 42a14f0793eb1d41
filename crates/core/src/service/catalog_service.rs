use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use once_cell::sync::Lazy;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{CardDetailsQuery, NameQuery, Printing, ServiceError};
use crate::card::{Card, CardDetails};
use crate::catalog::{CardImages, Catalog, CatalogStats, ImageEntry};
use crate::config::{CatalogConfig, DEFAULT_AUTOCOMPLETE_LIMIT};
use crate::normalize::normalize;
use crate::snapshot::{self, Artifact};

static GLOBAL: Lazy<CatalogService> = Lazy::new(CatalogService::new);

/// Holder of the active catalog.
///
/// `None` in the swap cell means unloaded. Writers (`initialize`, `publish`,
/// `load_json_file`, `unload`) are serialized by `write_lock`; readers never
/// take it.
pub struct CatalogService {
    catalog: ArcSwapOption<Catalog>,
    write_lock: Mutex<()>,
    autocomplete_limit: usize,
}

impl Default for CatalogService {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogService {
    /// An unloaded service.
    pub fn new() -> Self {
        Self::with_autocomplete_limit(DEFAULT_AUTOCOMPLETE_LIMIT)
    }

    pub fn with_autocomplete_limit(autocomplete_limit: usize) -> Self {
        Self {
            catalog: ArcSwapOption::empty(),
            write_lock: Mutex::new(()),
            autocomplete_limit,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::with_autocomplete_limit(config.autocomplete_limit)
    }

    /// The process-wide instance.
    pub fn global() -> &'static CatalogService {
        &GLOBAL
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Load a snapshot directory and make it the active catalog.
    ///
    /// Fixture mode accepts a directory without a manifest. On any error the
    /// previously active catalog stays in place.
    pub async fn initialize(&self, source_dir: &Path, fixture_mode: bool) -> Result<(), ServiceError> {
        let _guard = self.write_lock.lock().await;

        let loaded = if fixture_mode {
            snapshot::load(source_dir).await
        } else {
            snapshot::load_verified(source_dir).await
        };

        let catalog = match loaded {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(
                    dir = %source_dir.display(),
                    error = %e,
                    still_loaded = self.is_loaded(),
                    "Catalog load failed"
                );
                return Err(e.into());
            }
        };

        let stats = catalog.stats();
        self.catalog.store(Some(Arc::new(catalog)));
        info!(
            dir = %source_dir.display(),
            cards = stats.cards,
            names = stats.names,
            fixture_mode,
            "Catalog initialized"
        );
        Ok(())
    }

    /// Make an already built catalog the active one.
    pub async fn publish(&self, catalog: Catalog) {
        let _guard = self.write_lock.lock().await;
        let cards = catalog.dict.len();
        self.catalog.store(Some(Arc::new(catalog)));
        info!(cards, "Catalog published");
    }

    /// Drop the active catalog. Lookups fail with `NotLoaded` afterwards.
    pub async fn unload(&self) {
        let _guard = self.write_lock.lock().await;
        self.catalog.store(None);
        info!("Catalog unloaded");
    }

    /// Replace one index of the active catalog with the contents of `path`.
    pub async fn load_json_file(&self, path: &Path, artifact: Artifact) -> Result<(), ServiceError> {
        let _guard = self.write_lock.lock().await;

        let current = self.loaded()?;
        let data = snapshot::load_artifact(path, artifact).await?;

        let mut next = Catalog::clone(&current);
        data.apply_to(&mut next);
        self.catalog.store(Some(Arc::new(next)));

        debug!(path = %path.display(), artifact = %artifact, "Replaced catalog index");
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.catalog.load().is_some()
    }

    /// The active catalog, if any.
    pub fn snapshot(&self) -> Option<Arc<Catalog>> {
        self.catalog.load_full()
    }

    fn loaded(&self) -> Result<Arc<Catalog>, ServiceError> {
        self.catalog.load_full().ok_or(ServiceError::NotLoaded)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// The card with this identifier, or a placeholder if it is unknown.
    ///
    /// An oracle identifier resolves to the first reasonable printing of
    /// that card.
    pub fn card_from_id(&self, id: &str) -> Result<Card, ServiceError> {
        let catalog = self.loaded()?;
        Ok(resolve_id(&catalog, id)
            .cloned()
            .unwrap_or_else(|| Self::get_placeholder_card(id)))
    }

    pub fn get_card_details(&self, query: &CardDetailsQuery) -> Result<CardDetails, ServiceError> {
        self.card_from_id(&query.card_id).map(CardDetails::from)
    }

    /// Every identifier printed under this name, in insertion order.
    pub fn all_ids(&self, query: &NameQuery) -> Result<Vec<String>, ServiceError> {
        let catalog = self.loaded()?;
        Ok(catalog.ids_for_key(&normalize(&query.name)).to_vec())
    }

    /// Like `all_ids`, but `"Name [set-number]"` narrows to that printing.
    pub fn ids_from_name(&self, name: &str) -> Result<Vec<String>, ServiceError> {
        let catalog = self.loaded()?;
        Ok(ids_from_name(&catalog, name))
    }

    /// Every printing identifier sharing this oracle identifier.
    pub fn ids_for_oracle(&self, oracle_id: &str) -> Result<Vec<String>, ServiceError> {
        let catalog = self.loaded()?;
        Ok(catalog.ids_for_oracle(oracle_id).to_vec())
    }

    /// The first reasonable printing among `ids`, else the first of them.
    /// A placeholder when none is known.
    pub fn first_reasonable(&self, ids: &[String]) -> Result<Card, ServiceError> {
        let catalog = self.loaded()?;
        Ok(catalog.first_reasonable(ids).cloned().unwrap_or_else(|| {
            Self::get_placeholder_card(ids.first().map(String::as_str).unwrap_or(""))
        }))
    }

    /// The default printing to show for a card.
    ///
    /// `name` may be a plain name, a `"Name [set-number]"` full name, or a
    /// printing or oracle identifier. Printings are ordered by release date
    /// and collector number, newest first for `Printing::Recent`; the first
    /// reasonable one wins, else the first in that order. `None` when
    /// nothing matches.
    pub fn get_most_reasonable(
        &self,
        name: &str,
        printing: Printing,
    ) -> Result<Option<Card>, ServiceError> {
        let catalog = self.loaded()?;

        let mut ids = ids_from_name(&catalog, name);
        if ids.is_empty() {
            let Some(card) = resolve_id(&catalog, name) else {
                return Ok(None);
            };
            ids = ids_from_name(&catalog, &card.name);
        }

        let mut cards: Vec<&Card> = ids.iter().filter_map(|id| catalog.card(id)).collect();
        cards.sort_by(|a, b| {
            b.released_at
                .cmp(&a.released_at)
                .then_with(|| b.collector_number.cmp(&a.collector_number))
        });
        if printing == Printing::First {
            cards.reverse();
        }

        Ok(cards
            .iter()
            .find(|card| card.is_reasonable())
            .or_else(|| cards.first())
            .map(|card| (*card).clone()))
    }

    /// Display names starting with `prefix`, ignoring case and diacritics.
    pub fn autocomplete(&self, prefix: &str, limit: Option<usize>) -> Result<Vec<String>, ServiceError> {
        let catalog = self.loaded()?;
        let limit = limit.unwrap_or(self.autocomplete_limit);

        Ok(catalog
            .cardtree
            .words_with_prefix(&normalize(prefix), limit)
            .into_iter()
            .map(|key| display_name(&catalog, &key).unwrap_or(key))
            .collect())
    }

    /// Full names (`"Name [set-number]"`) starting with `prefix`.
    pub fn autocomplete_full_names(
        &self,
        prefix: &str,
        limit: Option<usize>,
    ) -> Result<Vec<String>, ServiceError> {
        let catalog = self.loaded()?;
        let limit = limit.unwrap_or(self.autocomplete_limit);

        Ok(catalog
            .full_names
            .words_with_prefix(&normalize(prefix), limit)
            .into_iter()
            .map(|key| display_full_name(&catalog, &key).unwrap_or(key))
            .collect())
    }

    /// Default images for a card name.
    pub fn card_image(&self, name: &str) -> Result<Option<CardImages>, ServiceError> {
        let catalog = self.loaded()?;
        Ok(catalog.cardimages.get(&normalize(name)).cloned())
    }

    /// Artwork for one printing by full name.
    pub fn image_entry(&self, full_name: &str) -> Result<Option<ImageEntry>, ServiceError> {
        let catalog = self.loaded()?;
        Ok(catalog.imagedict.get(&normalize(full_name)).cloned())
    }

    pub fn stats(&self) -> Result<CatalogStats, ServiceError> {
        Ok(self.loaded()?.stats())
    }

    pub fn get_placeholder_card(id: &str) -> Card {
        Card::placeholder(id)
    }

    pub fn normalized_name(card: &Card) -> &str {
        crate::normalize::normalized_name(card)
    }
}

fn resolve_id<'a>(catalog: &'a Catalog, id: &str) -> Option<&'a Card> {
    catalog
        .card(id)
        .or_else(|| catalog.first_reasonable(catalog.ids_for_oracle(id)))
}

fn ids_from_name(catalog: &Catalog, name: &str) -> Vec<String> {
    let Some(base) = split_full_name(name) else {
        return catalog.ids_for_key(&normalize(name)).to_vec();
    };

    let full_key = normalize(name);
    catalog
        .ids_for_key(&normalize(base))
        .iter()
        .filter(|id| {
            catalog
                .card(id)
                .is_some_and(|card| normalize(&card.full_name) == full_key)
        })
        .cloned()
        .collect()
}

/// Base name of a `"Name [set-number]"` string.
fn split_full_name(name: &str) -> Option<&str> {
    let trimmed = name.trim_end();
    if !trimmed.ends_with(']') {
        return None;
    }
    let open = trimmed.rfind(" [")?;
    let inner = &trimmed[open + 2..trimmed.len() - 1];
    if !inner.contains('-') {
        return None;
    }
    Some(&trimmed[..open])
}

fn display_name(catalog: &Catalog, key: &str) -> Option<String> {
    let id = catalog.ids_for_key(key).first()?;
    catalog.card(id).map(|card| card.name.clone())
}

fn display_full_name(catalog: &Catalog, full_key: &str) -> Option<String> {
    let base = split_full_name(full_key)?;
    catalog
        .ids_for_key(base)
        .iter()
        .filter_map(|id| catalog.card(id))
        .find(|card| normalize(&card.full_name) == full_key)
        .map(|card| card.full_name.clone())
}
