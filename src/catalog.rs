//! Card catalog served by the remote card API.
//!
//! [`RemoteCatalog`] walks the paginated `/cards` listing, maps each entry
//! into a [`Card`] and de-duplicates by id. A successful fetch refreshes the
//! gzip snapshot; a failed or offline fetch falls back to it.
//!
//! [`RemoteCatalog::mirror_into`] copies a loaded catalog into the local
//! `cards` and `card_sets` tables.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::cache::CacheManager;
use crate::connection::Connection;
use crate::error::{CollectionError, Result};
use crate::models::{Attack, Card, CardSet};
use crate::store::CatalogSource;

// ---------------------------------------------------------------------------
// Remote card shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteCard {
    id: String,
    name: String,
    #[serde(default)]
    number: String,
    #[serde(default)]
    rarity: Option<String>,
    #[serde(default)]
    supertype: Option<String>,
    #[serde(default)]
    types: Vec<String>,
    /// The API prints HP as a string.
    #[serde(default)]
    hp: Option<String>,
    #[serde(default)]
    flavor_text: Option<String>,
    #[serde(default)]
    attacks: Vec<RemoteAttack>,
    #[serde(default)]
    images: Option<RemoteImages>,
    set: RemoteSetRef,
}

#[derive(Debug, Deserialize)]
struct RemoteAttack {
    name: String,
    #[serde(default)]
    cost: Vec<String>,
    #[serde(default)]
    damage: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct RemoteImages {
    small: Option<String>,
    large: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteSetRef {
    id: String,
    #[serde(default)]
    name: Option<String>,
    /// Printed as `YYYY/MM/DD`.
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    total: Option<i64>,
    #[serde(default)]
    printed_total: Option<i64>,
    #[serde(default)]
    images: Option<RemoteSetImages>,
}

#[derive(Debug, Deserialize)]
struct RemoteSetImages {
    logo: Option<String>,
    symbol: Option<String>,
}

impl RemoteSetRef {
    /// Set metadata, when the entry carries enough of it.
    fn to_card_set(&self) -> Option<CardSet> {
        let name = self.name.clone()?;
        Some(CardSet {
            id: self.id.clone(),
            name,
            release_date: self
                .release_date
                .as_deref()
                .map(|d| d.replace('/', "-"))
                .unwrap_or_default(),
            total_cards: self.printed_total.or(self.total).unwrap_or(0),
            image_url: self
                .images
                .as_ref()
                .and_then(|i| i.logo.clone().or_else(|| i.symbol.clone()))
                .unwrap_or_default(),
            description: None,
        })
    }
}

impl From<RemoteCard> for Card {
    fn from(remote: RemoteCard) -> Self {
        let type_field = remote
            .types
            .into_iter()
            .next()
            .or(remote.supertype)
            .unwrap_or_default();
        let image_url = remote.images.and_then(|i| i.small.or(i.large));

        Card {
            id: remote.id,
            name: remote.name,
            set_id: remote.set.id,
            number: remote.number,
            rarity: remote.rarity.unwrap_or_default(),
            type_field,
            hp: remote.hp.and_then(|hp| hp.trim().parse().ok()),
            image_url,
            description: remote.flavor_text,
            attacks: remote
                .attacks
                .into_iter()
                .map(|a| Attack {
                    name: a.name,
                    cost: a.cost,
                    damage: a.damage,
                    text: a.text,
                })
                .collect(),
        }
    }
}

/// Map raw page entries into cards, skipping ids already in `seen`, and
/// record the set metadata they carry.
///
/// Entries that do not parse are logged and dropped.
fn collect_page(
    data: Vec<serde_json::Value>,
    seen: &mut HashSet<String>,
    out: &mut Vec<Card>,
    sets: &mut BTreeMap<String, CardSet>,
) {
    for value in data {
        match serde_json::from_value::<RemoteCard>(value) {
            Ok(remote) => {
                if !sets.contains_key(&remote.set.id) {
                    if let Some(set) = remote.set.to_card_set() {
                        sets.insert(set.id.clone(), set);
                    }
                }
                if seen.insert(remote.id.clone()) {
                    out.push(remote.into());
                }
            }
            Err(e) => warn!(error = %e, "skipping malformed catalog entry"),
        }
    }
}

// ---------------------------------------------------------------------------
// RemoteCatalog
// ---------------------------------------------------------------------------

/// [`CatalogSource`] backed by the card API with a snapshot fallback.
///
/// The fetched catalog is kept in memory; call [`refresh`](Self::refresh)
/// to re-download.
#[derive(Debug)]
pub struct RemoteCatalog {
    cache: RefCell<CacheManager>,
    page_size: usize,
    cards: RefCell<Option<Vec<Card>>>,
    /// Set metadata seen in the last online fetch. Empty after a snapshot load.
    sets: RefCell<Vec<CardSet>>,
    mirrored: Cell<bool>,
}

impl RemoteCatalog {
    pub fn new(cache: CacheManager, page_size: usize) -> Self {
        Self {
            cache: RefCell::new(cache),
            page_size: page_size.max(1),
            cards: RefCell::new(None),
            sets: RefCell::new(Vec::new()),
            mirrored: Cell::new(false),
        }
    }

    /// Base URL of the card API.
    pub fn api_base(&self) -> String {
        self.cache.borrow().api_base().to_string()
    }

    /// Set metadata from the last online fetch.
    pub fn sets(&self) -> Vec<CardSet> {
        self.sets.borrow().clone()
    }

    /// Drop the in-memory catalog and fetch it again.
    pub fn refresh(&self) -> Result<Vec<Card>> {
        self.cards.borrow_mut().take();
        self.fetch_catalog()
    }

    /// Copy the loaded catalog into the local tables, once per load.
    pub fn mirror_into(&self, conn: &Connection, cards: &[Card]) -> Result<()> {
        if self.mirrored.get() {
            return Ok(());
        }
        let (sets, inserted) = conn.store_catalog(&self.sets.borrow(), cards)?;
        self.mirrored.set(true);
        info!(sets, cards = inserted, "mirrored catalog into local tables");
        Ok(())
    }

    /// Walk every page of the listing.
    ///
    /// Stops once `totalCount` entries have been read, or on the first empty
    /// page when the listing does not report a total.
    fn fetch_remote(&self) -> Result<(Vec<CardSet>, Vec<Card>)> {
        let mut cache = self.cache.borrow_mut();
        let mut seen = HashSet::new();
        let mut cards = Vec::new();
        let mut sets = BTreeMap::new();
        let mut page = 1;
        let mut fetched = 0;

        loop {
            let envelope = cache.fetch_page(page, self.page_size)?;
            let received = envelope.data.len();
            fetched += received;
            collect_page(envelope.data, &mut seen, &mut cards, &mut sets);

            if received == 0 || (envelope.total_count > 0 && fetched >= envelope.total_count) {
                break;
            }
            page += 1;
        }

        debug!(pages = page, cards = cards.len(), "fetched remote catalog");
        Ok((sets.into_values().collect(), cards))
    }

    fn load(&self) -> Result<Vec<Card>> {
        self.mirrored.set(false);
        match self.fetch_remote() {
            Ok((sets, cards)) => {
                *self.sets.borrow_mut() = sets;
                if let Err(e) = self.cache.borrow().save_snapshot(&cards) {
                    warn!(error = %e, "failed to save catalog snapshot");
                }
                Ok(cards)
            }
            Err(fetch_err) => {
                info!(error = %fetch_err, "catalog fetch failed, using snapshot");
                self.sets.borrow_mut().clear();
                match self.cache.borrow().load_snapshot() {
                    Ok(Some(cards)) => Ok(cards),
                    Ok(None) => Err(CollectionError::CatalogUnavailable(format!(
                        "no catalog snapshot and fetch failed: {}",
                        fetch_err
                    ))),
                    Err(e) => Err(CollectionError::CatalogUnavailable(e.to_string())),
                }
            }
        }
    }
}

impl CatalogSource for RemoteCatalog {
    fn fetch_catalog(&self) -> Result<Vec<Card>> {
        if let Some(cards) = self.cards.borrow().as_ref() {
            return Ok(cards.clone());
        }
        let cards = self.load()?;
        *self.cards.borrow_mut() = Some(cards.clone());
        Ok(cards)
    }
}
