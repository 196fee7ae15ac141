//! Pack-opening request pipeline.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::draw::{draw_hand, DrawConfig};
use super::pools::Pools;
use super::reconcile::reconcile;
use crate::error::{CollectionError, Result};
use crate::models::{OwnedCard, UserId};
use crate::store::{CatalogSource, CollectionStore};

/// Stages of a single pack-opening request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawPhase {
    Idle,
    PoolBuilding,
    Drawing,
    Reconciling,
    Complete,
}

impl fmt::Display for DrawPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DrawPhase::Idle => "idle",
            DrawPhase::PoolBuilding => "pool-building",
            DrawPhase::Drawing => "drawing",
            DrawPhase::Reconciling => "reconciling",
            DrawPhase::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// The annotated result of opening one pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenedPack {
    pub cards: Vec<OwnedCard>,
}

impl OpenedPack {
    /// Cards recorded in the game collection by this pack.
    pub fn new_cards(&self) -> impl Iterator<Item = &OwnedCard> {
        self.cards.iter().filter(|c| c.newly_granted)
    }

    /// Number of distinct cards this pack added to the collection.
    pub fn granted_count(&self) -> usize {
        let mut ids: Vec<&str> = self.new_cards().map(|c| c.card.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Opens booster packs for a user: fetches the catalog, draws a hand and
/// records new cards in the user's game collection.
///
/// Only a catalog failure fails the request; store problems are folded into
/// the per-card `owned` flags.
pub struct BoosterGame<'a> {
    catalog: &'a dyn CatalogSource,
    store: &'a dyn CollectionStore,
    config: DrawConfig,
}

impl<'a> BoosterGame<'a> {
    /// Create a game with the default slot plan.
    pub fn new(catalog: &'a dyn CatalogSource, store: &'a dyn CollectionStore) -> Self {
        Self::with_config(catalog, store, DrawConfig::default())
    }

    pub fn with_config(
        catalog: &'a dyn CatalogSource,
        store: &'a dyn CollectionStore,
        config: DrawConfig,
    ) -> Self {
        Self {
            catalog,
            store,
            config,
        }
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    /// Open one pack using the thread-local RNG and the current time.
    pub fn open_pack(&self, user: &UserId) -> Result<OpenedPack> {
        self.open_pack_with(user, &mut rand::thread_rng(), Utc::now())
    }

    /// Open one pack with an explicit RNG and grant timestamp.
    pub fn open_pack_with<R: Rng + ?Sized>(
        &self,
        user: &UserId,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<OpenedPack> {
        let mut phase = DrawPhase::Idle;
        debug!(user_id = %user, %phase, "opening pack");

        let catalog = self.catalog.fetch_catalog().map_err(|e| match e {
            CollectionError::CatalogUnavailable(_) => e,
            other => CollectionError::CatalogUnavailable(other.to_string()),
        })?;

        phase = DrawPhase::PoolBuilding;
        debug!(user_id = %user, %phase, catalog_size = catalog.len());
        let pools = Pools::build(&catalog);

        phase = DrawPhase::Drawing;
        debug!(user_id = %user, %phase, classified = pools.len());
        let hand = draw_hand(&pools, &catalog, &self.config, rng);

        phase = DrawPhase::Reconciling;
        debug!(user_id = %user, %phase, hand_size = hand.len());
        let cards = reconcile(self.store, user, hand, now);

        phase = DrawPhase::Complete;
        let pack = OpenedPack { cards };
        info!(
            user_id = %user,
            %phase,
            cards = pack.len(),
            granted = pack.granted_count(),
            "pack opened"
        );

        Ok(pack)
    }

    /// Open `packs` packs one after another. Each pack is reconciled against
    /// the collection left by the previous one.
    pub fn open_packs(&self, user: &UserId, packs: usize) -> Result<Vec<OpenedPack>> {
        let mut opened = Vec::with_capacity(packs);
        for _ in 0..packs {
            opened.push(self.open_pack(user)?);
        }
        Ok(opened)
    }
}
