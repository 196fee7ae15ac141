//! Booster pack game.
//!
//! Partitions the card catalog into rarity pools, draws a five-card hand
//! (three commons, one uncommon, one weighted rare-plus slot, with fallback
//! fill from the whole catalog) and records new cards in the user's game
//! collection.

pub mod draw;
pub mod game;
pub mod pools;
pub mod rarity;
pub mod reconcile;

pub use draw::{
    draw_from_catalog, draw_hand, pick_rare_plus_tier, DrawConfig, DuplicatePolicy,
    RarePlusWeights,
};
pub use game::{BoosterGame, DrawPhase, OpenedPack};
pub use pools::{Pools, RarePlusPools};
pub use rarity::{classify, RarityTier};
pub use reconcile::reconcile;
