//! Weighted hand drawing.
//!
//! Fills a fixed slot plan (commons, uncommons, one rare-plus slot) by
//! uniform picks from the tier pools, then tops the hand up from the whole
//! catalog when a pool could not supply its slot.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use tracing::debug;

use super::pools::Pools;
use super::rarity::RarityTier;
use crate::config;
use crate::models::Card;

/// Selection weights of the rare-plus sub-tiers, walked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RarePlusWeights {
    pub rare_holo: f64,
    pub ultra_rare: f64,
    pub hyper_rare: f64,
}

impl Default for RarePlusWeights {
    fn default() -> Self {
        Self {
            rare_holo: config::RARE_HOLO_WEIGHT,
            ultra_rare: config::ULTRA_RARE_WEIGHT,
            hyper_rare: config::HYPER_RARE_WEIGHT,
        }
    }
}

impl RarePlusWeights {
    fn ordered(&self) -> [(RarityTier, f64); 3] {
        [
            (RarityTier::RareHolo, self.rare_holo),
            (RarityTier::UltraRare, self.ultra_rare),
            (RarityTier::HyperRare, self.hyper_rare),
        ]
    }
}

/// Whether one card may occupy more than one slot of the same hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Every slot draws from its full pool, so repeats can happen.
    #[default]
    Allow,
    /// Cards already in the hand are excluded from later picks.
    Forbid,
}

/// Slot plan and sampling rules for one pack.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawConfig {
    pub hand_size: usize,
    pub common_slots: usize,
    pub uncommon_slots: usize,
    pub rare_plus_slots: usize,
    pub rare_plus_weights: RarePlusWeights,
    pub duplicates: DuplicatePolicy,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            hand_size: config::HAND_SIZE,
            common_slots: config::COMMON_SLOTS,
            uncommon_slots: config::UNCOMMON_SLOTS,
            rare_plus_slots: config::RARE_PLUS_SLOTS,
            rare_plus_weights: RarePlusWeights::default(),
            duplicates: DuplicatePolicy::Allow,
        }
    }
}

/// Pick a rare-plus sub-tier.
///
/// Rolls `r` in `[0, 1)` and returns the first sub-tier whose cumulative
/// weight reaches `r`. If rounding leaves every cumulative weight below `r`,
/// the last sub-tier (`HyperRare`) is returned.
pub fn pick_rare_plus_tier<R: Rng + ?Sized>(weights: &RarePlusWeights, rng: &mut R) -> RarityTier {
    let roll: f64 = rng.gen();
    let mut cumulative = 0.0;

    for (tier, weight) in weights.ordered() {
        cumulative += weight;
        if cumulative >= roll {
            return tier;
        }
    }

    RarityTier::HyperRare
}

/// Draw one hand from pre-built pools.
///
/// The slot plan runs first; a slot whose pool is empty is skipped. The hand
/// is then filled from `catalog`, preferring cards not yet in the hand. The
/// result is shorter than `hand_size` only when the catalog is empty, or
/// under [`DuplicatePolicy::Forbid`] when it has too few distinct cards.
pub fn draw_hand<R: Rng + ?Sized>(
    pools: &Pools<'_>,
    catalog: &[Card],
    config: &DrawConfig,
    rng: &mut R,
) -> Vec<Card> {
    let mut hand: Vec<&Card> = Vec::with_capacity(config.hand_size);

    for _ in 0..config.common_slots {
        let picked = pick_from_pool(&pools.common, &hand, config.duplicates, rng);
        push_slot(&mut hand, config, picked);
    }

    for _ in 0..config.uncommon_slots {
        let picked = pick_from_pool(&pools.uncommon, &hand, config.duplicates, rng);
        push_slot(&mut hand, config, picked);
    }

    for _ in 0..config.rare_plus_slots {
        let tier = pick_rare_plus_tier(&config.rare_plus_weights, rng);
        let pool = pools.get(tier);
        if pool.is_empty() {
            debug!(%tier, "rare-plus pool empty, slot left to fallback");
            continue;
        }
        let picked = pick_from_pool(pool, &hand, config.duplicates, rng);
        push_slot(&mut hand, config, picked);
    }

    let planned = hand.len();
    while hand.len() < config.hand_size {
        match pick_fallback(catalog, &hand, config.duplicates, rng) {
            Some(card) => hand.push(card),
            None => break,
        }
    }

    if hand.len() > planned {
        debug!(filled = hand.len() - planned, "fallback fill used");
    }

    hand.into_iter().cloned().collect()
}

/// Build pools from `catalog` and draw one hand using the thread-local RNG.
pub fn draw_from_catalog(catalog: &[Card], config: &DrawConfig) -> Vec<Card> {
    let pools = Pools::build(catalog);
    draw_hand(&pools, catalog, config, &mut rand::thread_rng())
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn push_slot<'a>(hand: &mut Vec<&'a Card>, config: &DrawConfig, card: Option<&'a Card>) {
    if hand.len() >= config.hand_size {
        return;
    }
    if let Some(card) = card {
        hand.push(card);
    }
}

fn pick_from_pool<'a, R: Rng + ?Sized>(
    pool: &[&'a Card],
    hand: &[&Card],
    policy: DuplicatePolicy,
    rng: &mut R,
) -> Option<&'a Card> {
    match policy {
        DuplicatePolicy::Allow => pool.choose(rng).copied(),
        DuplicatePolicy::Forbid => {
            let taken = ids_in(hand);
            let candidates: Vec<&'a Card> = pool
                .iter()
                .copied()
                .filter(|c| !taken.contains(c.id.as_str()))
                .collect();
            candidates.choose(rng).copied()
        }
    }
}

fn pick_fallback<'a, R: Rng + ?Sized>(
    catalog: &'a [Card],
    hand: &[&Card],
    policy: DuplicatePolicy,
    rng: &mut R,
) -> Option<&'a Card> {
    let taken = ids_in(hand);
    let unselected: Vec<&'a Card> = catalog
        .iter()
        .filter(|c| !taken.contains(c.id.as_str()))
        .collect();

    if let Some(card) = unselected.choose(rng) {
        return Some(*card);
    }

    match policy {
        DuplicatePolicy::Allow => catalog.choose(rng),
        DuplicatePolicy::Forbid => None,
    }
}

fn ids_in<'h>(hand: &[&'h Card]) -> HashSet<&'h str> {
    hand.iter().map(|c| c.id.as_str()).collect()
}
