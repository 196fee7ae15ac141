//! Catalog partitioning into rarity pools.

use super::rarity::{classify, RarityTier};
use crate::models::Card;

/// Sub-pools of the rare-plus bucket.
#[derive(Debug, Clone, Default)]
pub struct RarePlusPools<'a> {
    pub rare_holo: Vec<&'a Card>,
    pub ultra_rare: Vec<&'a Card>,
    pub hyper_rare: Vec<&'a Card>,
}

impl<'a> RarePlusPools<'a> {
    /// Pool for one rare-plus sub-tier. Non rare-plus tiers have no pool here.
    pub fn get(&self, tier: RarityTier) -> Option<&[&'a Card]> {
        match tier {
            RarityTier::RareHolo => Some(self.rare_holo.as_slice()),
            RarityTier::UltraRare => Some(self.ultra_rare.as_slice()),
            RarityTier::HyperRare => Some(self.hyper_rare.as_slice()),
            RarityTier::Common | RarityTier::Uncommon => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rare_holo.is_empty() && self.ultra_rare.is_empty() && self.hyper_rare.is_empty()
    }
}

/// Disjoint card pools keyed by rarity tier.
///
/// Every catalog card lands in at most one pool. Cards whose rarity label is
/// unclassified are left out and only reachable through fallback fill.
#[derive(Debug, Clone, Default)]
pub struct Pools<'a> {
    pub common: Vec<&'a Card>,
    pub uncommon: Vec<&'a Card>,
    pub rare_plus: RarePlusPools<'a>,
}

impl<'a> Pools<'a> {
    /// Partition a catalog in a single pass.
    pub fn build(catalog: &'a [Card]) -> Self {
        let mut pools = Pools::default();
        for card in catalog {
            match classify(&card.rarity) {
                Some(RarityTier::Common) => pools.common.push(card),
                Some(RarityTier::Uncommon) => pools.uncommon.push(card),
                Some(RarityTier::RareHolo) => pools.rare_plus.rare_holo.push(card),
                Some(RarityTier::UltraRare) => pools.rare_plus.ultra_rare.push(card),
                Some(RarityTier::HyperRare) => pools.rare_plus.hyper_rare.push(card),
                None => {}
            }
        }
        pools
    }

    /// Pool for any tier.
    pub fn get(&self, tier: RarityTier) -> &[&'a Card] {
        match tier {
            RarityTier::Common => &self.common,
            RarityTier::Uncommon => &self.uncommon,
            RarityTier::RareHolo => &self.rare_plus.rare_holo,
            RarityTier::UltraRare => &self.rare_plus.ultra_rare,
            RarityTier::HyperRare => &self.rare_plus.hyper_rare,
        }
    }

    /// Total number of classified cards.
    pub fn len(&self) -> usize {
        self.common.len()
            + self.uncommon.len()
            + self.rare_plus.rare_holo.len()
            + self.rare_plus.ultra_rare.len()
            + self.rare_plus.hyper_rare.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
