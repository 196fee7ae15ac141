//! Rarity label classification.
//!
//! Maps the free-form rarity label printed on a card to the tier used for
//! booster slot selection. Matching is exact and case-sensitive; labels
//! outside the table are a normal case and classify to `None`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rarity tiers used to partition the catalog.
///
/// `RareHolo`, `UltraRare` and `HyperRare` together form the rare-plus bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RarityTier {
    Common,
    Uncommon,
    RareHolo,
    UltraRare,
    HyperRare,
}

impl RarityTier {
    /// Whether this tier belongs to the rare-plus bucket.
    pub fn is_rare_plus(&self) -> bool {
        matches!(
            self,
            RarityTier::RareHolo | RarityTier::UltraRare | RarityTier::HyperRare
        )
    }
}

impl fmt::Display for RarityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RarityTier::Common => "common",
            RarityTier::Uncommon => "uncommon",
            RarityTier::RareHolo => "rare holo",
            RarityTier::UltraRare => "ultra rare",
            RarityTier::HyperRare => "hyper rare",
        };
        f.write_str(name)
    }
}

const COMMON_LABELS: &[&str] = &["Common", "Promo"];

const UNCOMMON_LABELS: &[&str] = &["Uncommon", "Rare"];

const RARE_HOLO_LABELS: &[&str] = &[
    "Rare Holo",
    "Rare Holo EX",
    "Rare Holo GX",
    "Rare Holo V",
    "Rare Holo VSTAR",
    "Rare Holo VMAX",
    "Rare BREAK",
    "Rare Prime",
    "Rare Ultra",
    "Rare Shiny",
    "Rare Shiny GX",
    "Trainer Gallery Rare Holo",
];

const ULTRA_RARE_LABELS: &[&str] = &[
    "Ultra Rare",
    "Rare Rainbow",
    "Rare Holo Star",
    "Rare Holo LV.X",
    "Rare Prism Star",
    "Rare Secret",
    "Rare Shining",
    "Rare ACE",
    "ACE SPEC Rare",
    "Double Rare",
    "Amazing Rare",
    "Radiant Rare",
];

const HYPER_RARE_LABELS: &[&str] = &[
    "Hyper Rare",
    "Special Illustration Rare",
    "Illustration Rare",
    "Shiny Ultra Rare",
    "LEGEND",
    "Classic Collection",
];

/// Classify a rarity label. Unknown labels return `None`.
pub fn classify(label: &str) -> Option<RarityTier> {
    let tables: [(&[&str], RarityTier); 5] = [
        (COMMON_LABELS, RarityTier::Common),
        (UNCOMMON_LABELS, RarityTier::Uncommon),
        (RARE_HOLO_LABELS, RarityTier::RareHolo),
        (ULTRA_RARE_LABELS, RarityTier::UltraRare),
        (HYPER_RARE_LABELS, RarityTier::HyperRare),
    ];

    tables
        .iter()
        .find(|(labels, _)| labels.contains(&label))
        .map(|(_, tier)| *tier)
}

/// Sort key for a rarity label: higher is rarer, `0` for unclassified labels.
pub fn rarity_rank(label: &str) -> u8 {
    match classify(label) {
        Some(RarityTier::Common) => 1,
        Some(RarityTier::Uncommon) => 2,
        Some(RarityTier::RareHolo) => 3,
        Some(RarityTier::UltraRare) => 4,
        Some(RarityTier::HyperRare) => 5,
        None => 0,
    }
}
