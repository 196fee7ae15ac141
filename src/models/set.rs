use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CardSet — Immutable set metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSet {
    pub id: String,
    pub name: String,
    pub release_date: String,
    /// Declared size of the set, as printed.
    pub total_cards: i64,
    pub image_url: String,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// SetProgress — Collection completion for one set
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetProgress {
    pub set_id: String,
    pub collected: usize,
    pub total: usize,
}

impl SetProgress {
    /// Completion percentage rounded to the nearest integer, `0` when `total` is 0.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.collected as f64 / self.total as f64) * 100.0).round() as u32
    }
}
