use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Card — Immutable catalog entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub set_id: String,
    /// Collector number, e.g. `"11"` or `"11/202"`.
    pub number: String,
    pub rarity: String,
    #[serde(rename = "type")]
    pub type_field: String,
    pub hp: Option<i64>,
    pub image_url: Option<String>,
    /// Flavor text.
    pub description: Option<String>,
    #[serde(default)]
    pub attacks: Vec<Attack>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    pub name: String,
    #[serde(default)]
    pub cost: Vec<String>,
    /// Damage as printed. May carry suffixes such as `"+"` or `"×2"`.
    #[serde(default)]
    pub damage: String,
    #[serde(default)]
    pub text: String,
}

// ---------------------------------------------------------------------------
// OwnedCard — A card annotated with its post-condition ownership state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedCard {
    #[serde(flatten)]
    pub card: Card,
    pub owned: bool,
    /// True when this request recorded the membership.
    #[serde(default)]
    pub newly_granted: bool,
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Sort orders offered for card listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    NumberAsc,
    NumberDesc,
    NameAsc,
    NameDesc,
    /// Highest tier first; unclassified rarities last.
    Rarity,
}

/// Compare collector numbers with numeric collation.
///
/// Runs of ASCII digits compare by value, everything else compares
/// character by character, so `"2" < "10"` and `"4/102" < "10/102"`.
pub fn compare_collector_numbers(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let ln = take_number(&mut left);
                let rn = take_number(&mut right);
                match ln.cmp(&rn) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            (Some(l), Some(r)) => {
                left.next();
                right.next();
                match l.cmp(&r) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
        }
    }
}

fn take_number<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>) -> u64 {
    let mut n: u64 = 0;
    while let Some(c) = chars.peek().copied() {
        match c.to_digit(10) {
            Some(d) => {
                n = n.saturating_mul(10).saturating_add(d as u64);
                chars.next();
            }
            None => break,
        }
    }
    n
}

/// Sort cards in place by the given order.
pub fn sort_cards(cards: &mut [Card], order: SortOrder) {
    use crate::booster::rarity::rarity_rank;

    match order {
        SortOrder::NumberAsc => cards.sort_by(|a, b| compare_collector_numbers(&a.number, &b.number)),
        SortOrder::NumberDesc => cards.sort_by(|a, b| compare_collector_numbers(&b.number, &a.number)),
        SortOrder::NameAsc => cards.sort_by(|a, b| a.name.cmp(&b.name)),
        SortOrder::NameDesc => cards.sort_by(|a, b| b.name.cmp(&a.name)),
        SortOrder::Rarity => cards.sort_by(|a, b| {
            rarity_rank(&b.rarity)
                .cmp(&rarity_rank(&a.rarity))
                .then_with(|| compare_collector_numbers(&a.number, &b.number))
        }),
    }
}
