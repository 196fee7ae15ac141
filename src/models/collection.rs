use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque user identity as issued by the surrounding application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Namespace
// ---------------------------------------------------------------------------

/// Independent membership scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    /// Physical collection, toggled by the user.
    Manual,
    /// Populated by booster pack draws. Append-only.
    Game,
}

impl Namespace {
    /// Backing table for this namespace.
    pub fn table(&self) -> &'static str {
        match self {
            Namespace::Manual => "user_collections",
            Namespace::Game => "game_collections",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Manual => "manual",
            Namespace::Game => "game",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: UserId,
    pub card_id: String,
    pub namespace: Namespace,
    pub acquired_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(
        user_id: &UserId,
        card_id: impl Into<String>,
        namespace: Namespace,
        acquired_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.clone(),
            card_id: card_id.into(),
            namespace,
            acquired_at,
        }
    }
}
