use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::{CatalogSource, CollectionStore};
use crate::connection::Connection;
use crate::error::{CollectionError, Result};
use crate::models::{Card, CardSet, Membership, Namespace, UserId};
use crate::sql_builder::SqlBuilder;

pub(crate) const CARD_COLUMNS: &[&str] = &[
    "cards.id",
    "cards.name",
    "cards.set_id",
    "cards.number",
    "cards.rarity",
    "cards.type",
    "cards.hp",
    "cards.image_url",
    "cards.description",
    "cards.attacks",
];

/// Map `cards` rows into [`Card`]s. The `attacks` column holds JSON text.
///
/// Rows that do not decode are logged and dropped.
pub(crate) fn rows_to_cards(rows: Vec<HashMap<String, serde_json::Value>>) -> Result<Vec<Card>> {
    Ok(rows.into_iter().filter_map(row_to_card).collect())
}

fn row_to_card(mut row: HashMap<String, serde_json::Value>) -> Option<Card> {
    let id = row
        .get("id")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let attacks = match row.remove("attacks") {
        Some(serde_json::Value::String(text)) if !text.trim().is_empty() => {
            match serde_json::from_str::<serde_json::Value>(&text) {
                Ok(value) => value,
                Err(e) => {
                    warn!(card_id = %id, error = %e, "skipping card with malformed attacks");
                    return None;
                }
            }
        }
        Some(value @ serde_json::Value::Array(_)) => value,
        _ => serde_json::Value::Array(Vec::new()),
    };
    row.insert("attacks".to_string(), attacks);

    let value = serde_json::Value::Object(row.into_iter().collect());
    match serde_json::from_value(value) {
        Ok(card) => Some(card),
        Err(e) => {
            warn!(card_id = %id, error = %e, "skipping malformed card row");
            None
        }
    }
}

impl Connection {
    /// Copy catalog sets and cards into the local tables.
    ///
    /// Existing ids are left untouched. Cards whose set is not described by
    /// `sets` or an existing row get a placeholder set named after its id,
    /// with the number of known cards as its total.
    ///
    /// Returns the number of `(sets, cards)` rows inserted.
    pub fn store_catalog(&self, sets: &[CardSet], cards: &[Card]) -> Result<(usize, usize)> {
        let raw = self.raw();
        raw.execute_batch("BEGIN TRANSACTION")?;

        let result = (|| -> Result<(usize, usize)> {
            let mut inserted_sets = 0;
            let mut set_stmt = raw.prepare(
                "INSERT OR IGNORE INTO card_sets \
                 (id, name, release_date, total_cards, image_url, description) \
                 VALUES (?, ?, ?, ?, ?, ?)",
            )?;
            for set in sets {
                inserted_sets += set_stmt.execute(duckdb::params![
                    set.id.as_str(),
                    set.name.as_str(),
                    set.release_date.as_str(),
                    set.total_cards,
                    set.image_url.as_str(),
                    set.description.as_deref(),
                ])?;
            }

            let mut inserted_cards = 0;
            let mut card_stmt = raw.prepare(
                "INSERT OR IGNORE INTO cards \
                 (id, name, set_id, number, rarity, type, hp, image_url, description, attacks) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )?;
            for card in cards {
                let attacks = serde_json::to_string(&card.attacks)?;
                inserted_cards += card_stmt.execute(duckdb::params![
                    card.id.as_str(),
                    card.name.as_str(),
                    card.set_id.as_str(),
                    card.number.as_str(),
                    card.rarity.as_str(),
                    card.type_field.as_str(),
                    card.hp,
                    card.image_url.as_deref(),
                    card.description.as_deref(),
                    attacks,
                ])?;
            }

            inserted_sets += raw.execute(
                "INSERT OR IGNORE INTO card_sets (id, name, release_date, total_cards, image_url) \
                 SELECT set_id, set_id, '', COUNT(*), '' FROM cards \
                 WHERE set_id NOT IN (SELECT id FROM card_sets) \
                 GROUP BY set_id",
                duckdb::params![],
            )?;

            Ok((inserted_sets, inserted_cards))
        })();

        match result {
            Ok(counts) => {
                raw.execute_batch("COMMIT")?;
                debug!(sets = counts.0, cards = counts.1, "stored catalog rows");
                Ok(counts)
            }
            Err(e) => {
                let _ = raw.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }
}

impl CatalogSource for Connection {
    fn fetch_catalog(&self) -> Result<Vec<Card>> {
        let (sql, params) = SqlBuilder::new("cards")
            .select(CARD_COLUMNS)
            .order_by(&["cards.set_id", "cards.id"])
            .build();
        let rows = self
            .execute(&sql, &params)
            .map_err(|e| CollectionError::CatalogUnavailable(e.to_string()))?;
        rows_to_cards(rows)
    }
}

impl CollectionStore for Connection {
    fn fetch_membership(&self, user: &UserId, namespace: Namespace) -> Result<HashSet<String>> {
        let (sql, params) = SqlBuilder::new(namespace.table())
            .select(&["card_id"])
            .where_eq("user_id", user.as_str())
            .build();
        let rows = self
            .execute(&sql, &params)
            .map_err(|e| CollectionError::MembershipFetchFailed(e.to_string()))?;

        Ok(rows
            .into_iter()
            .filter_map(|mut r| match r.remove("card_id") {
                Some(serde_json::Value::String(id)) => Some(id),
                _ => None,
            })
            .collect())
    }

    fn insert_membership(&self, membership: &Membership) -> Result<()> {
        let sql = format!(
            "INSERT OR IGNORE INTO {} (user_id, card_id, acquired_at) VALUES (?, ?, ?)",
            membership.namespace.table()
        );
        self.raw()
            .execute(
                &sql,
                duckdb::params![
                    membership.user_id.as_str(),
                    membership.card_id.as_str(),
                    membership.acquired_at.timestamp_millis(),
                ],
            )
            .map_err(|e| CollectionError::MembershipInsertFailed {
                card_id: membership.card_id.clone(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    fn remove_membership(
        &self,
        user: &UserId,
        card_id: &str,
        namespace: Namespace,
    ) -> Result<bool> {
        if namespace == Namespace::Game {
            return Err(CollectionError::ReadOnlyNamespace(namespace));
        }
        let sql = format!(
            "DELETE FROM {} WHERE user_id = ? AND card_id = ?",
            namespace.table()
        );
        let removed = self.execute_update(&sql, &[user.to_string(), card_id.to_string()])?;
        Ok(removed > 0)
    }
}

/// Decode an `acquired_at` column (epoch milliseconds).
pub(crate) fn millis_to_datetime(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    value.as_i64().and_then(DateTime::from_timestamp_millis)
}
