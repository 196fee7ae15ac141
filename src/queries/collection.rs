//! Per-user collection queries over the `user_collections` and
//! `game_collections` tables.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use tracing::debug;

use crate::connection::Connection;
use crate::error::{CollectionError, Result};
use crate::models::{sort_cards, Card, CardSet, Membership, Namespace, SetProgress, SortOrder, UserId};
use crate::sql_builder::SqlBuilder;
use crate::store::database::{millis_to_datetime, rows_to_cards, CARD_COLUMNS};
use crate::store::CollectionStore;

/// Query and mutation interface for a user's collection in either namespace.
pub struct CollectionQuery<'a> {
    conn: &'a Connection,
}

impl<'a> CollectionQuery<'a> {
    /// Create a new `CollectionQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Card ids owned by `user` in `namespace`.
    pub fn owned_ids(&self, user: &UserId, namespace: Namespace) -> Result<HashSet<String>> {
        self.conn.fetch_membership(user, namespace)
    }

    /// Whether `user` owns `card_id` in `namespace`.
    pub fn contains(&self, user: &UserId, card_id: &str, namespace: Namespace) -> Result<bool> {
        let (sql, params) = SqlBuilder::new(namespace.table())
            .select(&["COUNT(*) AS cnt"])
            .where_eq("user_id", user.as_str())
            .where_eq("card_id", card_id)
            .build();

        let cnt = self
            .conn
            .execute_scalar(&sql, &params)?
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        Ok(cnt > 0)
    }

    /// Number of distinct cards `user` owns in `namespace`.
    pub fn count(&self, user: &UserId, namespace: Namespace) -> Result<i64> {
        let (sql, params) = SqlBuilder::new(namespace.table())
            .select(&["COUNT(*) AS cnt"])
            .where_eq("user_id", user.as_str())
            .build();

        let cnt = self
            .conn
            .execute_scalar(&sql, &params)?
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        Ok(cnt)
    }

    /// Membership records of `user` in `namespace`, oldest first.
    pub fn memberships(&self, user: &UserId, namespace: Namespace) -> Result<Vec<Membership>> {
        let (sql, params) = SqlBuilder::new(namespace.table())
            .select(&["card_id", "acquired_at"])
            .where_eq("user_id", user.as_str())
            .order_by(&["acquired_at", "card_id"])
            .build();

        let rows = self.conn.execute(&sql, &params)?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let card_id = match row.get("card_id").and_then(|v| v.as_str()) {
                Some(id) => id.to_string(),
                None => continue,
            };
            let acquired_at = row
                .get("acquired_at")
                .and_then(millis_to_datetime)
                .ok_or_else(|| {
                    CollectionError::InvalidArgument(format!(
                        "membership {} has no valid acquired_at",
                        card_id
                    ))
                })?;
            out.push(Membership::new(user, card_id, namespace, acquired_at));
        }
        Ok(out)
    }

    /// Full catalog rows for every card `user` owns in `namespace`,
    /// ordered by set and card id.
    pub fn owned_cards(&self, user: &UserId, namespace: Namespace) -> Result<Vec<Card>> {
        let table = namespace.table();
        let (sql, params) = SqlBuilder::new(table)
            .select(CARD_COLUMNS)
            .join(&format!("JOIN cards ON cards.id = {}.card_id", table))
            .where_eq(&format!("{}.user_id", table), user.as_str())
            .order_by(&["cards.set_id", "cards.id"])
            .build();

        rows_to_cards(self.conn.execute(&sql, &params)?)
    }

    /// Owned cards whose name contains `query` (case-insensitive) or whose
    /// collector number contains it, in `order`. An empty query matches all.
    pub fn search_owned(
        &self,
        user: &UserId,
        namespace: Namespace,
        query: &str,
        order: SortOrder,
    ) -> Result<Vec<Card>> {
        let needle = query.to_lowercase();
        let mut cards: Vec<Card> = self
            .owned_cards(user, namespace)?
            .into_iter()
            .filter(|c| c.name.to_lowercase().contains(&needle) || c.number.contains(query))
            .collect();
        sort_cards(&mut cards, order);
        Ok(cards)
    }

    /// [`search_owned`](Self::search_owned) grouped by set, newest release
    /// first. Sets without a matching card are left out.
    pub fn owned_by_set(
        &self,
        user: &UserId,
        namespace: Namespace,
        query: &str,
        order: SortOrder,
    ) -> Result<Vec<(CardSet, Vec<Card>)>> {
        let mut by_set: HashMap<String, Vec<Card>> = HashMap::new();
        for card in self.search_owned(user, namespace, query, order)? {
            by_set.entry(card.set_id.clone()).or_default().push(card);
        }
        if by_set.is_empty() {
            return Ok(Vec::new());
        }

        let set_ids: Vec<&str> = by_set.keys().map(String::as_str).collect();
        let (sql, params) = SqlBuilder::new("card_sets")
            .where_in("id", &set_ids)
            .order_by(&["release_date DESC", "id"])
            .build();
        let sets: Vec<CardSet> = self.conn.execute_into(&sql, &params)?;

        Ok(sets
            .into_iter()
            .filter_map(|set| by_set.remove(&set.id).map(|cards| (set, cards)))
            .collect())
    }

    // -----------------------------------------------------------------------
    // Progress
    // -----------------------------------------------------------------------

    /// Completion of one set against its declared card total.
    ///
    /// An unknown set reports `0 / 0`.
    pub fn set_progress(
        &self,
        user: &UserId,
        namespace: Namespace,
        set_id: &str,
    ) -> Result<SetProgress> {
        let mut qb = self.progress_builder(user, namespace);
        qb.where_eq("s.id", set_id);

        let (sql, params) = qb.build();
        let progress = self
            .conn
            .execute_into::<SetProgress>(&sql, &params)?
            .into_iter()
            .next()
            .unwrap_or_else(|| SetProgress {
                set_id: set_id.to_string(),
                collected: 0,
                total: 0,
            });
        Ok(progress)
    }

    /// Completion of every set, ordered by set id.
    pub fn progress_by_set(&self, user: &UserId, namespace: Namespace) -> Result<Vec<SetProgress>> {
        let (sql, params) = self.progress_builder(user, namespace).build();
        self.conn.execute_into(&sql, &params)
    }

    fn progress_builder(&self, user: &UserId, namespace: Namespace) -> SqlBuilder {
        let table = namespace.table();
        let mut qb = SqlBuilder::new("card_sets s");
        qb.select(&[
            "s.id AS set_id",
            "COUNT(m.card_id) AS collected",
            "s.total_cards AS total",
        ])
        .join("LEFT JOIN cards ON cards.set_id = s.id")
        .join_with(
            &format!(
                "LEFT JOIN {} m ON m.card_id = cards.id AND m.user_id = ?",
                table
            ),
            &[user.as_str()],
        )
        .group_by(&["s.id", "s.total_cards"])
        .order_by(&["s.id"]);
        qb
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Record `card_id` for `user` in `namespace`.
    ///
    /// Returns `false` when the membership already existed. Unknown card ids
    /// are rejected with [`CollectionError::NotFound`].
    pub fn add(&self, user: &UserId, card_id: &str, namespace: Namespace) -> Result<bool> {
        self.ensure_card(card_id)?;
        if self.contains(user, card_id, namespace)? {
            return Ok(false);
        }
        self.conn
            .insert_membership(&Membership::new(user, card_id, namespace, Utc::now()))?;
        debug!(user_id = %user, card_id, namespace = %namespace, "membership added");
        Ok(true)
    }

    /// Remove `card_id` from the manual collection of `user`.
    ///
    /// The game namespace is append-only and yields
    /// [`CollectionError::ReadOnlyNamespace`].
    pub fn remove(&self, user: &UserId, card_id: &str, namespace: Namespace) -> Result<bool> {
        let removed = self.conn.remove_membership(user, card_id, namespace)?;
        if removed {
            debug!(user_id = %user, card_id, namespace = %namespace, "membership removed");
        }
        Ok(removed)
    }

    /// Flip ownership of `card_id` in the manual collection and return the
    /// new state.
    pub fn toggle(&self, user: &UserId, card_id: &str) -> Result<bool> {
        if self.contains(user, card_id, Namespace::Manual)? {
            self.remove(user, card_id, Namespace::Manual)?;
            Ok(false)
        } else {
            self.add(user, card_id, Namespace::Manual)?;
            Ok(true)
        }
    }

    fn ensure_card(&self, card_id: &str) -> Result<()> {
        let (sql, params) = SqlBuilder::new("cards")
            .select(&["COUNT(*) AS cnt"])
            .where_eq("id", card_id)
            .build();

        let cnt = self
            .conn
            .execute_scalar(&sql, &params)?
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        if cnt == 0 {
            return Err(CollectionError::NotFound(format!("Unknown card: {}", card_id)));
        }
        Ok(())
    }
}
