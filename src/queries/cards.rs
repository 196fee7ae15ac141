//! Card queries against the `cards` table.

use std::collections::HashMap;

use crate::connection::Connection;
use crate::error::Result;
use crate::models::{sort_cards, Card, Namespace, OwnedCard, SortOrder, UserId};
use crate::sql_builder::SqlBuilder;
use crate::store::database::{rows_to_cards, CARD_COLUMNS};
use crate::store::CollectionStore;

// ---------------------------------------------------------------------------
// SearchCardsParams
// ---------------------------------------------------------------------------

/// Parameters for the card search.
///
/// All fields are optional. When `None`, the corresponding filter is skipped.
#[derive(Debug, Clone, Default)]
pub struct SearchCardsParams {
    /// Substring of the card name (case-insensitive) or of the collector number.
    pub query: Option<String>,
    pub set_id: Option<String>,
    pub rarity: Option<String>,
    pub card_type: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

// ---------------------------------------------------------------------------
// CardQuery
// ---------------------------------------------------------------------------

/// Query interface for catalog cards.
pub struct CardQuery<'a> {
    conn: &'a Connection,
}

impl<'a> CardQuery<'a> {
    /// Create a new `CardQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Retrieve a single card by id.
    pub fn get(&self, id: &str) -> Result<Option<Card>> {
        let (sql, params) = SqlBuilder::new("cards")
            .select(CARD_COLUMNS)
            .where_eq("cards.id", id)
            .limit(1)
            .build();

        let rows = self.conn.execute(&sql, &params)?;
        Ok(rows_to_cards(rows)?.into_iter().next())
    }

    /// Retrieve several cards by id, in the order given. Unknown ids are skipped.
    pub fn get_many(&self, ids: &[&str]) -> Result<Vec<Card>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let (sql, params) = SqlBuilder::new("cards")
            .select(CARD_COLUMNS)
            .where_in("cards.id", ids)
            .build();

        let mut by_id: HashMap<String, Card> = rows_to_cards(self.conn.execute(&sql, &params)?)?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(*id)).collect())
    }

    /// All cards of a set in the given order.
    pub fn by_set(&self, set_id: &str, order: SortOrder) -> Result<Vec<Card>> {
        let (sql, params) = SqlBuilder::new("cards")
            .select(CARD_COLUMNS)
            .where_eq("cards.set_id", set_id)
            .build();

        let mut cards = rows_to_cards(self.conn.execute(&sql, &params)?)?;
        sort_cards(&mut cards, order);
        Ok(cards)
    }

    /// All cards of a set annotated with whether `user` owns them in `namespace`.
    pub fn by_set_with_status(
        &self,
        set_id: &str,
        user: &UserId,
        namespace: Namespace,
        order: SortOrder,
    ) -> Result<Vec<OwnedCard>> {
        let owned = self.conn.fetch_membership(user, namespace)?;
        Ok(self
            .by_set(set_id, order)?
            .into_iter()
            .map(|card| OwnedCard {
                owned: owned.contains(&card.id),
                newly_granted: false,
                card,
            })
            .collect())
    }

    /// Search cards using a combination of filters, ordered by set and name.
    pub fn search(&self, params: &SearchCardsParams) -> Result<Vec<Card>> {
        let mut qb = SqlBuilder::new("cards");
        qb.select(CARD_COLUMNS);
        qb.order_by(&["cards.set_id", "cards.name"]);

        if let Some(ref q) = params.query {
            let pattern = format!("%{}%", q);
            qb.where_or(&[
                ("LOWER(cards.name) LIKE LOWER(?)", pattern.as_str()),
                ("cards.number LIKE ?", pattern.as_str()),
            ]);
        }

        if let Some(ref set_id) = params.set_id {
            qb.where_eq("cards.set_id", set_id);
        }

        if let Some(ref rarity) = params.rarity {
            qb.where_eq("cards.rarity", rarity);
        }

        if let Some(ref card_type) = params.card_type {
            qb.where_eq("cards.type", card_type);
        }

        qb.limit(params.limit.unwrap_or(100));
        qb.offset(params.offset.unwrap_or(0));

        let (sql, sql_params) = qb.build();
        rows_to_cards(self.conn.execute(&sql, &sql_params)?)
    }

    /// Count cards, optionally restricted to one set.
    pub fn count(&self, set_id: Option<&str>) -> Result<i64> {
        let mut qb = SqlBuilder::new("cards");
        qb.select(&["COUNT(*) AS cnt"]);

        if let Some(id) = set_id {
            qb.where_eq("set_id", id);
        }

        let (sql, params) = qb.build();
        let cnt = self
            .conn
            .execute_scalar(&sql, &params)?
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        Ok(cnt)
    }
}
