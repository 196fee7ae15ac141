//! Set queries against the `card_sets` table.

use crate::connection::Connection;
use crate::error::Result;
use crate::models::CardSet;
use crate::sql_builder::SqlBuilder;

// ---------------------------------------------------------------------------
// SearchSetsParams
// ---------------------------------------------------------------------------

/// Parameters for the set search method.
#[derive(Debug, Clone, Default)]
pub struct SearchSetsParams {
    pub name: Option<String>,
    pub release_year: Option<i32>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

// ---------------------------------------------------------------------------
// SetQuery
// ---------------------------------------------------------------------------

/// Query interface for card sets.
pub struct SetQuery<'a> {
    conn: &'a Connection,
}

impl<'a> SetQuery<'a> {
    /// Create a new `SetQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Get a single set by id.
    pub fn get(&self, id: &str) -> Result<Option<CardSet>> {
        let (sql, params) = SqlBuilder::new("card_sets")
            .where_eq("id", id)
            .limit(1)
            .build();

        Ok(self.conn.execute_into(&sql, &params)?.into_iter().next())
    }

    /// List all sets, newest release first.
    pub fn list(&self, limit: Option<usize>, offset: Option<usize>) -> Result<Vec<CardSet>> {
        self.search(&SearchSetsParams {
            limit,
            offset,
            ..SearchSetsParams::default()
        })
    }

    /// Search sets.
    ///
    /// - `name`: case-insensitive substring match
    /// - `release_year`: leading four digits of `release_date`
    pub fn search(&self, params: &SearchSetsParams) -> Result<Vec<CardSet>> {
        let mut qb = SqlBuilder::new("card_sets");
        qb.order_by(&["release_date DESC", "id"]);

        if let Some(ref name) = params.name {
            qb.where_like("name", &format!("%{}%", name));
        }

        if let Some(year) = params.release_year {
            qb.where_clause("LEFT(release_date, 4) = ?", &[year.to_string().as_str()]);
        }

        if let Some(l) = params.limit {
            qb.limit(l);
        }
        if let Some(o) = params.offset {
            qb.offset(o);
        }

        let (sql, sql_params) = qb.build();
        self.conn.execute_into(&sql, &sql_params)
    }

    /// Count all sets.
    pub fn count(&self) -> Result<i64> {
        let cnt = self
            .conn
            .execute_scalar("SELECT COUNT(*) FROM card_sets", &[])?
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        Ok(cnt)
    }
}
