//! DuckDB connection wrapper with schema bootstrap and query execution.
//!
//! Rows come back as `HashMap<String, serde_json::Value>` so query wrappers
//! can map them into models with serde.

use crate::config;
use crate::error::{CollectionError, Result};
use duckdb::{types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Wraps a DuckDB connection holding the catalog and membership tables.
#[derive(Debug)]
pub struct Connection {
    conn: DuckDbConnection,
}

impl Connection {
    /// Open an in-memory database with the schema created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Self::init(conn)
    }

    /// Open (or create) a database file with the schema created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = DuckDbConnection::open(path)?;
        Self::init(conn)
    }

    fn init(conn: DuckDbConnection) -> Result<Self> {
        conn.execute_batch(config::SCHEMA)?;
        Ok(Self { conn })
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;
        let bound = bind(params);
        let mut rows = stmt.query(bound.as_slice())?;

        // Column metadata is only available once the statement has run
        let column_names: Vec<String> = rows
            .as_ref()
            .map(|s| s.column_names().into_iter().map(|n| n.to_string()).collect())
            .unwrap_or_default();

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut map = HashMap::with_capacity(column_names.len());
            for (i, name) in column_names.iter().enumerate() {
                map.insert(name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(&self, sql: &str, params: &[String]) -> Result<Vec<T>> {
        self.execute(sql, params)?
            .into_iter()
            .map(|row| {
                let value = serde_json::Value::Object(row.into_iter().collect());
                serde_json::from_value(value).map_err(CollectionError::from)
            })
            .collect()
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(&self, sql: &str, params: &[String]) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let bound = bind(params);
        let mut rows = stmt.query(bound.as_slice())?;

        match rows.next()? {
            Some(row) => Ok(Some(convert_value_ref(row.get_ref(0)?))),
            None => Ok(None),
        }
    }

    /// Execute a data-modifying statement and return the affected row count.
    pub fn execute_update(&self, sql: &str, params: &[String]) -> Result<usize> {
        let mut stmt = self.conn.prepare(sql)?;
        let bound = bind(params);
        Ok(stmt.execute(bound.as_slice())?)
    }

    /// Append rows from a newline-delimited JSON file to an existing table.
    ///
    /// The table's declared column types are read back with `DESCRIBE` and
    /// handed to `read_json`, so nested values (e.g. attack lists) land in
    /// VARCHAR columns as JSON text. Rows whose key already exists are skipped.
    pub fn import_ndjson(&self, table_name: &str, ndjson_path: &str) -> Result<usize> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT column_name, column_type FROM (DESCRIBE {})", table_name))?;
        let mut rows = stmt.query([])?;

        let mut columns: Vec<String> = Vec::new();
        while let Some(row) = rows.next()? {
            let name: String = row.get(0)?;
            let dtype: String = row.get(1)?;
            columns.push(format!("'{}': '{}'", name, dtype));
        }
        if columns.is_empty() {
            return Err(CollectionError::NotFound(format!("Unknown table: {}", table_name)));
        }

        let path_fwd = ndjson_path.replace('\\', "/");
        let inserted = self.conn.execute(
            &format!(
                "INSERT OR IGNORE INTO {} BY NAME \
                 SELECT * FROM read_json('{}', format='newline_delimited', columns={{{}}})",
                table_name,
                path_fwd,
                columns.join(", ")
            ),
            [],
        )?;
        debug!(table = table_name, rows = inserted, "imported ndjson");
        Ok(inserted)
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }
}

fn bind(params: &[String]) -> Vec<&dyn duckdb::ToSql> {
    params.iter().map(|p| p as &dyn duckdb::ToSql).collect()
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UTinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::USmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UBigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => match i64::try_from(n) {
            Ok(i) => serde_json::Value::Number(i.into()),
            Err(_) => serde_json::Value::String(n.to_string()),
        },
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => serde_json::Value::String(String::from_utf8_lossy(bytes).to_string()),
        // Dates, timestamps and nested types are cast to VARCHAR in SQL where needed
        _ => serde_json::Value::Null,
    }
}
