//! Card collection SDK for Rust.
//!
//! Tracks which trading cards a user owns, in a manual collection the user
//! toggles and a game collection filled by opening booster packs. The card
//! catalog and memberships live in an in-process DuckDB database; the catalog
//! can optionally be pulled from the remote card API and cached on disk.
//!
//! # Quick start
//!
//! ```no_run
//! use tcg_collection_sdk::{CollectionSdk, Namespace, SortOrder, UserId};
//!
//! let sdk = CollectionSdk::builder().build().unwrap();
//! let user = UserId::new("ash");
//!
//! // Browse a set with ownership flags
//! let cards = sdk
//!     .cards()
//!     .by_set_with_status("swsh1", &user, Namespace::Manual, SortOrder::NumberAsc)
//!     .unwrap();
//!
//! // Open a booster pack
//! let pack = sdk.open_pack(&user).unwrap();
//! println!("{} new cards", pack.granted_count());
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod booster;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod connection;
pub mod error;
pub mod models;
pub mod queries;
pub mod sql_builder;
pub mod store;

#[cfg(feature = "async")]
pub use async_client::AsyncCollectionSdk;
pub use booster::{BoosterGame, DrawConfig, DuplicatePolicy, OpenedPack, RarePlusWeights, RarityTier};
pub use cache::CacheManager;
pub use catalog::RemoteCatalog;
pub use connection::Connection;
pub use error::{CollectionError, Result};
pub use models::{
    Attack, Card, CardSet, Membership, Namespace, OwnedCard, SetProgress, SortOrder, UserId,
};
pub use sql_builder::SqlBuilder;
pub use store::{CatalogSource, CollectionStore, MemoryStore};

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// CollectionSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CollectionSdk`] instance.
///
/// Use [`CollectionSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](CollectionSdkBuilder::build) to create the SDK.
pub struct CollectionSdkBuilder {
    database_path: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    api_base: String,
    page_size: usize,
    remote_catalog: bool,
    draw_config: DrawConfig,
}

impl Default for CollectionSdkBuilder {
    fn default() -> Self {
        Self {
            database_path: None,
            cache_dir: None,
            offline: false,
            timeout: Duration::from_secs(120),
            api_base: config::API_BASE.to_string(),
            page_size: config::DEFAULT_PAGE_SIZE,
            remote_catalog: false,
            draw_config: DrawConfig::default(),
        }
    }
}

impl CollectionSdkBuilder {
    /// Persist the database to a file. Without it the database is in-memory.
    pub fn database_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set a custom cache directory for the catalog snapshot.
    ///
    /// If not set, the platform-appropriate default cache directory is used
    /// (e.g. `~/.cache/tcg-collection-sdk` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    ///
    /// When offline, the remote catalog is never contacted and only the
    /// cached snapshot is used. Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout for catalog downloads.
    ///
    /// Defaults to 120 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the card API base URL.
    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into();
        self
    }

    /// Page size used when walking the remote catalog. Defaults to 250.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Draw packs from the remote card API instead of the local `cards` table.
    pub fn remote_catalog(mut self, enabled: bool) -> Self {
        self.remote_catalog = enabled;
        self
    }

    /// Slot plan, rare-plus weights and duplicate policy for opened packs.
    pub fn draw_config(mut self, draw_config: DrawConfig) -> Self {
        self.draw_config = draw_config;
        self
    }

    /// Build the SDK, opening the database and creating its schema.
    ///
    /// Nothing is downloaded eagerly; the remote catalog is fetched on the
    /// first pack opening.
    pub fn build(self) -> Result<CollectionSdk> {
        if self.page_size == 0 {
            return Err(CollectionError::InvalidArgument(
                "page_size must be greater than zero".to_string(),
            ));
        }

        let conn = match self.database_path {
            Some(ref path) => Connection::open(path)?,
            None => Connection::open_in_memory()?,
        };

        let remote = if self.remote_catalog {
            let cache = CacheManager::new(self.cache_dir, self.offline, self.timeout, self.api_base)?;
            Some(RemoteCatalog::new(cache, self.page_size))
        } else {
            None
        };

        Ok(CollectionSdk {
            conn,
            remote,
            draw_config: self.draw_config,
            database_path: self.database_path,
        })
    }
}

// ---------------------------------------------------------------------------
// CollectionSdk
// ---------------------------------------------------------------------------

/// The main entry point for the collection SDK.
///
/// Wraps a [`Connection`] and exposes query interfaces as lightweight
/// borrowing wrappers, plus the booster pack game.
///
/// Created via [`CollectionSdk::builder()`].
#[derive(Debug)]
pub struct CollectionSdk {
    conn: Connection,
    remote: Option<RemoteCatalog>,
    draw_config: DrawConfig,
    database_path: Option<PathBuf>,
}

impl CollectionSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> CollectionSdkBuilder {
        CollectionSdkBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access the set query interface.
    pub fn sets(&self) -> queries::SetQuery<'_> {
        queries::SetQuery::new(&self.conn)
    }

    /// Access the card query interface.
    pub fn cards(&self) -> queries::CardQuery<'_> {
        queries::CardQuery::new(&self.conn)
    }

    /// Access a user's manual and game collections.
    pub fn collection(&self) -> queries::CollectionQuery<'_> {
        queries::CollectionQuery::new(&self.conn)
    }

    /// Access the booster pack game.
    ///
    /// Packs are drawn from the remote catalog when enabled, otherwise from
    /// the local `cards` table. Grants always go to the local game collection,
    /// and a remote catalog is mirrored into the local tables on load.
    pub fn booster(&self) -> BoosterGame<'_> {
        BoosterGame::with_config(self, &self.conn, self.draw_config.clone())
    }

    /// Open one booster pack for `user`.
    pub fn open_pack(&self, user: &UserId) -> Result<OpenedPack> {
        self.booster().open_pack(user)
    }

    // -- Utility methods ---------------------------------------------------

    /// Load set and card rows from newline-delimited JSON files into the
    /// catalog tables. Rows whose id already exists are skipped.
    ///
    /// Returns the number of `(sets, cards)` rows inserted.
    pub fn import_catalog<P: AsRef<Path>>(&self, sets_path: P, cards_path: P) -> Result<(usize, usize)> {
        let sets = self
            .conn
            .import_ndjson("card_sets", &sets_path.as_ref().to_string_lossy())?;
        let cards = self
            .conn
            .import_ndjson("cards", &cards_path.as_ref().to_string_lossy())?;
        Ok((sets, cards))
    }

    /// Re-download the remote catalog. Returns the number of cards fetched,
    /// or `None` when the SDK draws from the local table.
    pub fn refresh_catalog(&self) -> Result<Option<usize>> {
        match self.remote {
            Some(ref remote) => {
                let cards = remote.refresh()?;
                remote.mirror_into(&self.conn, &cards)?;
                Ok(Some(cards.len()))
            }
            None => Ok(None),
        }
    }

    /// Execute a raw SQL query against the DuckDB database.
    ///
    /// # Arguments
    ///
    /// * `query` - SQL string with `?` positional placeholders.
    /// * `params` - Parameter values corresponding to the placeholders.
    pub fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.conn.execute(query, params)
    }

    /// Draw settings used by [`booster()`](Self::booster).
    pub fn draw_config(&self) -> &DrawConfig {
        &self.draw_config
    }

    /// Consume the SDK and release all resources.
    pub fn close(self) {
        drop(self);
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for CollectionSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let database = self
            .database_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string());
        let catalog = match self.remote {
            Some(ref remote) => format!("remote:{}", remote.api_base()),
            None => "local".to_string(),
        };
        write!(
            f,
            "CollectionSdk(database={}, catalog={}, hand_size={})",
            database, catalog, self.draw_config.hand_size
        )
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The catalog packs are drawn from: the remote catalog, mirrored into the
/// local tables, when enabled, otherwise the local `cards` table.
impl CatalogSource for CollectionSdk {
    fn fetch_catalog(&self) -> Result<Vec<Card>> {
        match self.remote {
            Some(ref remote) => {
                let cards = remote.fetch_catalog()?;
                remote.mirror_into(&self.conn, &cards)?;
                Ok(cards)
            }
            None => self.conn.fetch_catalog(),
        }
    }
}
