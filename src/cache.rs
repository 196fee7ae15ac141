//! HTTP catalog download and local snapshot cache.
//!
//! Fetches catalog pages from the card API and keeps the last complete
//! catalog as a gzip-compressed JSON snapshot in the cache directory, so the
//! SDK can still build packs when the API is unreachable or offline mode is on.

use crate::config;
use crate::error::{CollectionError, Result};
use crate::models::Card;
use chrono::Utc;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::fs;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// One page of the card API's paginated listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
    #[serde(default)]
    pub page: usize,
    #[serde(default)]
    pub page_size: usize,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub total_count: usize,
}

/// Downloads catalog pages and manages the on-disk snapshot.
#[derive(Debug)]
pub struct CacheManager {
    /// Directory where the snapshot and its version stamp are stored.
    pub cache_dir: PathBuf,
    /// If true, never contact the API (use the snapshot only).
    pub offline: bool,
    api_base: String,
    timeout: Duration,
    client: Option<Client>,
}

impl CacheManager {
    /// Create a new cache manager.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache directory.
    /// Creates the cache directory if it does not exist.
    pub fn new(
        cache_dir: Option<PathBuf>,
        offline: bool,
        timeout: Duration,
        api_base: impl Into<String>,
    ) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            cache_dir: dir,
            offline,
            api_base: api_base.into(),
            timeout,
            client: None,
        })
    }

    /// Base URL of the card API.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Lazy HTTP client, created on first use.
    pub fn client(&mut self) -> Result<&Client> {
        if self.client.is_none() {
            let client = Client::builder()
                .timeout(self.timeout)
                .redirect(reqwest::redirect::Policy::limited(10))
                .build()?;
            self.client = Some(client);
        }
        match self.client.as_ref() {
            Some(client) => Ok(client),
            None => Err(CollectionError::CatalogUnavailable(
                "HTTP client unavailable".to_string(),
            )),
        }
    }

    /// Fetch one page of the card listing.
    pub fn fetch_page(&mut self, page: usize, page_size: usize) -> Result<CatalogPage> {
        if self.offline {
            return Err(CollectionError::CatalogUnavailable(
                "offline mode is enabled".to_string(),
            ));
        }
        let url = format!("{}/cards", self.api_base.trim_end_matches('/'));
        debug!(%url, page, page_size, "fetching catalog page");

        let client = self.client()?.clone();
        let resp = client
            .get(&url)
            .query(&[("page", page), ("pageSize", page_size)])
            .send()?
            .error_for_status()?;
        Ok(resp.json()?)
    }

    // -----------------------------------------------------------------------
    // Snapshot
    // -----------------------------------------------------------------------

    /// Path of the gzip catalog snapshot.
    pub fn snapshot_path(&self) -> PathBuf {
        self.cache_dir.join(config::SNAPSHOT_FILE)
    }

    /// Timestamp of the last saved snapshot, read from `version.txt`.
    pub fn snapshot_version(&self) -> Option<String> {
        let version_file = self.cache_dir.join(config::VERSION_FILE);
        if version_file.exists() {
            fs::read_to_string(&version_file)
                .ok()
                .map(|s| s.trim().to_string())
        } else {
            None
        }
    }

    /// Write `cards` as the new snapshot.
    ///
    /// Writes to a temp file first and renames on success, so an interrupted
    /// write never leaves a truncated snapshot behind.
    pub fn save_snapshot(&self, cards: &[Card]) -> Result<()> {
        let dest = self.snapshot_path();
        let tmp_dest = dest.with_extension("gz.tmp");

        let result = (|| -> Result<()> {
            let file = fs::File::create(&tmp_dest)?;
            let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
            serde_json::to_writer(&mut encoder, cards)?;
            encoder.finish()?.flush()?;
            fs::rename(&tmp_dest, &dest)?;
            Ok(())
        })();

        match result {
            Ok(()) => {
                let _ = fs::write(
                    self.cache_dir.join(config::VERSION_FILE),
                    Utc::now().to_rfc3339(),
                );
                debug!(path = %dest.display(), cards = cards.len(), "saved catalog snapshot");
                Ok(())
            }
            Err(e) => {
                let _ = fs::remove_file(&tmp_dest);
                Err(e)
            }
        }
    }

    /// Load the snapshot, if one exists.
    ///
    /// A corrupt snapshot (truncated write, disk error) is deleted so the
    /// next successful fetch replaces it.
    pub fn load_snapshot(&self) -> Result<Option<Vec<Card>>> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Ok(None);
        }

        let parse_result = (|| -> Result<Vec<Card>> {
            let file = fs::File::open(&path)?;
            let mut reader = BufReader::new(GzDecoder::new(BufReader::new(file)));
            let mut contents = String::new();
            reader.read_to_string(&mut contents)?;
            Ok(serde_json::from_str(&contents)?)
        })();

        match parse_result {
            Ok(cards) => Ok(Some(cards)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt catalog snapshot, removing");
                let _ = fs::remove_file(&path);
                Err(CollectionError::NotFound(format!(
                    "Catalog snapshot was corrupt and has been removed. Original error: {}",
                    e
                )))
            }
        }
    }

    /// Remove all cached files and recreate the cache directory.
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }

    /// Close the HTTP client, if open.
    pub fn close(&mut self) {
        self.client = None;
    }
}
