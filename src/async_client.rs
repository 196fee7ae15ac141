//! Async wrapper around [`CollectionSdk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all SDK operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//!
//! # Example
//!
//! ```no_run
//! use tcg_collection_sdk::{AsyncCollectionSdk, Namespace, UserId};
//!
//! # async fn example() -> tcg_collection_sdk::Result<()> {
//! let sdk = AsyncCollectionSdk::builder().build().await?;
//! let user = UserId::new("ash");
//!
//! let pack = sdk.open_pack(user.clone()).await?;
//! let total = sdk
//!     .run(move |s| s.collection().count(&user, Namespace::Game))
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::booster::{DrawConfig, OpenedPack};
use crate::error::{CollectionError, Result};
use crate::models::UserId;
use crate::CollectionSdk;

// ---------------------------------------------------------------------------
// AsyncCollectionSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncCollectionSdk`] instance.
#[derive(Default)]
pub struct AsyncCollectionSdkBuilder {
    database_path: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Option<Duration>,
    api_base: Option<String>,
    page_size: Option<usize>,
    remote_catalog: bool,
    draw_config: Option<DrawConfig>,
}

impl AsyncCollectionSdkBuilder {
    /// Persist the database to a file.
    pub fn database_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set a custom cache directory.
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout for catalog downloads.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the card API base URL.
    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = Some(url.into());
        self
    }

    /// Page size used when walking the remote catalog.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Draw packs from the remote card API.
    pub fn remote_catalog(mut self, enabled: bool) -> Self {
        self.remote_catalog = enabled;
        self
    }

    pub fn draw_config(mut self, draw_config: DrawConfig) -> Self {
        self.draw_config = Some(draw_config);
        self
    }

    /// Build the async SDK on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncCollectionSdk> {
        tokio::task::spawn_blocking(move || {
            let mut builder = CollectionSdk::builder()
                .offline(self.offline)
                .remote_catalog(self.remote_catalog);
            if let Some(path) = self.database_path {
                builder = builder.database_path(path);
            }
            if let Some(dir) = self.cache_dir {
                builder = builder.cache_dir(dir);
            }
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            if let Some(url) = self.api_base {
                builder = builder.api_base(url);
            }
            if let Some(page_size) = self.page_size {
                builder = builder.page_size(page_size);
            }
            if let Some(draw_config) = self.draw_config {
                builder = builder.draw_config(draw_config);
            }
            let sdk = builder.build()?;
            Ok(AsyncCollectionSdk {
                inner: Arc::new(Mutex::new(sdk)),
            })
        })
        .await
        .map_err(|e| CollectionError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncCollectionSdk
// ---------------------------------------------------------------------------

/// Async wrapper around [`CollectionSdk`].
///
/// The underlying SDK is protected by a [`Mutex`] since it uses `RefCell`
/// internally, so pack openings for the same SDK are serialized.
pub struct AsyncCollectionSdk {
    inner: Arc<Mutex<CollectionSdk>>,
}

impl AsyncCollectionSdk {
    /// Create a new builder for configuring the async SDK.
    pub fn builder() -> AsyncCollectionSdkBuilder {
        AsyncCollectionSdkBuilder::default()
    }

    /// Run a sync SDK operation on the blocking thread pool.
    ///
    /// The closure receives a `&CollectionSdk` reference and should return
    /// a `Result<T>`.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&CollectionSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = sdk
                .lock()
                .map_err(|_| CollectionError::InvalidArgument("SDK lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| CollectionError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Open one booster pack for `user`.
    pub async fn open_pack(&self, user: UserId) -> Result<OpenedPack> {
        self.run(move |s| s.open_pack(&user)).await
    }

    /// Close the SDK, releasing all resources.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            let sdk = self
                .inner
                .lock()
                .map_err(|_| CollectionError::InvalidArgument("SDK lock poisoned".into()))?;
            drop(sdk);
            Ok(())
        })
        .await
        .map_err(|e| CollectionError::InvalidArgument(format!("Task join error: {e}")))?
    }
}
