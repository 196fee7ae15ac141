//! Collaborator interfaces for the catalog and the membership store.
//!
//! The booster pipeline only talks to these traits, so it can run against
//! the DuckDB-backed [`Connection`](crate::connection::Connection), the
//! HTTP [`RemoteCatalog`](crate::catalog::RemoteCatalog), or the in-memory
//! [`MemoryStore`] used in tests.

pub(crate) mod database;
mod memory;

pub use memory::MemoryStore;

use std::collections::HashSet;

use crate::error::Result;
use crate::models::{Card, Membership, Namespace, UserId};

/// Read-only access to the full card catalog.
pub trait CatalogSource {
    /// Return the complete, de-duplicated catalog.
    fn fetch_catalog(&self) -> Result<Vec<Card>>;
}

/// Read/insert access to per-user membership records.
pub trait CollectionStore {
    /// Card ids owned by `user` in `namespace`.
    fn fetch_membership(&self, user: &UserId, namespace: Namespace) -> Result<HashSet<String>>;

    /// Record one membership. Recording a pair that already exists is a no-op.
    fn insert_membership(&self, membership: &Membership) -> Result<()>;

    /// Remove one membership, returning whether a row was removed.
    ///
    /// Only the manual namespace supports removal; the game namespace
    /// returns [`CollectionError::ReadOnlyNamespace`](crate::CollectionError::ReadOnlyNamespace).
    fn remove_membership(&self, user: &UserId, card_id: &str, namespace: Namespace)
        -> Result<bool>;
}

impl<T: CatalogSource + ?Sized> CatalogSource for &T {
    fn fetch_catalog(&self) -> Result<Vec<Card>> {
        (**self).fetch_catalog()
    }
}

impl<T: CollectionStore + ?Sized> CollectionStore for &T {
    fn fetch_membership(&self, user: &UserId, namespace: Namespace) -> Result<HashSet<String>> {
        (**self).fetch_membership(user, namespace)
    }

    fn insert_membership(&self, membership: &Membership) -> Result<()> {
        (**self).insert_membership(membership)
    }

    fn remove_membership(
        &self,
        user: &UserId,
        card_id: &str,
        namespace: Namespace,
    ) -> Result<bool> {
        (**self).remove_membership(user, card_id, namespace)
    }
}
