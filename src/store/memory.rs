use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::{CatalogSource, CollectionStore};
use crate::error::{CollectionError, Result};
use crate::models::{Card, Membership, Namespace, UserId};

/// In-process catalog and membership store.
///
/// Memberships are kept per `(namespace, user)` keyed by card id, so
/// re-inserting a pair keeps the original record.
#[derive(Debug, Default)]
pub struct MemoryStore {
    catalog: Vec<Card>,
    memberships: RefCell<HashMap<(Namespace, UserId), HashMap<String, Membership>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store serving `catalog`.
    pub fn with_catalog(catalog: Vec<Card>) -> Self {
        Self {
            catalog,
            memberships: RefCell::new(HashMap::new()),
        }
    }

    /// All membership records of a user in one namespace.
    pub fn records(&self, user: &UserId, namespace: Namespace) -> Vec<Membership> {
        self.memberships
            .borrow()
            .get(&(namespace, user.clone()))
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of memberships of a user in one namespace.
    pub fn count(&self, user: &UserId, namespace: Namespace) -> usize {
        self.memberships
            .borrow()
            .get(&(namespace, user.clone()))
            .map(|m| m.len())
            .unwrap_or(0)
    }
}

impl CatalogSource for MemoryStore {
    fn fetch_catalog(&self) -> Result<Vec<Card>> {
        let mut seen = HashSet::new();
        Ok(self
            .catalog
            .iter()
            .filter(|c| seen.insert(c.id.clone()))
            .cloned()
            .collect())
    }
}

impl CollectionStore for MemoryStore {
    fn fetch_membership(&self, user: &UserId, namespace: Namespace) -> Result<HashSet<String>> {
        Ok(self
            .memberships
            .borrow()
            .get(&(namespace, user.clone()))
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn insert_membership(&self, membership: &Membership) -> Result<()> {
        self.memberships
            .borrow_mut()
            .entry((membership.namespace, membership.user_id.clone()))
            .or_default()
            .entry(membership.card_id.clone())
            .or_insert_with(|| membership.clone());
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
        Ok(self
            .memberships
            .borrow_mut()
            .get_mut(&(namespace, user.clone()))
            .map(|m| m.remove(card_id).is_some())
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn insert_is_a_set_add() {
        let store = MemoryStore::new();
        let user = UserId::new("ash");
        let m = Membership::new(&user, "swsh1-1", Namespace::Game, Utc::now());

        store.insert_membership(&m).unwrap();
        store.insert_membership(&m).unwrap();

        assert_eq!(store.count(&user, Namespace::Game), 1);
        assert!(store
            .fetch_membership(&user, Namespace::Game)
            .unwrap()
            .contains("swsh1-1"));
    }

    #[test]
    fn namespaces_are_independent() {
        let store = MemoryStore::new();
        let user = UserId::new("ash");
        store
            .insert_membership(&Membership::new(&user, "swsh1-1", Namespace::Manual, Utc::now()))
            .unwrap();

        assert_eq!(store.count(&user, Namespace::Manual), 1);
        assert!(store.fetch_membership(&user, Namespace::Game).unwrap().is_empty());
    }

    #[test]
    fn game_namespace_rejects_removal() {
        let store = MemoryStore::new();
        let user = UserId::new("ash");
        let err = store
            .remove_membership(&user, "swsh1-1", Namespace::Game)
            .unwrap_err();
        assert!(matches!(err, CollectionError::ReadOnlyNamespace(Namespace::Game)));
    }

    #[test]
    fn manual_removal_reports_whether_present() {
        let store = MemoryStore::new();
        let user = UserId::new("ash");
        store
            .insert_membership(&Membership::new(&user, "swsh1-1", Namespace::Manual, Utc::now()))
            .unwrap();

        assert!(store.remove_membership(&user, "swsh1-1", Namespace::Manual).unwrap());
        assert!(!store.remove_membership(&user, "swsh1-1", Namespace::Manual).unwrap());
    }
}
