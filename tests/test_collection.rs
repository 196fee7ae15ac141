//! Collection query integration tests: manual toggling, counts, progress.

mod common;

use tcg_collection_sdk::queries::CollectionQuery;
use tcg_collection_sdk::{CollectionError, Namespace, SortOrder, UserId};

// ---------------------------------------------------------------------------
// add / remove / toggle
// ---------------------------------------------------------------------------

#[test]
fn add_is_idempotent() {
    let conn = common::setup_sample_db();
    let cq = CollectionQuery::new(&conn);
    let user = UserId::new("brock");

    assert!(cq.add(&user, "swsh1-2", Namespace::Manual).unwrap());
    assert!(!cq.add(&user, "swsh1-2", Namespace::Manual).unwrap());
    assert_eq!(cq.count(&user, Namespace::Manual).unwrap(), 1);
}

#[test]
fn add_unknown_card_is_not_found() {
    let conn = common::setup_sample_db();
    let cq = CollectionQuery::new(&conn);

    let err = cq
        .add(&UserId::new("brock"), "swsh9-1", Namespace::Manual)
        .unwrap_err();
    assert!(matches!(err, CollectionError::NotFound(_)));
}

#[test]
fn namespaces_are_independent() {
    let conn = common::setup_sample_db();
    let cq = CollectionQuery::new(&conn);
    let user = UserId::new("brock");

    cq.add(&user, "swsh1-2", Namespace::Game).unwrap();

    assert!(cq.contains(&user, "swsh1-2", Namespace::Game).unwrap());
    assert!(!cq.contains(&user, "swsh1-2", Namespace::Manual).unwrap());
    assert_eq!(cq.count(&user, Namespace::Manual).unwrap(), 0);
}

#[test]
fn users_are_independent() {
    let conn = common::setup_sample_db();
    let cq = CollectionQuery::new(&conn);

    cq.add(&UserId::new("brock"), "swsh1-2", Namespace::Manual)
        .unwrap();

    assert_eq!(cq.count(&UserId::new("misty"), Namespace::Manual).unwrap(), 0);
}

#[test]
fn remove_from_manual() {
    let conn = common::setup_sample_db();
    let cq = CollectionQuery::new(&conn);
    let user = UserId::new("brock");

    cq.add(&user, "swsh1-3", Namespace::Manual).unwrap();

    assert!(cq.remove(&user, "swsh1-3", Namespace::Manual).unwrap());
    assert!(!cq.remove(&user, "swsh1-3", Namespace::Manual).unwrap());
    assert_eq!(cq.count(&user, Namespace::Manual).unwrap(), 0);
}

#[test]
fn game_collection_is_append_only() {
    let conn = common::setup_sample_db();
    let cq = CollectionQuery::new(&conn);
    let user = UserId::new("brock");

    cq.add(&user, "swsh1-3", Namespace::Game).unwrap();
    let err = cq.remove(&user, "swsh1-3", Namespace::Game).unwrap_err();

    assert!(matches!(
        err,
        CollectionError::ReadOnlyNamespace(Namespace::Game)
    ));
    assert_eq!(cq.count(&user, Namespace::Game).unwrap(), 1);
}

#[test]
fn toggle_flips_manual_ownership() {
    let conn = common::setup_sample_db();
    let cq = CollectionQuery::new(&conn);
    let user = UserId::new("brock");

    assert!(cq.toggle(&user, "swsh2-1").unwrap());
    assert!(cq.contains(&user, "swsh2-1", Namespace::Manual).unwrap());

    assert!(!cq.toggle(&user, "swsh2-1").unwrap());
    assert!(!cq.contains(&user, "swsh2-1", Namespace::Manual).unwrap());
}

// ---------------------------------------------------------------------------
// listings
// ---------------------------------------------------------------------------

#[test]
fn owned_cards_returns_catalog_rows() {
    let conn = common::setup_sample_db();
    let cq = CollectionQuery::new(&conn);
    let user = UserId::new("brock");

    cq.add(&user, "swsh2-3", Namespace::Manual).unwrap();
    cq.add(&user, "swsh1-1", Namespace::Manual).unwrap();

    let cards = cq.owned_cards(&user, Namespace::Manual).unwrap();
    let ids: Vec<&str> = cards.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["swsh1-1", "swsh2-3"]);
    assert_eq!(cards[0].attacks[0].name, "Spiral Dive");
}

#[test]
fn owned_ids_and_memberships() {
    let conn = common::setup_sample_db();
    let cq = CollectionQuery::new(&conn);
    let user = UserId::new("brock");

    cq.add(&user, "swsh1-5", Namespace::Game).unwrap();
    cq.add(&user, "swsh1-6", Namespace::Game).unwrap();

    let ids = cq.owned_ids(&user, Namespace::Game).unwrap();
    assert!(ids.contains("swsh1-5") && ids.contains("swsh1-6"));

    let records = cq.memberships(&user, Namespace::Game).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .all(|m| m.user_id == user && m.namespace == Namespace::Game));
}

fn own_inventory(cq: &CollectionQuery<'_>, user: &UserId) {
    for id in ["swsh1-5", "swsh2-1", "swsh1-3", "swsh1-2"] {
        cq.add(user, id, Namespace::Manual).unwrap();
    }
}

#[test]
fn search_owned_matches_name_or_number() {
    let conn = common::setup_sample_db();
    let cq = CollectionQuery::new(&conn);
    let user = UserId::new("brock");
    own_inventory(&cq, &user);

    let by_name = cq
        .search_owned(&user, Namespace::Manual, "KEY", SortOrder::NameAsc)
        .unwrap();
    let names: Vec<&str> = by_name.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Grookey", "Thwackey"]);

    let by_number = cq
        .search_owned(&user, Namespace::Manual, "30/", SortOrder::NumberAsc)
        .unwrap();
    assert_eq!(by_number.len(), 1);
    assert_eq!(by_number[0].id, "swsh1-5");

    let everything = cq
        .search_owned(&user, Namespace::Manual, "", SortOrder::NumberDesc)
        .unwrap();
    let ids: Vec<&str> = everything.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["swsh1-5", "swsh1-3", "swsh1-2", "swsh2-1"]);
}

#[test]
fn owned_by_set_groups_newest_release_first() {
    let conn = common::setup_sample_db();
    let cq = CollectionQuery::new(&conn);
    let user = UserId::new("brock");
    own_inventory(&cq, &user);

    let groups = cq
        .owned_by_set(&user, Namespace::Manual, "", SortOrder::NumberAsc)
        .unwrap();
    let layout: Vec<(&str, Vec<&str>)> = groups
        .iter()
        .map(|(set, cards)| {
            (
                set.id.as_str(),
                cards.iter().map(|c| c.id.as_str()).collect(),
            )
        })
        .collect();
    assert_eq!(
        layout,
        vec![
            ("swsh2", vec!["swsh2-1"]),
            ("swsh1", vec!["swsh1-2", "swsh1-3", "swsh1-5"]),
        ]
    );
}

#[test]
fn owned_by_set_skips_sets_without_matches() {
    let conn = common::setup_sample_db();
    let cq = CollectionQuery::new(&conn);
    let user = UserId::new("brock");
    own_inventory(&cq, &user);

    let groups = cq
        .owned_by_set(&user, Namespace::Manual, "weedle", SortOrder::NumberAsc)
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].0.name, "Rebel Clash");

    let none = cq
        .owned_by_set(&user, Namespace::Game, "", SortOrder::NumberAsc)
        .unwrap();
    assert!(none.is_empty());
}

// ---------------------------------------------------------------------------
// progress
// ---------------------------------------------------------------------------

#[test]
fn set_progress_uses_declared_total() {
    let conn = common::setup_sample_db();
    let cq = CollectionQuery::new(&conn);
    let user = UserId::new("brock");

    for id in ["swsh2-1", "swsh2-2", "swsh2-3"] {
        cq.add(&user, id, Namespace::Manual).unwrap();
    }

    let progress = cq.set_progress(&user, Namespace::Manual, "swsh2").unwrap();
    assert_eq!(progress.collected, 3);
    assert_eq!(progress.total, 209);
    assert_eq!(progress.percent(), 1);
}

#[test]
fn set_progress_for_set_without_loaded_cards() {
    let conn = common::setup_sample_db();
    let cq = CollectionQuery::new(&conn);

    let progress = cq
        .set_progress(&UserId::new("brock"), Namespace::Manual, "swsh4")
        .unwrap();
    assert_eq!(progress.collected, 0);
    assert_eq!(progress.total, 185);
    assert_eq!(progress.percent(), 0);
}

#[test]
fn set_progress_for_unknown_set() {
    let conn = common::setup_sample_db();
    let cq = CollectionQuery::new(&conn);

    let progress = cq
        .set_progress(&UserId::new("brock"), Namespace::Manual, "base1")
        .unwrap();
    assert_eq!(progress.total, 0);
    assert_eq!(progress.percent(), 0);
}

#[test]
fn progress_by_set_ignores_other_users() {
    let conn = common::setup_sample_db();
    let cq = CollectionQuery::new(&conn);
    let brock = UserId::new("brock");

    cq.add(&brock, "swsh2-1", Namespace::Game).unwrap();
    cq.add(&brock, "swsh2-2", Namespace::Game).unwrap();
    cq.add(&UserId::new("misty"), "swsh1-1", Namespace::Game)
        .unwrap();

    let progress = cq.progress_by_set(&brock, Namespace::Game).unwrap();
    let rows: Vec<(&str, usize, usize)> = progress
        .iter()
        .map(|p| (p.set_id.as_str(), p.collected, p.total))
        .collect();
    assert_eq!(
        rows,
        vec![("swsh1", 0, 202), ("swsh2", 2, 209), ("swsh4", 0, 185)]
    );
}
