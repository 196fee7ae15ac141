//! Set query integration tests against in-memory sample data.

mod common;

use tcg_collection_sdk::queries::sets::{SearchSetsParams, SetQuery};

// ---------------------------------------------------------------------------
// get
// ---------------------------------------------------------------------------

#[test]
fn get_by_id_finds_set() {
    let conn = common::setup_sample_db();
    let sq = SetQuery::new(&conn);

    let set = sq.get("swsh1").unwrap().unwrap();
    assert_eq!(set.name, "Sword & Shield");
    assert_eq!(set.release_date, "2020-02-07");
    assert_eq!(set.total_cards, 202);
}

#[test]
fn get_returns_none_for_unknown_id() {
    let conn = common::setup_sample_db();
    let sq = SetQuery::new(&conn);

    assert!(sq.get("base1").unwrap().is_none());
}

#[test]
fn missing_description_is_none() {
    let conn = common::setup_sample_db();
    let sq = SetQuery::new(&conn);

    let set = sq.get("swsh4").unwrap().unwrap();
    assert!(set.description.is_none());
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

#[test]
fn list_returns_all_sets_newest_first() {
    let conn = common::setup_sample_db();
    let sq = SetQuery::new(&conn);

    let ids: Vec<String> = sq
        .list(None, None)
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec!["swsh4", "swsh2", "swsh1"]);
}

#[test]
fn list_with_limit_and_offset() {
    let conn = common::setup_sample_db();
    let sq = SetQuery::new(&conn);

    let page = sq.list(Some(1), Some(1)).unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, "swsh2");
}

// ---------------------------------------------------------------------------
// search
// ---------------------------------------------------------------------------

#[test]
fn search_by_name_is_case_insensitive() {
    let conn = common::setup_sample_db();
    let sq = SetQuery::new(&conn);

    let results = sq
        .search(&SearchSetsParams {
            name: Some("rebel".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "swsh2");
}

#[test]
fn search_by_release_year() {
    let conn = common::setup_sample_db();
    let sq = SetQuery::new(&conn);

    let in_2020 = sq
        .search(&SearchSetsParams {
            release_year: Some(2020),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(in_2020.len(), 3);

    let in_2021 = sq
        .search(&SearchSetsParams {
            release_year: Some(2021),
            ..Default::default()
        })
        .unwrap();
    assert!(in_2021.is_empty());
}

// ---------------------------------------------------------------------------
// count
// ---------------------------------------------------------------------------

#[test]
fn count_returns_total() {
    let conn = common::setup_sample_db();
    let sq = SetQuery::new(&conn);

    assert_eq!(sq.count().unwrap(), 3);
}
