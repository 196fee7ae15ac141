//! SqlBuilder unit tests: clause assembly and parameter ordering.

use tcg_collection_sdk::SqlBuilder;

// ---------------------------------------------------------------------------
// select / from
// ---------------------------------------------------------------------------

#[test]
fn new_creates_select_star_from_table() {
    let (sql, params) = SqlBuilder::new("cards").build();
    assert_eq!(sql, "SELECT *\nFROM cards");
    assert!(params.is_empty());
}

#[test]
fn select_replaces_default_star() {
    let (sql, _) = SqlBuilder::new("cards")
        .select(&["id", "name"])
        .build();
    assert!(sql.starts_with("SELECT id, name\n"));
}

// ---------------------------------------------------------------------------
// where
// ---------------------------------------------------------------------------

#[test]
fn where_eq_adds_equality_with_param() {
    let (sql, params) = SqlBuilder::new("cards")
        .where_eq("set_id", "swsh1")
        .build();
    assert!(sql.contains("WHERE set_id = ?"));
    assert_eq!(params, vec!["swsh1"]);
}

#[test]
fn where_like_adds_case_insensitive_like() {
    let (sql, params) = SqlBuilder::new("cards")
        .where_like("name", "%pika%")
        .build();
    assert!(sql.contains("LOWER(name) LIKE LOWER(?)"));
    assert_eq!(params, vec!["%pika%"]);
}

#[test]
fn where_in_adds_in_clause() {
    let (sql, params) = SqlBuilder::new("cards")
        .where_in("id", &["a", "b", "c"])
        .build();
    assert!(sql.contains("id IN (?, ?, ?)"));
    assert_eq!(params, vec!["a", "b", "c"]);
}

#[test]
fn where_in_empty_produces_false() {
    let (sql, params) = SqlBuilder::new("cards").where_in("id", &[]).build();
    assert!(sql.contains("WHERE FALSE"));
    assert!(params.is_empty());
}

#[test]
fn where_or_creates_or_group() {
    let (sql, params) = SqlBuilder::new("cards")
        .where_or(&[("name = ?", "Grookey"), ("number = ?", "11/202")])
        .build();
    assert!(sql.contains("WHERE (name = ? OR number = ?)"));
    assert_eq!(params, vec!["Grookey", "11/202"]);
}

#[test]
fn where_or_empty_is_noop() {
    let (sql, params) = SqlBuilder::new("cards").where_or(&[]).build();
    assert!(!sql.contains("WHERE"));
    assert!(params.is_empty());
}

#[test]
fn where_clauses_are_anded_in_order() {
    let (sql, params) = SqlBuilder::new("cards")
        .where_eq("set_id", "swsh1")
        .where_clause("hp >= ?", &["100"])
        .build();
    assert!(sql.contains("WHERE set_id = ? AND hp >= ?"));
    assert_eq!(params, vec!["swsh1", "100"]);
}

// ---------------------------------------------------------------------------
// join / group / order / paging
// ---------------------------------------------------------------------------

#[test]
fn join_params_precede_where_params() {
    let (sql, params) = SqlBuilder::new("cards")
        .join_with(
            "LEFT JOIN game_collections m ON m.card_id = cards.id AND m.user_id = ?",
            &["ash"],
        )
        .where_eq("cards.set_id", "swsh1")
        .build();
    let join_at = sql.find("LEFT JOIN").unwrap();
    let where_at = sql.find("WHERE").unwrap();
    assert!(join_at < where_at);
    assert_eq!(params, vec!["ash", "swsh1"]);
}

#[test]
fn plain_join_adds_clause() {
    let (sql, params) = SqlBuilder::new("user_collections")
        .join("JOIN cards ON cards.id = user_collections.card_id")
        .build();
    assert!(sql.contains("\nJOIN cards ON cards.id = user_collections.card_id"));
    assert!(params.is_empty());
}

#[test]
fn group_by_and_order_by() {
    let (sql, _) = SqlBuilder::new("cards")
        .select(&["set_id", "COUNT(*) AS total"])
        .group_by(&["set_id"])
        .order_by(&["set_id", "total DESC"])
        .build();
    assert!(sql.contains("GROUP BY set_id\nORDER BY set_id, total DESC"));
}

#[test]
fn limit_and_offset_together() {
    let (sql, _) = SqlBuilder::new("cards").limit(10).offset(20).build();
    assert!(sql.ends_with("LIMIT 10\nOFFSET 20"));
}
