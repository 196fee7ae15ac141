use std::path::PathBuf;

pub const API_BASE: &str = "https://api.pokemontcg.io/v2";
pub const DEFAULT_PAGE_SIZE: usize = 250;

/// Number of cards in an opened booster pack.
pub const HAND_SIZE: usize = 5;
pub const COMMON_SLOTS: usize = 3;
pub const UNCOMMON_SLOTS: usize = 1;
pub const RARE_PLUS_SLOTS: usize = 1;

pub const RARE_HOLO_WEIGHT: f64 = 0.70;
pub const ULTRA_RARE_WEIGHT: f64 = 0.25;
pub const HYPER_RARE_WEIGHT: f64 = 0.05;

pub const SNAPSHOT_FILE: &str = "catalog.json.gz";
pub const VERSION_FILE: &str = "version.txt";

/// DDL for the backing store. Membership tables are keyed on
/// `(user_id, card_id)` so a pair can only be recorded once per namespace.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS card_sets (
    id VARCHAR PRIMARY KEY,
    name VARCHAR NOT NULL,
    release_date VARCHAR NOT NULL,
    total_cards BIGINT NOT NULL,
    image_url VARCHAR NOT NULL,
    description VARCHAR
);
CREATE TABLE IF NOT EXISTS cards (
    id VARCHAR PRIMARY KEY,
    name VARCHAR NOT NULL,
    set_id VARCHAR NOT NULL,
    number VARCHAR NOT NULL,
    rarity VARCHAR NOT NULL,
    type VARCHAR NOT NULL,
    hp BIGINT,
    image_url VARCHAR,
    description VARCHAR,
    attacks VARCHAR
);
CREATE TABLE IF NOT EXISTS user_collections (
    user_id VARCHAR NOT NULL,
    card_id VARCHAR NOT NULL,
    acquired_at BIGINT NOT NULL,
    PRIMARY KEY (user_id, card_id)
);
CREATE TABLE IF NOT EXISTS game_collections (
    user_id VARCHAR NOT NULL,
    card_id VARCHAR NOT NULL,
    acquired_at BIGINT NOT NULL,
    PRIMARY KEY (user_id, card_id)
);
"#;

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("tcg-collection-sdk")
    } else {
        PathBuf::from(".tcg-collection-sdk-cache")
    }
}
