//! Shared test fixtures for the collection SDK integration tests.
//!
//! Provides `setup_sample_db()` which creates an in-memory DuckDB connection
//! with the catalog tables populated from NDJSON temp files, and
//! `setup_sample_sdk()` which does the same through the SDK entry point.
#![allow(dead_code)]

use std::io::Write;

use tcg_collection_sdk::{CollectionSdk, Connection};
use tempfile::NamedTempFile;

/// Cards in the sample catalog.
pub const CATALOG_SIZE: usize = 12;

/// Create an in-memory `Connection` with the sample sets and cards loaded.
pub fn setup_sample_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();

    let sets = write_ndjson(&sample_sets());
    conn.import_ndjson("card_sets", sets.path().to_str().unwrap())
        .unwrap();

    let cards = write_ndjson(&sample_cards());
    conn.import_ndjson("cards", cards.path().to_str().unwrap())
        .unwrap();

    conn
}

/// Create an SDK over an in-memory database with the sample catalog loaded.
pub fn setup_sample_sdk() -> CollectionSdk {
    let sdk = CollectionSdk::builder().build().unwrap();

    let sets = write_ndjson(&sample_sets());
    let cards = write_ndjson(&sample_cards());
    sdk.import_catalog(sets.path(), cards.path()).unwrap();

    sdk
}

/// Write rows as newline-delimited JSON to a temp file.
///
/// The file is deleted when the returned handle is dropped.
pub fn write_ndjson(rows: &[serde_json::Value]) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    for row in rows {
        writeln!(tmp, "{}", serde_json::to_string(row).unwrap()).unwrap();
    }
    tmp.flush().unwrap();
    tmp
}

pub fn sample_sets() -> Vec<serde_json::Value> {
    vec![
        serde_json::json!({
            "id": "swsh1",
            "name": "Sword & Shield",
            "release_date": "2020-02-07",
            "total_cards": 202,
            "image_url": "https://images.pokemontcg.io/swsh1/logo.png",
            "description": "Pokémon V and Pokémon VMAX from the Galar region."
        }),
        serde_json::json!({
            "id": "swsh2",
            "name": "Rebel Clash",
            "release_date": "2020-05-01",
            "total_cards": 209,
            "image_url": "https://images.pokemontcg.io/swsh2/logo.png",
            "description": "More Pokémon V and Pokémon VMAX cards."
        }),
        serde_json::json!({
            "id": "swsh4",
            "name": "Vivid Voltage",
            "release_date": "2020-11-13",
            "total_cards": 185,
            "image_url": "https://images.pokemontcg.io/swsh4/logo.png",
            "description": null
        }),
    ]
}

fn attacks(list: serde_json::Value) -> String {
    serde_json::to_string(&list).unwrap()
}

/// Twelve cards: nine in swsh1 covering every tier plus one unclassified
/// label, three in swsh2. swsh4 has none.
pub fn sample_cards() -> Vec<serde_json::Value> {
    vec![
        serde_json::json!({
            "id": "swsh1-1",
            "name": "Celebi V",
            "set_id": "swsh1",
            "number": "1/202",
            "rarity": "Rare Holo V",
            "type": "Grass",
            "hp": 180,
            "image_url": "https://images.pokemontcg.io/swsh1/1.png",
            "description": "It has the Natural Cure ability.",
            "attacks": attacks(serde_json::json!([
                {"name": "Spiral Dive", "cost": ["Grass", "Colorless"], "damage": "50+",
                 "text": "This attack does 20 more damage for each Energy attached to this Pokémon."}
            ]))
        }),
        serde_json::json!({
            "id": "swsh1-2",
            "name": "Grookey",
            "set_id": "swsh1",
            "number": "11/202",
            "rarity": "Common",
            "type": "Grass",
            "hp": 60,
            "image_url": "https://images.pokemontcg.io/swsh1/11.png",
            "description": null,
            "attacks": attacks(serde_json::json!([
                {"name": "Double Hit", "cost": ["Grass"], "damage": "10×2",
                 "text": "This attack does 10 damage 2 times."}
            ]))
        }),
        serde_json::json!({
            "id": "swsh1-3",
            "name": "Thwackey",
            "set_id": "swsh1",
            "number": "12/202",
            "rarity": "Uncommon",
            "type": "Grass",
            "hp": 90,
            "image_url": "https://images.pokemontcg.io/swsh1/12.png",
            "description": null,
            "attacks": attacks(serde_json::json!([
                {"name": "Branch Poke", "cost": ["Grass"], "damage": "30", "text": ""}
            ]))
        }),
        serde_json::json!({
            "id": "swsh1-4",
            "name": "Rillaboom V",
            "set_id": "swsh1",
            "number": "17/202",
            "rarity": "Ultra Rare",
            "type": "Grass",
            "hp": 220,
            "image_url": "https://images.pokemontcg.io/swsh1/17.png",
            "description": null,
            "attacks": attacks(serde_json::json!([
                {"name": "Wood Hammer", "cost": ["Grass", "Grass", "Colorless"], "damage": "110",
                 "text": "This Pokémon also does 30 damage to itself."},
                {"name": "Super Bash", "cost": ["Grass", "Grass", "Grass", "Grass"], "damage": "200",
                 "text": ""}
            ]))
        }),
        serde_json::json!({
            "id": "swsh1-5",
            "name": "Scorbunny",
            "set_id": "swsh1",
            "number": "30/202",
            "rarity": "Common",
            "type": "Fire",
            "hp": 70,
            "image_url": "https://images.pokemontcg.io/swsh1/30.png",
            "description": null
        }),
        serde_json::json!({
            "id": "swsh1-6",
            "name": "Sobble",
            "set_id": "swsh1",
            "number": "55/202",
            "rarity": "Common",
            "type": "Water",
            "hp": 70,
            "image_url": "https://images.pokemontcg.io/swsh1/55.png",
            "description": null
        }),
        serde_json::json!({
            "id": "swsh1-7",
            "name": "Raboot",
            "set_id": "swsh1",
            "number": "31/202",
            "rarity": "Uncommon",
            "type": "Fire",
            "hp": 90,
            "image_url": "https://images.pokemontcg.io/swsh1/31.png",
            "description": null
        }),
        serde_json::json!({
            "id": "swsh1-8",
            "name": "Zacian V",
            "set_id": "swsh1",
            "number": "211/202",
            "rarity": "Hyper Rare",
            "type": "Metal",
            "hp": 220,
            "image_url": "https://images.pokemontcg.io/swsh1/211.png",
            "description": null
        }),
        serde_json::json!({
            "id": "swsh1-9",
            "name": "Professor's Research",
            "set_id": "swsh1",
            "number": "178/202",
            "rarity": "Mega Hyper Rare",
            "type": "Trainer",
            "hp": null,
            "image_url": "https://images.pokemontcg.io/swsh1/178.png",
            "description": "Discard your hand and draw 7 cards."
        }),
        serde_json::json!({
            "id": "swsh2-1",
            "name": "Weedle",
            "set_id": "swsh2",
            "number": "1/192",
            "rarity": "Common",
            "type": "Grass",
            "hp": 50,
            "image_url": "https://images.pokemontcg.io/swsh2/1.png",
            "description": null
        }),
        serde_json::json!({
            "id": "swsh2-2",
            "name": "Kakuna",
            "set_id": "swsh2",
            "number": "2/192",
            "rarity": "Uncommon",
            "type": "Grass",
            "hp": 80,
            "image_url": "https://images.pokemontcg.io/swsh2/2.png",
            "description": null
        }),
        serde_json::json!({
            "id": "swsh2-3",
            "name": "Beedrill",
            "set_id": "swsh2",
            "number": "3/192",
            "rarity": "Rare",
            "type": "Grass",
            "hp": 120,
            "image_url": "https://images.pokemontcg.io/swsh2/3.png",
            "description": null
        }),
    ]
}
