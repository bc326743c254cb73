//! JSON storage backend with the config store

#![cfg(feature = "json")]

use lorelei_config::{ConfigStore, JsonStorage, StoreConfig, Value};
use tempfile::TempDir;

#[test]
fn test_json_store_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let store = ConfigStore::open(StoreConfig::new(temp_dir.path()).with_storage(JsonStorage::new()))
        .unwrap();
    assert_eq!(store.extension(), "json");

    store.set(11, "Security", "anti-invite", true).unwrap();
    store.set(11, "Appearance", "color", "Yellow").unwrap();

    let path = temp_dir.path().join("11.json");
    let content = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["Security"]["anti-invite"], serde_json::json!(true));

    let reopened =
        ConfigStore::open(StoreConfig::new(temp_dir.path()).with_storage(JsonStorage::compact()))
            .unwrap();
    assert_eq!(reopened.get(11, "Appearance", "color").unwrap(), Some(Value::from("Yellow")));
}

#[test]
fn test_json_store_ignores_toml_files() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("1.toml"), "[A]\nx = 1\n").unwrap();
    std::fs::write(temp_dir.path().join("2.json"), r#"{"A": {"x": 2}}"#).unwrap();

    let store = ConfigStore::open(StoreConfig::new(temp_dir.path()).with_storage(JsonStorage::new()))
        .unwrap();
    assert_eq!(store.entity_ids(), vec!["2".to_string()]);
    assert_eq!(store.get_integer(2, "A", "x").unwrap(), Some(2));
}
