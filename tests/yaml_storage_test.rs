//! YAML storage backend with the config store

#![cfg(feature = "yaml")]

use lorelei_config::{ConfigStore, StoreConfig, Value, YamlStorage};
use tempfile::TempDir;

#[test]
fn test_yaml_store_with_fallback() {
    let temp_dir = TempDir::new().unwrap();
    let fallback = temp_dir.path().join("en.yaml");
    std::fs::write(&fallback, "Responds:\n  greeting: hi\n").unwrap();

    let store = ConfigStore::open(
        StoreConfig::new(temp_dir.path())
            .with_storage(YamlStorage::new())
            .with_fallback(&fallback),
    )
    .unwrap();

    assert_eq!(store.get("de", "Responds", "greeting").unwrap(), Some(Value::from("hi")));

    store.set("de", "Responds", "greeting", "hallo").unwrap();
    assert!(temp_dir.path().join("de.yaml").exists());
    assert_eq!(store.get("de", "Responds", "greeting").unwrap(), Some(Value::from("hallo")));

    store.delete_entity("de").unwrap();
    assert!(!temp_dir.path().join("de.yaml").exists());
    assert_eq!(store.entity_ids(), vec!["en".to_string()]);
}
