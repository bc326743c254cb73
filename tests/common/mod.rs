//! Common test utilities for lorelei-config integration tests
//!
//! Provides a temporary data directory laid out the way the bot expects,
//! plus helpers for poking at record files directly.

#![allow(dead_code)]

use lorelei_config::{ConfigStore, Stores};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Default locale file used by the fixtures
pub const EN_TOML: &str = r#"[Responds]
greeting = "hi"
farewell = "bye"
info_text_raw = "Lorelei is maintained by:\n"

[Errors]
missing_permission = "You lack the permission to do that."
"#;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// =============================================================================
// Test Fixtures
// =============================================================================

/// Temporary `data/` tree with `guilds/`, `users/` and `lang/en.toml`
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        init_logging();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for sub in ["guilds", "users", "lang"] {
            std::fs::create_dir_all(temp_dir.path().join(sub)).expect("Failed to create dir");
        }
        std::fs::write(temp_dir.path().join("lang").join("en.toml"), EN_TOML)
            .expect("Failed to write en.toml");
        Self { temp_dir }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    pub fn dir(&self, sub: &str) -> PathBuf {
        self.temp_dir.path().join(sub)
    }

    pub fn fallback_path(&self) -> PathBuf {
        self.dir("lang").join("en.toml")
    }

    pub fn guilds(&self) -> ConfigStore {
        ConfigStore::new(self.dir("guilds")).expect("Failed to open guild store")
    }

    pub fn lang(&self) -> ConfigStore {
        ConfigStore::with_fallback(self.dir("lang"), self.fallback_path())
            .expect("Failed to open lang store")
    }

    pub fn stores(&self) -> Stores {
        Stores::open_dir(self.temp_dir.path()).expect("Failed to open stores")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

pub fn record_file(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{id}.toml"))
}

/// Raw content of a record file, if it exists
pub fn read_record_file(dir: &Path, id: &str) -> Option<String> {
    std::fs::read_to_string(record_file(dir, id)).ok()
}

/// Overwrite a record file behind the store's back
pub fn write_record_file(dir: &Path, id: &str, content: &str) {
    std::fs::write(record_file(dir, id), content).expect("Failed to write record file");
}
