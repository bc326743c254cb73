//! Storage backend trait and implementations
//!
//! A backend decides the on-disk format of a record file. TOML is the
//! default; JSON and YAML are available behind the `json` and `yaml`
//! features. Every format must express nested `section -> key -> scalar`
//! data and stay readable for hand edits.

use crate::error::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;

/// Trait for storage backend implementations
pub trait StorageBackend: Clone + Send + Sync {
    /// File extension for this storage format (e.g., "toml", "json")
    fn extension(&self) -> &str;

    /// Serialize data to string
    fn serialize<T: Serialize>(&self, data: &T) -> Result<String>;

    /// Deserialize data from string, returning the parser's message on failure
    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> std::result::Result<T, String>;

    /// Read and deserialize from file
    fn read<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.deserialize(&content).map_err(|reason| Error::Parse {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Serialize and write to file
    ///
    /// Writes to `<name>.tmp` then renames over the target, so readers never
    /// see a truncated record. The temp name does not carry the record
    /// extension and is skipped by directory scans.
    fn write<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let content = self.serialize(data)?;

        let file_name = path.file_name().ok_or_else(|| Error::FileWrite {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        })?;
        let mut temp_filename = file_name.to_os_string();
        temp_filename.push(".tmp");
        let temp_path = path.with_file_name(temp_filename);

        std::fs::write(&temp_path, &content).map_err(|e| Error::FileWrite {
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, path).map_err(|e| {
            let _ = std::fs::remove_file(&temp_path);
            Error::FileWrite {
                path: path.to_path_buf(),
                source: e,
            }
        })
    }
}

// =============================================================================
// TOML Storage Implementation
// =============================================================================

/// TOML storage backend (default). Sections become `[tables]`.
#[derive(Clone, Default)]
pub struct TomlStorage;

impl TomlStorage {
    pub fn new() -> Self {
        Self
    }
}

impl StorageBackend for TomlStorage {
    fn extension(&self) -> &str {
        "toml"
    }

    fn serialize<T: Serialize>(&self, data: &T) -> Result<String> {
        toml::to_string(data).map_err(|e| Error::Serialize(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> std::result::Result<T, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}

// =============================================================================
// JSON Storage Implementation
// =============================================================================

/// JSON storage backend
#[cfg(feature = "json")]
#[derive(Clone, Default)]
pub struct JsonStorage {
    /// Pretty print JSON output
    pretty: bool,
}

#[cfg(feature = "json")]
impl JsonStorage {
    /// Create a new JSON storage backend with pretty printing enabled
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Create a compact JSON storage (no pretty printing)
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

#[cfg(feature = "json")]
impl StorageBackend for JsonStorage {
    fn extension(&self) -> &str {
        "json"
    }

    fn serialize<T: Serialize>(&self, data: &T) -> Result<String> {
        let out = if self.pretty {
            serde_json::to_string_pretty(data)
        } else {
            serde_json::to_string(data)
        };
        out.map_err(|e| Error::Serialize(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> std::result::Result<T, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }
}

// =============================================================================
// YAML Storage Implementation
// =============================================================================

/// YAML storage backend
#[cfg(feature = "yaml")]
#[derive(Clone, Default)]
pub struct YamlStorage;

#[cfg(feature = "yaml")]
impl YamlStorage {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "yaml")]
impl StorageBackend for YamlStorage {
    fn extension(&self) -> &str {
        "yaml"
    }

    fn serialize<T: Serialize>(&self, data: &T) -> Result<String> {
        serde_yaml::to_string(data).map_err(|e| Error::Serialize(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> std::result::Result<T, String> {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================
