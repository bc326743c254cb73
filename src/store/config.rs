use crate::storage::{StorageBackend, TomlStorage};
use std::path::PathBuf;

/// Configuration for one [`ConfigStore`](super::ConfigStore).
///
/// # Example
///
/// ```rust,no_run
/// use lorelei_config::{ConfigStore, StoreConfig};
///
/// let lang = ConfigStore::open(
///     StoreConfig::new("data/lang").with_fallback("data/lang/en.toml"),
/// )?;
/// # Ok::<(), lorelei_config::Error>(())
/// ```
#[derive(Clone)]
pub struct StoreConfig<S: StorageBackend = TomlStorage> {
    /// Directory holding one record file per entity
    pub dir: PathBuf,

    /// Record consulted when a key is missing for the requested entity
    pub fallback: Option<PathBuf>,

    /// File extension for records (default: derived from storage backend)
    pub extension: Option<String>,

    /// Serialization format of the record files
    pub storage: S,
}

impl StoreConfig<TomlStorage> {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            fallback: None,
            extension: None,
            storage: TomlStorage::new(),
        }
    }
}

impl<S: StorageBackend> StoreConfig<S> {
    #[must_use]
    pub fn with_fallback(mut self, file: impl Into<PathBuf>) -> Self {
        self.fallback = Some(file.into());
        self
    }

    #[must_use]
    pub fn with_extension(mut self, ext: impl Into<String>) -> Self {
        self.extension = Some(ext.into());
        self
    }

    /// Switch the record format, keeping directory and fallback
    #[must_use]
    pub fn with_storage<T: StorageBackend>(self, storage: T) -> StoreConfig<T> {
        StoreConfig {
            dir: self.dir,
            fallback: self.fallback,
            extension: self.extension,
            storage,
        }
    }

    /// Effective record extension, without the leading dot
    pub fn extension(&self) -> &str {
        self.extension
            .as_deref()
            .unwrap_or_else(|| self.storage.extension())
            .trim_start_matches('.')
    }
}
