//! Per-entity configuration store
//!
//! A [`ConfigStore`] owns one directory holding a record file per entity
//! (`<entity_id>.<ext>`), an eagerly loaded in-memory snapshot of all of
//! them, and an optional fallback record.
//!
//! - Reads are served from the snapshot. On a miss the fallback file is
//!   parsed fresh from disk, so edits to it apply without a restart.
//! - Every successful mutation persists the one affected entity and then
//!   re-reads the whole directory, so edits made to other files by hand or
//!   by another process show up after the next write.
//! - Mutations on one store are serialized by an internal mutex, and the
//!   snapshot is swapped whole, so readers never see a half-loaded map.
//!   No lock is taken across processes.

mod config;
mod scan;

pub use config::StoreConfig;

use crate::error::{Error, Result};
use crate::storage::{StorageBackend, TomlStorage};
use crate::sync::{MutexExt, RwLockExt};
use crate::value::{Record, Value, lookup};
use log::debug;
use std::collections::HashMap;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use self::scan::{entity_key, load_directory, record_path};

/// Action type for change callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreAction {
    /// A record file was written for an entity that had none
    Created,
    /// An existing record file was rewritten
    Updated,
    /// The entity lost its last section and its file was removed
    Deleted,
}

/// Callback for change notifications, receives the entity id
pub type ChangeCallback = Arc<dyn Fn(&str, StoreAction) + Send + Sync>;

/// Granularity of a [`ConfigStore::delete`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget<'a> {
    /// One key; its section is dropped when it becomes empty
    Key { section: &'a str, key: &'a str },
    /// A whole section
    Section(&'a str),
    /// The whole entity, removing its file
    Entity,
}

/// Layered key/value store partitioned by entity.
pub struct ConfigStore<S: StorageBackend = TomlStorage> {
    dir: PathBuf,
    extension: String,
    fallback: Option<PathBuf>,
    storage: S,

    /// Snapshot of the directory as of the last load
    records: RwLock<HashMap<String, Record>>,

    /// Held across modify, persist and reload
    write_lock: Mutex<()>,

    on_change: RwLock<Option<ChangeCallback>>,
}

impl ConfigStore<TomlStorage> {
    /// Open a TOML store over `dir` with no fallback
    ///
    /// # Errors
    ///
    /// Fails if `dir` does not exist or any record in it is malformed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::open(StoreConfig::new(dir))
    }

    /// Open a TOML store over `dir` whose misses are answered from `fallback`
    ///
    /// # Errors
    ///
    /// Fails if `dir` does not exist or any record in it is malformed.
    pub fn with_fallback(dir: impl Into<PathBuf>, fallback: impl Into<PathBuf>) -> Result<Self> {
        Self::open(StoreConfig::new(dir).with_fallback(fallback))
    }
}

impl<S: StorageBackend> ConfigStore<S> {
    /// Open a store and load every record in its directory
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory does not exist or is not a directory
    /// - The directory cannot be listed
    /// - Any record file fails to read or parse
    pub fn open(config: StoreConfig<S>) -> Result<Self> {
        let extension = config.extension().to_string();
        let StoreConfig {
            dir,
            fallback,
            storage,
            ..
        } = config;

        if !dir.is_dir() {
            return Err(Error::DirectoryNotFound(dir));
        }

        let records = load_directory(&dir, &extension, &storage)?;

        Ok(Self {
            dir,
            extension,
            fallback,
            storage,
            records: RwLock::new(records),
            write_lock: Mutex::new(()),
            on_change: RwLock::new(None),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn fallback_path(&self) -> Option<&Path> {
        self.fallback.as_deref()
    }

    /// Register a callback fired after each successful mutation
    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(&str, StoreAction) + Send + Sync + 'static,
    {
        *self.on_change.write_recovered() = Some(Arc::new(callback));
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Resolve `section.key` for an entity.
    ///
    /// Looks in the entity's record first, then in the fallback record (read
    /// from disk on each miss). Returns `Ok(None)` when neither has the key.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not a valid file stem, or if the
    /// fallback file is missing or malformed when it has to be consulted.
    pub fn get(&self, entity: impl Display, section: &str, key: &str) -> Result<Option<Value>> {
        let id = entity_key(entity)?;
        debug!("Getting {id}:{section}:{key}");

        let found = {
            let records = self.records.read_recovered();
            records
                .get(&id)
                .and_then(|record| lookup(record, section, key))
                .cloned()
        };
        if found.is_some() {
            return Ok(found);
        }

        let Some(fallback) = &self.fallback else {
            return Ok(None);
        };
        let fallback_record = self.read_fallback(fallback)?;
        let result = lookup(&fallback_record, section, key).cloned();
        if result.is_some() {
            debug!("Giving fallback result for {section}:{key}");
        }
        Ok(result)
    }

    /// Like [`get`](Self::get) but returns `default` when nothing is found
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub fn get_or(
        &self,
        entity: impl Display,
        section: &str,
        key: &str,
        default: impl Into<Value>,
    ) -> Result<Value> {
        Ok(self
            .get(entity, section, key)?
            .unwrap_or_else(|| default.into()))
    }

    /// Resolve a boolean; values of another type count as absent
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub fn get_bool(&self, entity: impl Display, section: &str, key: &str) -> Result<Option<bool>> {
        Ok(self.get(entity, section, key)?.and_then(|v| v.as_bool()))
    }

    /// Resolve an integer; values of another type count as absent
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub fn get_integer(
        &self,
        entity: impl Display,
        section: &str,
        key: &str,
    ) -> Result<Option<i64>> {
        Ok(self.get(entity, section, key)?.and_then(|v| v.as_integer()))
    }

    /// Resolve a string; values of another type count as absent
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub fn get_string(
        &self,
        entity: impl Display,
        section: &str,
        key: &str,
    ) -> Result<Option<String>> {
        Ok(self
            .get(entity, section, key)?
            .and_then(|v| v.as_str().map(str::to_owned)))
    }

    /// Copy of one entity's record from the snapshot (fallback not applied)
    pub fn record(&self, entity: impl Display) -> Option<Record> {
        let id = entity.to_string();
        self.records.read_recovered().get(&id).cloned()
    }

    pub fn contains(&self, entity: impl Display) -> bool {
        let id = entity.to_string();
        self.records.read_recovered().contains_key(&id)
    }

    /// Sorted ids of all loaded entities
    pub fn entity_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.records.read_recovered().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.records.read_recovered().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read_recovered().is_empty()
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Store `value` at `section.key` for an entity, creating the record if
    /// needed, then reload the whole directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is invalid, the entity's current file is
    /// malformed, the write fails, or the reload hits a malformed record.
    /// After a failed reload the snapshot is left as it was before the call.
    pub fn set(
        &self,
        entity: impl Display,
        section: &str,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        let id = entity_key(entity)?;
        let value = value.into();
        debug!("Setting {id}:{section}:{key} to {value} ({})", value.type_name());

        let guard = self.write_lock.lock_recovered();
        let path = self.path_for(&id);
        let existed = path.is_file();

        let mut record = self.current_record(&path)?;
        record
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value);

        self.storage.write(&path, &record)?;
        self.reload_locked()?;
        drop(guard);

        let action = if existed {
            StoreAction::Updated
        } else {
            StoreAction::Created
        };
        self.notify(&id, action);
        Ok(())
    }

    /// Remove a key, a section or a whole entity.
    ///
    /// Removing something that does not exist is a no-op and touches
    /// nothing on disk. When a record becomes empty its file is deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is invalid, the entity's current file is
    /// malformed, persisting fails, or the reload hits a malformed record.
    pub fn delete(&self, entity: impl Display, target: DeleteTarget<'_>) -> Result<()> {
        let id = entity_key(entity)?;
        debug!("Deleting {id}:{target:?}");

        let guard = self.write_lock.lock_recovered();
        let path = self.path_for(&id);

        let mut record = self.current_record(&path)?;
        let changed = match target {
            DeleteTarget::Key { section, key } => match record.get_mut(section) {
                Some(keys) => {
                    let removed = keys.remove(key).is_some();
                    if keys.is_empty() {
                        record.remove(section);
                    }
                    removed
                }
                None => false,
            },
            DeleteTarget::Section(section) => record.remove(section).is_some(),
            DeleteTarget::Entity => {
                record.clear();
                path.is_file()
            }
        };

        // The file may already lack the target after a hand edit while the
        // snapshot still holds it; the reload below drops it from memory.
        let in_snapshot = self.records.read_recovered().get(&id).is_some_and(|r| match target {
            DeleteTarget::Key { section, key } => lookup(r, section, key).is_some(),
            DeleteTarget::Section(section) => r.contains_key(section),
            DeleteTarget::Entity => true,
        });

        if !changed && !in_snapshot {
            debug!("Nothing to delete for {id}:{target:?}");
            return Ok(());
        }

        let action = if !changed {
            debug!("{id}:{target:?} already gone on disk, reloading");
            if path.is_file() {
                StoreAction::Updated
            } else {
                StoreAction::Deleted
            }
        } else if record.is_empty() {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(Error::FileDelete { path, source: e }),
            }
            StoreAction::Deleted
        } else {
            self.storage.write(&path, &record)?;
            StoreAction::Updated
        };

        self.reload_locked()?;
        drop(guard);

        self.notify(&id, action);
        Ok(())
    }

    /// Shorthand for [`delete`](Self::delete) with [`DeleteTarget::Key`]
    ///
    /// # Errors
    ///
    /// Same as [`delete`](Self::delete).
    pub fn delete_key(&self, entity: impl Display, section: &str, key: &str) -> Result<()> {
        self.delete(entity, DeleteTarget::Key { section, key })
    }

    /// Shorthand for [`delete`](Self::delete) with [`DeleteTarget::Section`]
    ///
    /// # Errors
    ///
    /// Same as [`delete`](Self::delete).
    pub fn delete_section(&self, entity: impl Display, section: &str) -> Result<()> {
        self.delete(entity, DeleteTarget::Section(section))
    }

    /// Shorthand for [`delete`](Self::delete) with [`DeleteTarget::Entity`]
    ///
    /// # Errors
    ///
    /// Same as [`delete`](Self::delete).
    pub fn delete_entity(&self, entity: impl Display) -> Result<()> {
        self.delete(entity, DeleteTarget::Entity)
    }

    /// Re-read every record in the directory, replacing the snapshot
    ///
    /// # Errors
    ///
    /// Fails on the first malformed record; the old snapshot is kept.
    pub fn reload(&self) -> Result<()> {
        let _guard = self.write_lock.lock_recovered();
        self.reload_locked()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn path_for(&self, id: &str) -> PathBuf {
        record_path(&self.dir, id, &self.extension)
    }

    /// The record to modify: the file as it is on disk now, so edits made
    /// since the last load are not overwritten.
    fn current_record(&self, path: &Path) -> Result<Record> {
        if path.is_file() {
            self.storage.read(path)
        } else {
            Ok(Record::new())
        }
    }

    /// Caller must hold `write_lock`
    fn reload_locked(&self) -> Result<()> {
        let fresh = load_directory(&self.dir, &self.extension, &self.storage)?;
        *self.records.write_recovered() = fresh;
        Ok(())
    }

    fn read_fallback(&self, path: &Path) -> Result<Record> {
        self.storage.read(path).map_err(|e| match e {
            Error::FileRead { path, source } if source.kind() == std::io::ErrorKind::NotFound => {
                Error::FallbackNotFound(path)
            }
            other => other,
        })
    }

    fn notify(&self, id: &str, action: StoreAction) {
        let callback = self.on_change.read_recovered().clone();
        if let Some(callback) = callback {
            callback(id, action);
        }
    }
}

impl<S: StorageBackend> std::fmt::Debug for ConfigStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("dir", &self.dir)
            .field("extension", &self.extension)
            .field("fallback", &self.fallback)
            .field("entities", &self.len())
            .finish_non_exhaustive()
    }
}
