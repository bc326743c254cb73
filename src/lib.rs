//! # lorelei-config
//!
//! Layered per-entity configuration storage for a chat bot.
//!
//! ## Features
//!
//! - **One file per entity**: each guild, user or locale owns a record file
//!   (`data/guilds/<id>.toml`) made of named sections of scalar keys
//! - **Fallback lookup**: a store can answer misses from a single default
//!   record, re-read on every miss so edits apply live
//! - **Reload after write**: every `set`/`delete` re-reads the whole store
//!   directory, picking up hand edits to other records
//! - **Formats**: TOML by default, JSON and YAML behind features
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lorelei_config::Stores;
//!
//! # fn example() -> lorelei_config::Result<()> {
//! let stores = Stores::open_dir("data")?;
//!
//! // Admin command: toggle invite blocking for a guild
//! stores.guilds.set(1234567890_u64, "Security", "anti-invite", true)?;
//!
//! // Message handler: check the toggle
//! let block = stores
//!     .guilds
//!     .get_bool(1234567890_u64, "Security", "anti-invite")?
//!     .unwrap_or(false);
//!
//! // Reply in the user's language, falling back to lang/en.toml
//! let text = stores.localized_text(42_u64, "Responds", "greeting")?;
//! # let _ = (block, text);
//! # Ok(())
//! # }
//! ```
//!
//! ## Standalone Stores
//!
//! ```rust,no_run
//! use lorelei_config::{ConfigStore, DeleteTarget};
//!
//! # fn example() -> lorelei_config::Result<()> {
//! let lang = ConfigStore::with_fallback("data/lang", "data/lang/en.toml")?;
//! let hi = lang.get_or("de", "Responds", "greeting", "hello")?;
//!
//! lang.delete("de", DeleteTarget::Section("Responds"))?;
//! # let _ = hi;
//! # Ok(())
//! # }
//! ```

mod error;
pub mod storage;
mod store;
mod stores;
mod sync;
mod value;

pub use error::{Error, Result};
pub use storage::{StorageBackend, TomlStorage};
pub use store::{ChangeCallback, ConfigStore, DeleteTarget, StoreAction, StoreConfig};
pub use stores::{
    DATA_DIR_ENV, EnvSource, LANGUAGE_KEY, LANGUAGE_SECTION, ProcessEnv, Stores, StoresConfig,
};
pub use value::{Record, Section, Value};

#[cfg(feature = "json")]
pub use storage::JsonStorage;

#[cfg(feature = "yaml")]
pub use storage::YamlStorage;
