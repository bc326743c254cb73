//! The bot's three configuration namespaces
//!
//! [`Stores`] bundles the guild, user and language stores that command
//! handlers receive by reference. It is built once at startup from a
//! [`StoresConfig`]; a missing directory or default-locale file is fatal.
//!
//! Layout under the data directory (default `data`):
//!
//! ```text
//! data/
//! ├── guilds/<guild_id>.toml
//! ├── users/<user_id>.toml
//! └── lang/<locale>.toml     (lang/en.toml is the fallback)
//! ```

use crate::error::{Error, Result};
use crate::storage::TomlStorage;
use crate::store::{ConfigStore, StoreConfig};
use crate::value::Value;
use log::{debug, info};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "LORELEI_DATA_DIR";

/// Section and key of the user's preferred locale in the user store
pub const LANGUAGE_SECTION: &str = "Appearance";
pub const LANGUAGE_KEY: &str = "language";

/// Source of environment variables, swappable in tests
pub trait EnvSource: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.is_empty())
    }
}

/// Where the three stores live on disk
#[derive(Clone)]
pub struct StoresConfig {
    data_dir: Option<PathBuf>,
    guilds_dir: String,
    users_dir: String,
    lang_dir: String,
    default_locale: String,
    env: Arc<dyn EnvSource>,
}

impl Default for StoresConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            guilds_dir: "guilds".into(),
            users_dir: "users".into(),
            lang_dir: "lang".into(),
            default_locale: "en".into(),
            env: Arc::new(ProcessEnv),
        }
    }
}

impl StoresConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the data directory. Supports `~` expansion for home directory.
    ///
    /// An explicit directory wins over [`DATA_DIR_ENV`].
    #[must_use]
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(expand_home(path.into()));
        self
    }

    #[must_use]
    pub fn guilds_dir(mut self, name: impl Into<String>) -> Self {
        self.guilds_dir = name.into();
        self
    }

    #[must_use]
    pub fn users_dir(mut self, name: impl Into<String>) -> Self {
        self.users_dir = name.into();
        self
    }

    #[must_use]
    pub fn lang_dir(mut self, name: impl Into<String>) -> Self {
        self.lang_dir = name.into();
        self
    }

    /// Locale whose file answers language-store misses (default: `en`)
    #[must_use]
    pub fn default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    #[must_use]
    pub fn with_env_source(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Effective data directory: explicit, then env, then `data`
    pub fn resolved_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        match self.env.var(DATA_DIR_ENV) {
            Some(dir) => expand_home(PathBuf::from(dir)),
            None => PathBuf::from("data"),
        }
    }
}

fn expand_home(path: PathBuf) -> PathBuf {
    if !path.starts_with("~") {
        return path;
    }
    match dirs::home_dir() {
        Some(home) => home.join(path.strip_prefix("~").unwrap_or(&path)),
        None => path,
    }
}

/// Guild settings, user settings and the translation table.
#[derive(Debug)]
pub struct Stores {
    pub guilds: ConfigStore<TomlStorage>,
    pub users: ConfigStore<TomlStorage>,
    pub lang: ConfigStore<TomlStorage>,
    default_locale: String,
}

impl Stores {
    /// Open all three stores.
    ///
    /// # Errors
    ///
    /// Returns an error if any store directory is missing, the default
    /// locale file is missing, or any record fails to parse.
    pub fn open(config: &StoresConfig) -> Result<Self> {
        let data_dir = config.resolved_data_dir();
        let lang_dir = data_dir.join(&config.lang_dir);
        let fallback = lang_dir.join(format!("{}.toml", config.default_locale));

        if !fallback.is_file() {
            return Err(Error::FallbackNotFound(fallback));
        }

        let guilds = ConfigStore::open(StoreConfig::new(data_dir.join(&config.guilds_dir)))?;
        let users = ConfigStore::open(StoreConfig::new(data_dir.join(&config.users_dir)))?;
        let lang = ConfigStore::open(StoreConfig::new(lang_dir).with_fallback(fallback))?;

        info!(
            "Opened config stores in {}: {} guilds, {} users, {} languages",
            data_dir.display(),
            guilds.len(),
            users.len(),
            lang.len()
        );

        Ok(Self {
            guilds,
            users,
            lang,
            default_locale: config.default_locale.clone(),
        })
    }

    /// Open with the default layout under `data_dir`
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open).
    pub fn open_dir(data_dir: impl AsRef<Path>) -> Result<Self> {
        Self::open(&StoresConfig::new().data_dir(data_dir.as_ref()))
    }

    /// The user's chosen locale, or the default locale when unset
    ///
    /// # Errors
    ///
    /// Returns an error if the user id is invalid.
    pub fn user_locale(&self, user: impl Display) -> Result<String> {
        let locale = self
            .users
            .get_string(user, LANGUAGE_SECTION, LANGUAGE_KEY)?
            .unwrap_or_else(|| self.default_locale.clone());
        Ok(locale)
    }

    /// Translate `section.key` into the user's language.
    ///
    /// Missing translations come from the default locale file. Returns
    /// `None` if the default locale lacks the key too.
    ///
    /// # Errors
    ///
    /// Returns an error if an id is invalid or the default locale file
    /// cannot be read.
    pub fn localized(&self, user: impl Display, section: &str, key: &str) -> Result<Option<Value>> {
        let locale = self.user_locale(user)?;
        debug!("Localizing {section}:{key} for locale {locale}");
        self.lang.get(&locale, section, key)
    }

    /// Like [`localized`](Self::localized), rendered to a string with a
    /// fallback of `section.key` so a missing translation is visible
    ///
    /// # Errors
    ///
    /// Same as [`localized`](Self::localized).
    pub fn localized_text(&self, user: impl Display, section: &str, key: &str) -> Result<String> {
        Ok(self
            .localized(user, section, key)?
            .map_or_else(|| format!("{section}.{key}"), |v| v.to_string()))
    }

    /// Locale tags that have a translation file
    pub fn available_languages(&self) -> Vec<String> {
        self.lang.entity_ids()
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeEnv(HashMap<String, String>);

    impl EnvSource for FakeEnv {
        fn var(&self, name: &str) -> Option<String> {
            self.0.get(name).cloned()
        }
    }

    fn fake_env(dir: &str) -> FakeEnv {
        FakeEnv(HashMap::from([(DATA_DIR_ENV.to_string(), dir.to_string())]))
    }

    #[test]
    fn test_data_dir_defaults_to_data() {
        let config = StoresConfig::new().with_env_source(FakeEnv(HashMap::new()));
        assert_eq!(config.resolved_data_dir(), PathBuf::from("data"));
    }

    #[test]
    fn test_env_overrides_default_data_dir() {
        let config = StoresConfig::new().with_env_source(fake_env("/srv/bot"));
        assert_eq!(config.resolved_data_dir(), PathBuf::from("/srv/bot"));
    }

    #[test]
    fn test_explicit_data_dir_beats_env() {
        let config = StoresConfig::new()
            .with_env_source(fake_env("/srv/bot"))
            .data_dir("/opt/lorelei");
        assert_eq!(config.resolved_data_dir(), PathBuf::from("/opt/lorelei"));
    }

    #[test]
    fn test_tilde_expansion() {
        if let Some(home) = dirs::home_dir() {
            let config = StoresConfig::new().data_dir("~/bot-data");
            assert_eq!(config.resolved_data_dir(), home.join("bot-data"));
        }
    }
}
