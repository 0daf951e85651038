//! Configuration store with tier-based merging.
//!
//! Loads the shipped defaults, overlays the user file key by key, and keeps
//! the merged result in memory until `save` writes it back.

use super::document::{ConfigDocument, Section};
use super::env::EnvOverrides;
use super::merge::overlay_onto;
use crate::error::ConfigResult;
use crate::paths::PathResolver;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Relative path of the template/config directory.
pub const CONFIG_DIR: &str = "config";

/// Shipped defaults, read-only.
pub const DEFAULT_CONFIG_FILE: &str = "config/config.ini";

/// User overrides, created on first save.
pub const USER_CONFIG_FILE: &str = "config/user_config.ini";

/// The section every typed setting lives in.
pub const SETTINGS_SECTION: &str = "Settings";

/// Configuration tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    /// Shipped `config/config.ini`
    Defaults = 0,
    /// `config/user_config.ini`
    User = 1,
    /// `APP_PORT` / `LITE`
    Environment = 2,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Defaults => write!(f, "defaults"),
            ConfigTier::User => write!(f, "user"),
            ConfigTier::Environment => write!(f, "environment"),
        }
    }
}

/// Merged configuration plus the context it was loaded in.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    resolver: PathResolver,
    document: ConfigDocument,
    env: EnvOverrides,
    /// Files that were found and merged, lowest tier first.
    loaded: Vec<(ConfigTier, PathBuf)>,
}

impl ConfigStore {
    /// Load for the running process: live working directory, bundle marker
    /// and environment overrides.
    pub fn load() -> Self {
        Self::load_with(PathResolver::discover(), EnvOverrides::from_env())
    }

    /// Load with an explicit resolver and environment snapshot.
    ///
    /// Never fails. Missing files are skipped; unreadable or malformed files
    /// are skipped with a warning, leaving the typed accessors on their
    /// fallback values.
    pub fn load_with(resolver: PathResolver, env: EnvOverrides) -> Self {
        let mut store = Self {
            resolver,
            document: ConfigDocument::new(),
            env,
            loaded: Vec::new(),
        };

        for (tier, relative) in [
            (ConfigTier::Defaults, DEFAULT_CONFIG_FILE),
            (ConfigTier::User, USER_CONFIG_FILE),
        ] {
            let path = store.resolver.resource_path(relative);
            if let Some(document) = read_tier(tier, &path) {
                overlay_onto(&mut store.document, document);
                store.loaded.push((tier, path));
            }
        }

        store
    }

    /// Store over an in-memory document, with no files behind it.
    pub fn from_document(document: ConfigDocument, resolver: PathResolver, env: EnvOverrides) -> Self {
        Self {
            resolver,
            document,
            env,
            loaded: Vec::new(),
        }
    }

    /// Raw merged value.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.document.get(section, key)
    }

    /// Merged value, or `None` when absent or empty.
    fn non_empty(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// String value with a fallback for absent or empty keys.
    pub fn get_str_or(&self, section: &str, key: &str, fallback: &str) -> String {
        self.non_empty(section, key).unwrap_or(fallback).to_string()
    }

    /// Boolean value using the INI boolean words (`1/yes/true/on`, `0/no/false/off`).
    pub fn get_bool_or(&self, section: &str, key: &str, fallback: bool) -> bool {
        let Some(raw) = self.non_empty(section, key) else {
            return fallback;
        };
        match parse_bool(raw) {
            Some(value) => value,
            None => {
                warn!(section, key, value = raw, "Not a boolean, using fallback {}", fallback);
                fallback
            }
        }
    }

    /// Any `FromStr` value with a fallback for absent, empty or unparseable keys.
    pub fn get_parsed_or<T>(&self, section: &str, key: &str, fallback: T) -> T
    where
        T: FromStr + std::fmt::Debug,
    {
        let Some(raw) = self.non_empty(section, key) else {
            return fallback;
        };
        match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(section, key, value = raw, "Invalid value, using fallback {:?}", fallback);
                fallback
            }
        }
    }

    /// Set a value in memory. Nothing is written until [`save`](Self::save).
    ///
    /// Multi-line values are rejected. Surrounding spaces in the value are
    /// dropped when the saved file is next loaded.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) -> ConfigResult<()> {
        self.document.set(section, key, value)
    }

    /// Write the whole merged configuration to the user file.
    ///
    /// The target is always resolved against the working directory, never
    /// the bundle. Returns the path written.
    pub fn save(&self) -> ConfigResult<PathBuf> {
        let path = self.user_config_path();
        self.document.write_to(&path)?;
        info!(path = %path.display(), "Saved configuration");
        Ok(path)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.document.section(name)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.document.has_section(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.document.sections()
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn env(&self) -> &EnvOverrides {
        &self.env
    }

    /// Files merged into this store, lowest tier first.
    pub fn loaded_files(&self) -> &[(ConfigTier, PathBuf)] {
        &self.loaded
    }

    /// Where the defaults are read from.
    pub fn default_config_path(&self) -> PathBuf {
        self.resolver.resource_path(DEFAULT_CONFIG_FILE)
    }

    /// Where `save` writes to.
    pub fn user_config_path(&self) -> PathBuf {
        self.resolver.persistent_path(USER_CONFIG_FILE)
    }
}

fn read_tier(tier: ConfigTier, path: &Path) -> Option<ConfigDocument> {
    if !path.exists() {
        debug!(%tier, path = %path.display(), "Config file not present");
        return None;
    }
    match ConfigDocument::load(path) {
        Ok(document) => {
            debug!(%tier, path = %path.display(), "Loaded config file");
            Some(document)
        }
        Err(e) => {
            warn!(%tier, "Skipping config file: {}", e);
            None
        }
    }
}

/// Parse an INI boolean word, case-insensitively.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DEFAULT_INI: &str = "[Settings]\n\
        open_service = false\n\
        ipv_type = ipv4\n\
        urls_limit = 20\n\
        min_resolution = 1280x720\n";

    const USER_INI: &str = "[Settings]\n\
        open_service = true\n\
        ipv_type = 全部\n\
        urls_limit = 50\n";

    fn write_config(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn load_from(root: &Path) -> ConfigStore {
        ConfigStore::load_with(PathResolver::new(root, None), EnvOverrides::default())
    }

    #[test]
    fn test_load_without_files_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = load_from(temp.path());

        assert!(store.document().is_empty());
        assert!(store.loaded_files().is_empty());
    }

    #[test]
    fn test_user_overrides_defaults_key_by_key() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), DEFAULT_CONFIG_FILE, DEFAULT_INI);
        write_config(temp.path(), USER_CONFIG_FILE, USER_INI);

        let store = load_from(temp.path());

        assert_eq!(store.get("Settings", "open_service"), Some("true"));
        assert_eq!(store.get("Settings", "urls_limit"), Some("50"));
        assert_eq!(store.get("Settings", "min_resolution"), Some("1280x720"));
        assert_eq!(store.loaded_files().len(), 2);
        assert_eq!(store.loaded_files()[1].0, ConfigTier::User);
    }

    #[test]
    fn test_defaults_read_from_bundle() {
        let temp = TempDir::new().unwrap();
        let bundle = temp.path().join("bundle");
        write_config(&bundle, DEFAULT_CONFIG_FILE, DEFAULT_INI);

        let store = ConfigStore::load_with(
            PathResolver::new(temp.path().join("cwd"), Some(bundle.clone())),
            EnvOverrides::default(),
        );

        assert_eq!(store.get("Settings", "ipv_type"), Some("ipv4"));
        assert_eq!(store.default_config_path(), bundle.join(DEFAULT_CONFIG_FILE));
        assert_eq!(
            store.user_config_path(),
            temp.path().join("cwd").join(USER_CONFIG_FILE)
        );
    }

    #[test]
    fn test_malformed_file_is_skipped() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), DEFAULT_CONFIG_FILE, DEFAULT_INI);
        write_config(temp.path(), USER_CONFIG_FILE, "[Settings\nbroken");

        let store = load_from(temp.path());

        assert_eq!(store.get("Settings", "open_service"), Some("false"));
        assert_eq!(store.loaded_files().len(), 1);
    }

    #[test]
    fn test_typed_getters() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            DEFAULT_CONFIG_FILE,
            "[Settings]\nflag = On\nbad_flag = maybe\ncount = 7\nbad_count = seven\nempty =\n",
        );
        let store = load_from(temp.path());

        assert!(store.get_bool_or("Settings", "flag", false));
        assert!(store.get_bool_or("Settings", "bad_flag", true));
        assert_eq!(store.get_parsed_or("Settings", "count", 1usize), 7);
        assert_eq!(store.get_parsed_or("Settings", "bad_count", 1usize), 1);
        assert_eq!(store.get_str_or("Settings", "empty", "fallback"), "fallback");
        assert_eq!(store.get_str_or("Missing", "key", "x"), "x");
    }

    #[test]
    fn test_set_then_save_writes_user_file() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), DEFAULT_CONFIG_FILE, DEFAULT_INI);

        let mut store = load_from(temp.path());
        store.set("Settings", "test_key", "test_value").unwrap();
        let path = store.save().unwrap();

        assert_eq!(path, temp.path().join(USER_CONFIG_FILE));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("test_key = test_value"));
        assert!(content.contains("min_resolution = 1280x720"));
    }

    #[test]
    fn test_save_creates_config_dir() {
        let temp = TempDir::new().unwrap();
        let mut store = load_from(temp.path());
        store.set("Settings", "open_rtmp", "true").unwrap();

        store.save().unwrap();

        let reloaded = load_from(temp.path());
        assert_eq!(reloaded.get("Settings", "open_rtmp"), Some("true"));
    }

    #[test]
    fn test_parse_bool_words() {
        for word in ["1", "yes", "TRUE", "on"] {
            assert_eq!(parse_bool(word), Some(true), "{word}");
        }
        for word in ["0", "No", "false", "OFF"] {
            assert_eq!(parse_bool(word), Some(false), "{word}");
        }
        assert_eq!(parse_bool("enabled"), None);
    }
}
