//! Persisted configuration for PrusaLink printers.
//!
//! TOML printer entries, load/save, and translation to
//! `prusalink_core::ConfigEntry`. The entries are versioned: version 1
//! carries an API key, version 2 username/password. The core's
//! migration rewrites entries through [`FileEntryStore`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use prusalink_core::{ConfigEntry, CoreError, EntryStore};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Printer used when no `--printer` flag is given.
    pub default_printer: Option<String>,

    /// Named printer entries.
    #[serde(default)]
    pub printers: HashMap<String, PrinterEntry>,
}

/// One named printer entry as stored on disk.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PrinterEntry {
    /// Printer base URL (e.g., "http://192.168.1.50").
    pub host: String,

    /// Credential schema version. Entries written before the firmware
    /// 5.1 change have no version field and default to 1.
    #[serde(default = "default_version")]
    pub version: u32,

    /// API key (version 1 entries).
    pub api_key: Option<String>,

    /// Username (version 2 entries).
    pub username: Option<String>,

    /// Password (version 2 entries; plaintext — the printer is on the
    /// same LAN and the original entry stored the API key the same way).
    pub password: Option<String>,

    /// Per-request timeout override, in seconds.
    pub timeout: Option<u64>,
}

fn default_version() -> u32 {
    1
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "prusalink-rs", "prusalink").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("prusalink");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from a specific file + environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PRUSALINK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load the full Config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to the given path.
pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write it to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(&config_path(), cfg)
}

// ── Translation to/from core entries ────────────────────────────────

/// Build the core's runtime entry from a stored printer entry.
pub fn to_core_entry(name: &str, entry: &PrinterEntry) -> Result<ConfigEntry, ConfigError> {
    if entry.host.is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: format!("printer '{name}' has no host"),
        });
    }

    Ok(ConfigEntry {
        title: name.to_owned(),
        host: entry.host.clone(),
        version: entry.version,
        api_key: entry.api_key.clone().map(SecretString::from),
        username: entry.username.clone(),
        password: entry.password.clone().map(SecretString::from),
    })
}

impl PrinterEntry {
    /// Overwrite this entry's connection data from a core entry,
    /// keeping local-only fields (the timeout override) intact.
    fn absorb(&mut self, entry: &ConfigEntry) {
        self.host.clone_from(&entry.host);
        self.version = entry.version;
        self.api_key = entry
            .api_key
            .as_ref()
            .map(|k| k.expose_secret().to_owned());
        self.username.clone_from(&entry.username);
        self.password = entry
            .password
            .as_ref()
            .map(|p| p.expose_secret().to_owned());
    }
}

// ── File-backed entry store ─────────────────────────────────────────

/// [`EntryStore`] over the TOML config file: rewrites one named entry
/// in place. This is what hands the core's migration its persistence.
#[derive(Debug, Clone)]
pub struct FileEntryStore {
    path: PathBuf,
}

impl FileEntryStore {
    /// Store over a specific config file.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store over the canonical config path.
    pub fn canonical() -> Self {
        Self::new(config_path())
    }
}

impl EntryStore for FileEntryStore {
    fn update(&self, entry: &ConfigEntry) -> Result<(), CoreError> {
        let mut cfg = load_config_from(&self.path).map_err(|e| CoreError::Persist {
            message: e.to_string(),
        })?;

        cfg.printers
            .entry(entry.title.clone())
            .or_default()
            .absorb(entry);

        save_config_to(&self.path, &cfg).map_err(|e| CoreError::Persist {
            message: e.to_string(),
        })
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::SecretString;

    use super::*;

    fn sample_config() -> Config {
        let mut printers = HashMap::new();
        printers.insert(
            "workshop".to_owned(),
            PrinterEntry {
                host: "http://192.168.1.50".into(),
                version: 1,
                api_key: Some("K".into()),
                username: None,
                password: None,
                timeout: Some(10),
            },
        );
        printers.insert(
            "office".to_owned(),
            PrinterEntry {
                host: "http://192.168.1.60".into(),
                version: 2,
                api_key: None,
                username: Some("maker".into()),
                password: Some("P".into()),
                timeout: None,
            },
        );
        Config {
            default_printer: Some("workshop".into()),
            printers,
        }
    }

    #[test]
    fn round_trip_preserves_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        save_config_to(&path, &sample_config()).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded.default_printer.as_deref(), Some("workshop"));
        assert_eq!(loaded.printers.len(), 2);
        let workshop = &loaded.printers["workshop"];
        assert_eq!(workshop.version, 1);
        assert_eq!(workshop.api_key.as_deref(), Some("K"));
        assert_eq!(workshop.timeout, Some(10));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("nope.toml")).unwrap();
        assert!(cfg.printers.is_empty());
    }

    #[test]
    fn version_defaults_to_1_for_old_entries() {
        let entry: PrinterEntry = toml::from_str(
            r#"
            host = "http://192.168.1.50"
            api_key = "K"
            "#,
        )
        .unwrap();

        assert_eq!(entry.version, 1);
    }

    #[test]
    fn to_core_entry_maps_credentials() {
        let cfg = sample_config();
        let core = to_core_entry("office", &cfg.printers["office"]).unwrap();

        assert_eq!(core.title, "office");
        assert_eq!(core.version, 2);
        assert_eq!(core.username.as_deref(), Some("maker"));
        assert!(core.api_key.is_none());
    }

    #[test]
    fn to_core_entry_rejects_empty_host() {
        let entry = PrinterEntry::default();
        assert!(matches!(
            to_core_entry("workshop", &entry),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn file_entry_store_rewrites_one_entry_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        save_config_to(&path, &sample_config()).unwrap();

        let migrated = ConfigEntry {
            title: "workshop".into(),
            host: "http://192.168.1.50".into(),
            version: 2,
            api_key: None,
            username: Some("maker".into()),
            password: Some(SecretString::from("K".to_owned())),
        };

        let store = FileEntryStore::new(path.clone());
        store.update(&migrated).unwrap();

        let reloaded = load_config_from(&path).unwrap();
        let workshop = &reloaded.printers["workshop"];
        assert_eq!(workshop.version, 2);
        assert_eq!(workshop.username.as_deref(), Some("maker"));
        assert_eq!(workshop.password.as_deref(), Some("K"));
        assert_eq!(workshop.api_key, None);
        assert_eq!(workshop.timeout, Some(10), "local fields must survive");

        // The other printer is untouched.
        assert_eq!(reloaded.printers["office"].host, "http://192.168.1.60");
    }
}
