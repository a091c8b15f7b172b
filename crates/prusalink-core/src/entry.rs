// ── Stored config entries ──
//
// A `ConfigEntry` is the runtime view of one persisted printer entry.
// It carries credential data but never touches disk -- persistence goes
// through the `EntryStore` trait, implemented by the host framework or
// by prusalink-config's file-backed store.

use secrecy::SecretString;
use url::Url;

use prusalink_api::{Auth, PrusaLink, TransportConfig};

use crate::error::CoreError;

/// The schema version written by this release.
///
/// Version 1 entries carry an API key; version 2 entries carry
/// username/password credentials. There is no version 3 yet.
pub const CONFIG_VERSION: u32 = 2;

/// One stored printer configuration entry.
#[derive(Debug, Clone)]
pub struct ConfigEntry {
    /// Display name, also the persistence key and the `entry_title`
    /// placeholder on diagnostic issues.
    pub title: String,
    /// Printer base URL, e.g. `http://192.168.1.50`.
    pub host: String,
    /// Credential schema version.
    pub version: u32,
    /// API key (version 1 entries only).
    pub api_key: Option<SecretString>,
    /// Username (version 2 entries only).
    pub username: Option<String>,
    /// Password (version 2 entries only).
    pub password: Option<SecretString>,
}

impl ConfigEntry {
    /// Parse the stored host into a URL.
    pub fn base_url(&self) -> Result<Url, CoreError> {
        Url::parse(&self.host).map_err(|e| CoreError::Config {
            message: format!("invalid host URL '{}': {e}", self.host),
        })
    }

    /// Resolve the auth scheme matching this entry's schema version.
    pub fn auth(&self) -> Result<Auth, CoreError> {
        if self.version >= 2 {
            let username = self.username.clone().ok_or_else(|| CoreError::Config {
                message: format!("version {} entry is missing a username", self.version),
            })?;
            let password = self.password.clone().ok_or_else(|| CoreError::Config {
                message: format!("version {} entry is missing a password", self.version),
            })?;
            Ok(Auth::Credentials { username, password })
        } else {
            let key = self.api_key.clone().ok_or_else(|| CoreError::Config {
                message: "version 1 entry is missing an api_key".into(),
            })?;
            Ok(Auth::ApiKey(key))
        }
    }

    /// Build a client for the printer this entry describes.
    pub fn build_api(&self, transport: &TransportConfig) -> Result<PrusaLink, CoreError> {
        PrusaLink::new(self.base_url()?, self.auth()?, transport).map_err(CoreError::from)
    }
}
