// Authentication schemes for the PrusaLink API.
//
// Firmware < 5.1 accepts an `X-Api-Key` header; firmware >= 5.1 requires
// username/password auth where the username is fixed by the firmware.

use secrecy::{ExposeSecret, SecretString};

/// How to authenticate with the printer.
#[derive(Debug, Clone)]
pub enum Auth {
    /// `X-Api-Key` header (firmware < 5.1).
    ApiKey(SecretString),
    /// Username/password auth (firmware >= 5.1).
    Credentials {
        username: String,
        password: SecretString,
    },
}

impl Auth {
    /// Apply this auth scheme to an outgoing request.
    pub(crate) fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::ApiKey(key) => request.header("X-Api-Key", key.expose_secret()),
            Self::Credentials { username, password } => {
                request.basic_auth(username, Some(password.expose_secret()))
            }
        }
    }
}
