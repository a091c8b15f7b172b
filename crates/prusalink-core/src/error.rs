// ── Core error types ──
//
// Consumer-facing errors from prusalink-core. These are NOT
// transport-specific -- consumers never see HTTP status codes or reqwest
// types directly. The `From<prusalink_api::Error>` impl translates
// client-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to printer at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// The printer answered, but the first refresh did not produce data.
    /// Raised only during setup; steady-state poll failures are reported
    /// through the coordinator's update outcome instead.
    #[error("Printer not ready: {message}")]
    NotReady { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to persist configuration: {message}")]
    Persist { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from client-layer errors ──────────────────────────────

impl From<prusalink_api::Error> for CoreError {
    fn from(err: prusalink_api::Error) -> Self {
        match err {
            prusalink_api::Error::InvalidAuth => CoreError::AuthenticationFailed {
                message: "Invalid authentication".into(),
            },
            prusalink_api::Error::Transport(ref e) => {
                if e.is_connect() || e.is_timeout() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                    }
                }
            }
            prusalink_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            prusalink_api::Error::Api { status, message } => CoreError::Api {
                message: format!("HTTP {status}: {message}"),
            },
            prusalink_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
