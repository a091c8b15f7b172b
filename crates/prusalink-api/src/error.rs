use thiserror::Error;

/// Top-level error type for the `prusalink-api` crate.
///
/// Covers every failure mode of the printer's local HTTP API.
/// `prusalink-core` maps these into its own consumer-facing variants;
/// nothing downstream should need to inspect `reqwest` types directly.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The printer rejected the request credentials (HTTP 401/403).
    ///
    /// Raised both for a wrong API key (firmware < 5.1) and for wrong
    /// username/password digest credentials (firmware >= 5.1).
    #[error("Invalid authentication")]
    InvalidAuth,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-success response from the printer.
    #[error("Printer API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates rejected credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::InvalidAuth)
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
