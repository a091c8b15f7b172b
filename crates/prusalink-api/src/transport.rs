// Shared transport configuration for building reqwest::Client instances.
//
// The printer serves plain HTTP on the LAN, so there is no TLS knob here;
// what remains shared between the core's probe client and the long-lived
// polling client is the timeout and user agent.

use std::time::Duration;

/// Transport configuration for building HTTP clients.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    /// Per-request timeout. `None` leaves requests unbounded; callers that
    /// need a bound (the polling coordinators do) impose their own.
    pub timeout: Option<Duration>,
}

impl TransportConfig {
    /// Create a config with the given per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let mut builder = reqwest::Client::builder().user_agent("prusalink-rs/0.1.0");

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().map_err(crate::error::Error::Transport)
    }
}
