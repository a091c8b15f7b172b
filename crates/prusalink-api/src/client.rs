// PrusaLink HTTP client
//
// Wraps `reqwest::Client` with base-URL handling, per-request auth, and
// status-code translation. Endpoint methods live in the `printer` and
// `job` modules as inherent impls to keep this module focused on
// transport mechanics.

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::Auth;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for a PrusaLink printer.
///
/// Cheap to share behind an `Arc`; `reqwest::Client` is safe for
/// concurrent use, so multiple pollers can hold the same instance.
#[derive(Debug)]
pub struct PrusaLink {
    http: reqwest::Client,
    base_url: Url,
    auth: Auth,
}

impl PrusaLink {
    /// Create a new client for the printer at `base_url`.
    pub fn new(base_url: Url, auth: Auth, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, auth: Auth) -> Self {
        Self {
            http,
            base_url,
            auth,
        }
    }

    /// The printer base URL.
    pub fn host(&self) -> &Url {
        &self.base_url
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Build a full URL for an API path relative to the printer root.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(Error::InvalidUrl)
    }

    /// Send a GET request and deserialize the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.api_url(path)?;
        debug!("GET {}", url);

        let resp = self
            .auth
            .apply(self.http.get(url))
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::parse_json(resp).await
    }

    /// Send a GET request where `204 No Content` is a valid answer.
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, Error> {
        let url = self.api_url(path)?;
        debug!("GET {}", url);

        let resp = self
            .auth
            .apply(self.http.get(url))
            .send()
            .await
            .map_err(Error::Transport)?;

        if resp.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }

        Self::parse_json(resp).await.map(Some)
    }

    /// Send a bodyless command request, expecting a 2xx answer.
    pub(crate) async fn send_command(&self, method: Method, path: &str) -> Result<(), Error> {
        let url = self.api_url(path)?;
        debug!("{} {}", method, url);

        let resp = self
            .auth
            .apply(self.http.request(method, url))
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::check_status(&resp)?;
        Ok(())
    }

    /// Translate the response status, then deserialize the body.
    async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        Self::check_status(&resp)?;

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// Map 401/403 to [`Error::InvalidAuth`] and any other non-2xx
    /// status to [`Error::Api`].
    fn check_status(resp: &reqwest::Response) -> Result<(), Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::InvalidAuth);
        }

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected response")
                    .to_owned(),
            });
        }

        Ok(())
    }
}
