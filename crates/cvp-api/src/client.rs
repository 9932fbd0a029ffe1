// CVP HTTP client
//
// Wraps `reqwest::Client` with CloudVision-specific URL construction,
// cookie-based bearer auth, and NDJSON body handling. The workspace
// transaction machinery lives in `workspace.rs` as inherent methods,
// keeping this module focused on transport mechanics.

use std::sync::Arc;

use reqwest::cookie::Jar;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::ndjson;
use crate::transport::{AcceptPayload, TransportConfig};

/// Controller resource paths, relative to the base URL.
pub mod paths {
    pub const INVENTORY: &str = "api/resources/inventory/v1/Device/all";
    pub const EVENTS: &str = "api/resources/event/v1/Event/all";
    pub const CONNECTIVITY_MONITOR: &str = "api/resources/connectivitymonitor/v1/ProbeStats/all";
    pub const TAG_CONFIG: &str = "api/resources/tag/v2/TagConfig";
    pub const WORKSPACE_CONFIG: &str = "api/resources/workspace/v1/WorkspaceConfig";
    pub const WORKSPACE: &str = "api/resources/workspace/v1/Workspace";
}

/// Async client for the CloudVision controller REST API.
///
/// Authenticates with a pre-obtained bearer token carried as the
/// `access_token` session cookie on every request; the jar is seeded
/// once at construction, so the secret is exposed in exactly one place.
pub struct CvpClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CvpClient {
    /// Build a client for the controller at `base_url`.
    ///
    /// The `base_url` should be the controller root (e.g.
    /// `https://cvp.example.com`). A trailing slash is normalized on.
    pub fn new(
        base_url: Url,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let base_url = normalize_base_url(base_url);

        let jar = Arc::new(Jar::default());
        jar.add_cookie_str(
            &format!("access_token={}", token.expose_secret()),
            &base_url,
        );

        let http = transport.build_client(jar)?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages the cookie).
    pub fn from_reqwest(base_url: Url, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
        }
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Join a relative resource path onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(Error::InvalidUrl)
    }

    /// Send a GET and return the raw response body.
    ///
    /// HTTP 204 is a valid empty result, not an error. A non-2xx
    /// response becomes `Error::Api`; connectivity failures surface as
    /// `Error::Transport` for the dispatch boundary to act on.
    pub async fn get_raw(&self, path: &str, accept: AcceptPayload) -> Result<String, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, accept.header_value())
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status == reqwest::StatusCode::NO_CONTENT {
            debug!("empty response (204 No Content)");
            return Ok(String::new());
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: body.get(..200).unwrap_or(&body).to_owned(),
            });
        }

        resp.text().await.map_err(Error::Transport)
    }

    /// Send a POST with a JSON body and decode the JSON response.
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .header(reqwest::header::ACCEPT, AcceptPayload::Json.header_value())
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: body.get(..200).unwrap_or(&body).to_owned(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| {
            let preview = body.get(..200).unwrap_or(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    // ── Read path ────────────────────────────────────────────────────

    /// Fetch a named resource collection as an ordered NDJSON sequence.
    ///
    /// The read-tool contract is deliberately narrower than the write
    /// path's: any transport or API failure is downgraded to `None`
    /// with a diagnostic, so callers degrade to an empty result rather
    /// than aborting.
    pub async fn fetch_collection(&self, path: &str) -> Option<Vec<Value>> {
        self.fetch_collection_as(path, AcceptPayload::Json).await
    }

    /// `fetch_collection` with an explicit `Accept` flavor (geo reads).
    pub async fn fetch_collection_as(
        &self,
        path: &str,
        accept: AcceptPayload,
    ) -> Option<Vec<Value>> {
        match self.get_raw(path, accept).await {
            Ok(body) => Some(ndjson::decode(&body)),
            Err(e) => {
                warn!("read of {path} failed, degrading to empty result: {e}");
                None
            }
        }
    }

    /// All devices known to the controller.
    pub async fn inventory(&self) -> Option<Vec<Value>> {
        self.fetch_collection(paths::INVENTORY).await
    }

    /// All controller events.
    pub async fn events(&self) -> Option<Vec<Value>> {
        self.fetch_collection(paths::EVENTS).await
    }

    /// Connectivity monitor probe stats (jitter, latency, packet loss,
    /// HTTP response time).
    pub async fn connectivity_monitor(&self) -> Option<Vec<Value>> {
        self.fetch_collection(paths::CONNECTIVITY_MONITOR).await
    }
}

/// Ensure the base URL ends with a trailing slash so relative joins work.
fn normalize_base_url(mut url: Url) -> Url {
    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    url
}
