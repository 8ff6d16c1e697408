//! HTTP access to the bridge resource API.

use std::time::Duration;

use reqwest::Url;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::BridgeTarget;
use crate::error::FetchError;
use crate::resource::{Resource, ResourceList, ResourceType};

/// Header carrying the application key on every request.
pub const APPLICATION_KEY_HEADER: &str = "hue-application-key";

/// Resource API client shared by all bridges of a poller.
///
/// The underlying HTTP client is built on first use and reused afterwards.
/// Bridges serve self-signed certificates, so certificate verification is
/// off.
#[derive(Debug)]
pub struct HueClient {
    timeout: Duration,
    debug: bool,
    http: OnceCell<reqwest::Client>,
}

impl HueClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            debug: false,
            http: OnceCell::new(),
        }
    }

    /// Log every request at info level instead of debug.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Fetch the full collection of `T` from a bridge.
    pub async fn fetch<T: Resource>(&self, target: &BridgeTarget) -> Result<Vec<T>, FetchError> {
        let url = resource_url(&target.url, T::KIND)?;
        let http = self.http().await?;

        if self.debug {
            info!(url = %url, kind = %T::KIND, "Fetching resources");
        } else {
            debug!(url = %url, kind = %T::KIND, "Fetching resources");
        }

        let response = http
            .get(url.clone())
            .header(APPLICATION_KEY_HEADER, &target.application_key)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let list: ResourceList<T> =
            serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
                url: url.to_string(),
                source,
            })?;

        for error in &list.errors {
            debug!(url = %url, error = %error.description, "Bridge reported an error");
        }

        Ok(list.data)
    }

    async fn http(&self) -> Result<&reqwest::Client, FetchError> {
        let timeout = self.timeout;
        self.http
            .get_or_try_init(|| async move {
                reqwest::Client::builder()
                    .timeout(timeout)
                    .connect_timeout(timeout)
                    .danger_accept_invalid_certs(true)
                    .build()
            })
            .await
            .map_err(FetchError::Client)
    }
}

/// Resolve the collection URL of `kind` below a bridge base URL.
///
/// The resource path is joined relative to the base, so a base with a path
/// prefix keeps it: `https://h/prefix` gives
/// `https://h/prefix/clip/v2/resource/light`.
pub fn resource_url(base: &str, kind: ResourceType) -> Result<Url, FetchError> {
    let invalid = |message: String| FetchError::InvalidUrl {
        url: base.to_string(),
        message,
    };

    let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("not a base URL".to_string()));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    url.join(&format!("clip/v2/resource/{}", kind))
        .map_err(|e| invalid(e.to_string()))
}
