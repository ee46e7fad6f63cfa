//! HTTP client for the discovery service.

use std::time::{Duration, Instant};

use nearby_telemetry::Metrics;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult, FetchError, FetchErrorKind, FetchResult, Resource};

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of body bytes kept in a status error.
const MAX_ERROR_BODY: usize = 256;

/// Shared HTTP client bound to one service base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Arguments
    /// * `base_url` - Service root (e.g., "http://192.168.0.10:3333")
    /// * `timeout` - Whole-request timeout; expiry surfaces as a transport error
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{base_url}: {e}")))?;

        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(format!(
                "{base_url}: expected an http(s) URL"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base_url}/{segments...}`, percent-encoding each segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchErrorKind> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchErrorKind::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET a JSON document.
    ///
    /// Records request count, latency and failures under `resource`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        resource: Resource,
        segments: &[&str],
    ) -> FetchResult<T> {
        Metrics::fetch_issued(resource.as_str());
        let started = Instant::now();

        let result = self.get_json_inner(resource, segments).await;

        Metrics::fetch_latency(resource.as_str(), started.elapsed().as_secs_f64() * 1000.0);
        if let Err(e) = &result {
            Metrics::fetch_failed(resource.as_str(), e.kind.label());
            warn!(%resource, error = %e.kind, "Fetch failed");
        }

        result
    }

    async fn get_json_inner<T: DeserializeOwned>(
        &self,
        resource: Resource,
        segments: &[&str],
    ) -> FetchResult<T> {
        let fail = |kind| FetchError::new(resource, kind);

        let url = self.endpoint(segments).map_err(fail)?;
        debug!(%resource, url = %url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fail(FetchErrorKind::Transport(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = truncate_body(body, MAX_ERROR_BODY);
            return Err(fail(FetchErrorKind::Status {
                status: status.as_u16(),
                body,
            }));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| fail(FetchErrorKind::Transport(e.to_string())))?;

        serde_json::from_slice(&bytes).map_err(|e| fail(FetchErrorKind::Parse(e.to_string())))
    }
}

/// Cut `body` to at most `max` bytes without splitting a character.
fn truncate_body(mut body: String, max: usize) -> String {
    if body.len() > max {
        let cut = (0..=max)
            .rev()
            .find(|&i| body.is_char_boundary(i))
            .unwrap_or(0);
        body.truncate(cut);
    }
    body
}
