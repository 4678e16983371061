//! HTTP client for the upstream retail-operations API.
//!
//! Wraps `reqwest` with the fixed header set the upstream expects (bearer
//! token, `Accept`, user-agent/referer pair mimicking the upstream web
//! client) and surfaces non-success statuses as [`UpstreamError::Status`].
//! The client performs no retries itself; retry policy belongs to the
//! caller (see [`crate::retry`]).

use std::time::Duration;

use reqwest::{header, Client, Url};

use crate::error::UpstreamError;
use crate::requests::ApiRequest;

const DEFAULT_BASE_URL: &str = "https://app.facewashfox.com/";

/// The upstream only serves its mobile web client; requests carry its
/// user-agent so they are indistinguishable from browser traffic.
const USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 18_6_2 like Mac OS X)";

const ACCEPT: &str = "application/json, text/plain, */*";

/// Client for the upstream retail-operations API.
///
/// Stateless across calls except for the externally supplied bearer token,
/// which is passed per call and never cached here. Use
/// [`UpstreamClient::new`] for production or
/// [`UpstreamClient::with_base_url`] to point at a mock server in tests.
pub struct UpstreamClient {
    client: Client,
    base_url: Url,
}

impl UpstreamClient {
    /// Creates a new client pointed at the production upstream host.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Transport`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, UpstreamError> {
        Self::with_base_url(timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Transport`] if the underlying
    /// `reqwest::Client` cannot be constructed, or [`UpstreamError::Format`]
    /// if `base_url` is not a valid URL.
    pub fn with_base_url(timeout_secs: u64, base_url: &str) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // Url::join appends endpoint paths instead of replacing the last
        // path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|_| UpstreamError::Format {
            path: format!("base URL '{base_url}'"),
        })?;

        Ok(Self { client, base_url })
    }

    /// Sends one upstream request with the supplied bearer token and returns
    /// the raw JSON body.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::Transport`] on network failure.
    /// - [`UpstreamError::Status`] when the response status is not success.
    /// - [`UpstreamError::Deserialize`] if the body is not valid JSON.
    pub async fn call(
        &self,
        token: &str,
        request: &ApiRequest,
    ) -> Result<serde_json::Value, UpstreamError> {
        let url = self.endpoint_url(request.path)?;
        let referer = self.endpoint_url(request.referer_path)?;

        let response = self
            .client
            .post(url)
            .header(header::ACCEPT, ACCEPT)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::REFERER, referer.as_str())
            .json(&request.body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                endpoint: request.path.to_owned(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| UpstreamError::Deserialize {
            context: request.path.to_owned(),
            source: e,
        })
    }

    fn endpoint_url(&self, path: &str) -> Result<Url, UpstreamError> {
        self.base_url.join(path).map_err(|_| UpstreamError::Format {
            path: format!("endpoint path '{path}'"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_base_url_strips_trailing_slashes() {
        let client = UpstreamClient::with_base_url(30, "http://127.0.0.1:9000///").unwrap();
        let url = client.endpoint_url("api/v3/r23/dich-vu/tong-quan").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/api/v3/r23/dich-vu/tong-quan");
    }

    #[test]
    fn with_base_url_rejects_garbage() {
        let result = UpstreamClient::with_base_url(30, "not a url");
        assert!(matches!(result, Err(UpstreamError::Format { .. })));
    }
}
