//! HTTP client for the YouTube Data API `search` endpoint.

use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::types::{ApiErrorBody, SearchResponse};
use super::VideoRecord;
use crate::config::DEFAULT_API_BASE_URL;

/// Results requested per channel when nothing else is configured.
pub const DEFAULT_LIMIT: u32 = 25;
/// Largest `maxResults` the search endpoint accepts.
pub const MAX_LIMIT: u32 = 50;

const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Errors from a single channel search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Request exceeded the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// Non-2xx response; `message` is the API's explanation when it sent one
    #[error("HTTP error: status {status} {message}")]
    HttpStatus { status: u16, message: String },
    /// Body was not a search response (bad JSON, missing `items`, missing fields)
    #[error("Unexpected response format: {0}")]
    ResponseFormat(#[from] serde_json::Error),
    /// Response body exceeded the 5MB size limit
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("Insecure API base URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
}

/// Connection settings for [`SearchClient`].
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// API root, e.g. `https://www.googleapis.com/youtube/v3`.
    pub base_url: String,
    pub timeout: Duration,
    /// Also send the key as a raw `Authorization` header. The API only needs
    /// the `key` query parameter.
    pub send_authorization_header: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            send_authorization_header: false,
        }
    }
}

/// Client for the `search` endpoint, holding the API key it authenticates with.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: SecretString,
    timeout: Duration,
    send_authorization_header: bool,
}

impl SearchClient {
    /// Creates a client for the given API key.
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidBaseUrl`] if `options.base_url` does not parse
    /// - [`SearchError::InsecureBaseUrl`] if it is plain HTTP to a non-loopback host,
    ///   which would put the key on the wire in clear text
    /// - [`SearchError::Network`] if the HTTP client cannot be built
    pub fn new(api_key: SecretString, options: SearchOptions) -> Result<Self, SearchError> {
        let base = options.base_url.trim_end_matches('/');
        let endpoint = Url::parse(&format!("{base}/search"))?;

        if endpoint.scheme() != "https" {
            let is_loopback = endpoint.scheme() == "http"
                && matches!(
                    endpoint.host_str(),
                    Some("localhost") | Some("127.0.0.1") | Some("[::1]")
                );
            if !is_loopback {
                tracing::error!(base_url = %base, "Rejecting non-HTTPS API base URL");
                return Err(SearchError::InsecureBaseUrl);
            }
            tracing::warn!(base_url = %base, "Using non-HTTPS API base URL (localhost only)");
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("podcrafter/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SearchError::Network)?;

        Ok(Self {
            http,
            endpoint,
            api_key,
            timeout: options.timeout,
            send_authorization_header: options.send_authorization_header,
        })
    }

    /// Fetches the most recent uploads of a channel, newest first.
    ///
    /// Issues exactly one request with `order=date&part=snippet`, asking for up to
    /// `limit` results. `limit` is clamped into `1..=MAX_LIMIT`. Results that are
    /// not videos are dropped; everything else is returned in API order.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Network`] / [`SearchError::Timeout`] on transport failure
    /// - [`SearchError::HttpStatus`] on a non-2xx status (quota, bad key, unknown channel)
    /// - [`SearchError::ResponseFormat`] if the body is not a search response
    /// - [`SearchError::ResponseTooLarge`] if the body exceeds 5MB
    pub async fn search(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<VideoRecord>, SearchError> {
        let limit = clamp_limit(limit);

        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("order", "date")
            .append_pair("part", "snippet")
            .append_pair("channelId", channel_id)
            .append_pair("maxResults", &limit.to_string())
            .append_pair("key", self.api_key.expose_secret());

        let mut request = self.http.get(url);
        if self.send_authorization_header {
            request = request.header(
                reqwest::header::AUTHORIZATION,
                self.api_key.expose_secret(),
            );
        }

        tracing::debug!(channel_id = %channel_id, limit = limit, "Searching channel uploads");

        // One deadline covers connect, headers and body.
        let bytes = tokio::time::timeout(self.timeout, fetch_body(request))
            .await
            .map_err(|_| SearchError::Timeout(self.timeout))??;
        let parsed: SearchResponse = serde_json::from_slice(&bytes)?;

        let total = parsed.items.len();
        let videos: Vec<VideoRecord> = parsed
            .items
            .into_iter()
            .filter_map(|item| item.into_video())
            .collect();

        if videos.len() < total {
            tracing::debug!(
                channel_id = %channel_id,
                skipped = total - videos.len(),
                "Ignoring search hits that are not videos"
            );
        }

        Ok(videos)
    }
}

async fn fetch_body(request: reqwest::RequestBuilder) -> Result<Vec<u8>, SearchError> {
    // Strip the URL from transport errors: it carries the key.
    let response = request
        .send()
        .await
        .map_err(|e| SearchError::Network(e.without_url()))?;

    let status = response.status();
    if !status.is_success() {
        let body = read_limited_bytes(response, MAX_RESPONSE_SIZE)
            .await
            .unwrap_or_default();
        let message = serde_json::from_slice::<ApiErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("").to_string());
        return Err(SearchError::HttpStatus {
            status: status.as_u16(),
            message,
        });
    }

    read_limited_bytes(response, MAX_RESPONSE_SIZE).await
}

fn clamp_limit(limit: u32) -> u32 {
    let clamped = limit.clamp(1, MAX_LIMIT);
    if clamped != limit {
        tracing::warn!(
            requested = limit,
            used = clamped,
            "maxResults outside the accepted range, clamping"
        );
    }
    clamped
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, SearchError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(SearchError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| SearchError::Network(e.without_url()))?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(SearchError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
