//! HTTP transport for the backend API.
//!
//! One [`HttpTransport`] owns a pooled `reqwest::Client` bound to a base URL.
//! Every POST goes through the [`RetryPolicy`]: network failures and 5xx
//! statuses are retried, 2xx and 4xx are returned as they are.

use super::error::{BackendError, Result};
use super::retry::RetryPolicy;
use reqwest::Url;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Per-request timeout used when nothing else is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings for [`HttpTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTransportConfig {
    pub base_url: String,
    /// `None` disables the client-side timeout
    pub timeout: Option<Duration>,
    pub retry: RetryPolicy,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            retry: RetryPolicy::default(),
        }
    }
}

impl HttpTransportConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A successful (2xx) reply whose body has not been decoded yet
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    /// Decode the body into a wire type
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| BackendError::Decode {
            url: self.url.clone(),
            reason: e.to_string(),
        })
    }
}

/// JSON-over-HTTP client with retry and backoff
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl HttpTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url).map_err(|e| BackendError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BackendError::InvalidUrl {
                url: config.base_url,
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(BackendError::Client)?;

        info!("HTTP transport ready for {}", base_url);

        Ok(Self {
            client,
            base_url,
            retry: config.retry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint path such as `/api/chat`
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST `body` as JSON to `path`, retrying per the policy.
    pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url_for(path);
        let payload = serde_json::to_vec(body).map_err(|e| BackendError::Decode {
            url: url.clone(),
            reason: format!("could not encode request: {}", e),
        })?;

        let url = url.as_str();
        self.retry
            .run(|attempt| self.post_once(url, payload.clone(), attempt))
            .await
    }

    async fn post_once(&self, url: &str, payload: Vec<u8>, attempt: u32) -> Result<RawResponse> {
        debug!("POST {} (attempt {})", url, attempt + 1);

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(payload)
            .send()
            .await
            .map_err(|e| BackendError::Network {
                url: url.to_string(),
                reason: describe_send_error(&e),
            })?;

        // The status decides retryability, even when the body is unreadable
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
            return Err(BackendError::Http {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| BackendError::Decode {
            url: url.to_string(),
            reason: format!("could not read body: {}", e),
        })?;

        debug!("{} answered {} ({} bytes)", url, status, body.len());
        Ok(RawResponse {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

fn describe_send_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else {
        error.to_string()
    }
}
