//! HTTP utilities for resource API calls

use super::error::TransportError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses on a character boundary and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let char_count = body.chars().count();
    let truncated = if char_count > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// HTTP client wrapper for resource API calls
#[derive(Clone)]
pub struct ApiHttpClient {
    client: Client,
}

impl ApiHttpClient {
    /// Create a new HTTP client bounded by `timeout` per request
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("cloudres/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client
    pub fn from_reqwest(client: Client) -> Self {
        Self { client }
    }

    /// Make a GET request and decode the JSON body
    pub async fn get_json<T, Q>(&self, url: Url, query: &Q) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        tracing::debug!("GET {}", url);

        let response = match self.client.get(url.clone()).query(query).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("GET {} failed: {}", url.path(), e);
                return Err(e.into());
            },
        };

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read response body from {}: {}", url.path(), e);
            TransportError::from(e)
        })?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(TransportError::Status { status });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                "Failed to parse response JSON from {}: {} - {}",
                url.path(),
                e,
                sanitize_for_log(&body)
            );
            TransportError::from(e)
        })
    }
}
