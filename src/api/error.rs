//! Transport errors
//!
//! Every failure talking to the resource API is a [`TransportError`]. The
//! browsing layer never distinguishes between them beyond what
//! [`format_api_error`] shows to the user.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure while calling the resource API
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, TLS failure or timeout
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("API request failed: {status}")]
    Status { status: StatusCode },

    /// Body was not the expected JSON envelope
    #[error("failed to parse response JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// Base URL could not be parsed or joined
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl TransportError {
    /// HTTP status, if the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status } => Some(*status),
            Self::Request(e) => e.status(),
            _ => None,
        }
    }

    /// True when the request exceeded the client timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }
}

/// Format a transport error for display
/// Security: never echoes response bodies or raw transport details
pub fn format_api_error(error: &TransportError) -> String {
    if error.is_timeout() {
        return "Request timed out. The resource API did not answer in time.".to_string();
    }

    if let Some(status) = error.status() {
        return match status.as_u16() {
            400 => "Invalid request. Check your parameters.".to_string(),
            401 | 403 => "Access denied by the resource API.".to_string(),
            404 => "Resource category not found on the server.".to_string(),
            429 => "Rate limit exceeded. Please try again later.".to_string(),
            500..=599 => "Resource API temporarily unavailable. Please try again.".to_string(),
            code => format!("Request failed with HTTP {}.", code),
        };
    }

    match error {
        TransportError::Decode(_) => "Unexpected response from the resource API.".to_string(),
        TransportError::InvalidUrl(_) => "Invalid resource API URL. Check your base URL.".to_string(),
        _ => "Request failed. Check your network connection and try again.".to_string(),
    }
}
