//! API error types for the catalog REST client.

use thiserror::Error;

/// Errors that can occur when talking to the catalog backend.
///
/// Every variant is a network failure from the caller's point of view: the
/// request was rejected, timed out, or came back unusable. The variants only
/// exist to give the user a better message.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or HTTP transport error, including timeouts.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The resource does not exist on the backend.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The backend rejected the request.
    #[error("Request rejected (HTTP {status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body, or the URL.
        message: String,
    },

    /// Backend server error.
    #[error("Server error: {0}")]
    ServerError(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The response body could not be decoded.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// A record could not be encoded as a request body.
    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from an HTTP status code.
    pub fn from_status(status: reqwest::StatusCode, context: &str) -> Self {
        match status.as_u16() {
            404 => ApiError::NotFound(context.to_string()),
            500..=599 => ApiError::ServerError(format!("HTTP {}: {}", status, context)),
            code => ApiError::Rejected {
                status: code,
                message: context.to_string(),
            },
        }
    }

    /// Whether the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}
