//! Centralized error types for storedesk.
//!
//! Aggregates configuration, API and terminal errors and turns them into
//! short messages suitable for the alert dialog and the command line.

use thiserror::Error;

use crate::api::error::ApiError;
use crate::config::ConfigError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// IO errors (file system, terminal output).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal-related errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Generic errors with a message.
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Create a terminal error.
    pub fn terminal(msg: impl Into<String>) -> Self {
        AppError::Terminal(msg.into())
    }

    /// Create a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        AppError::Other(msg.into())
    }

    /// Whether this is a failed backend call.
    pub fn is_network_failure(&self) -> bool {
        matches!(self, AppError::Api(_))
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::CreateDirError(_) | ConfigError::WriteError(_) => {
                    "Could not save configuration. Please check file permissions.".to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Please check it is readable.".to_string()
                }
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::SerializeError(_) => {
                    "Could not save configuration. Internal error.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
            },
            AppError::Api(e) => match e {
                ApiError::Network(_) => {
                    "Could not reach the catalog backend. Please check the URL and your network."
                        .to_string()
                }
                ApiError::NotFound(resource) => format!("'{}' was not found.", resource),
                ApiError::Rejected { message, .. } => {
                    format!("The backend rejected the request: {}", message)
                }
                ApiError::ServerError(_) => {
                    "Catalog backend error. Please try again later.".to_string()
                }
                ApiError::InvalidUrl(url) => format!("Invalid backend URL: {}", url),
                ApiError::InvalidResponse(_) => {
                    "Unexpected response from the catalog backend.".to_string()
                }
                ApiError::Encode(_) => "Could not prepare the request.".to_string(),
            },
            AppError::Io(_) => "A file operation failed. Please check file permissions.".to_string(),
            AppError::Terminal(msg) => format!("Terminal error: {}", msg),
            AppError::Other(msg) => msg.clone(),
        }
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Config(ConfigError::ParseError(_))
            | AppError::Config(ConfigError::ValidationError(_)) => {
                Some("Fix ~/.config/storedesk/config.toml or pass --config <path>.")
            }
            AppError::Api(e) if e.is_transport() || matches!(e, ApiError::InvalidUrl(_)) => {
                Some("Check the backend URL (--base-url or STOREDESK_BASE_URL).")
            }
            AppError::Api(ApiError::ServerError(_)) => Some("Press 'r' to reload the list."),
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
