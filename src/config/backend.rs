//! Catalog backend connection settings.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};
use crate::api::Resource;

/// Default backend base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the catalog REST backend lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Backend {
    /// Base URL every resource path is appended to.
    pub base_url: String,

    /// Path of the category collection.
    pub categories_path: String,

    /// Path of the product collection.
    pub products_path: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            categories_path: "categories".to_string(),
            products_path: "products".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Backend {
    /// Create backend settings for a base URL with default paths.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// The collection path for a resource.
    pub fn path_for(&self, resource: Resource) -> &str {
        match resource {
            Resource::Categories => &self.categories_path,
            Resource::Products => &self.products_path,
        }
    }

    /// Validate these settings.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` with details if validation fails.
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::ValidationError(
                "backend base_url cannot be empty".to_string(),
            ));
        }

        if !url.starts_with("https://") && !url.starts_with("http://") {
            return Err(ConfigError::ValidationError(format!(
                "backend base_url '{}' must start with http:// or https://",
                url
            )));
        }

        for (name, path) in [
            ("categories_path", &self.categories_path),
            ("products_path", &self.products_path),
        ] {
            if path.trim_matches('/').trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "backend {} cannot be empty",
                    name
                )));
            }
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "backend timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
