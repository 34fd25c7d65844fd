//! List table settings.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};
use crate::api::Resource;

/// Page sizes offered when none are configured.
pub const DEFAULT_ROWS_PER_PAGE_OPTIONS: [usize; 3] = [5, 10, 25];

/// Page size used when none is configured.
pub const DEFAULT_ROWS_PER_PAGE: usize = 5;

/// Settings shared by every list table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableSettings {
    /// Initial page size, and the fallback for unsupported sizes.
    pub default_rows_per_page: usize,
    /// Page sizes the user can switch between.
    pub rows_per_page_options: Vec<usize>,
    /// Resource shown on startup.
    pub default_view: Resource,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            default_rows_per_page: DEFAULT_ROWS_PER_PAGE,
            rows_per_page_options: DEFAULT_ROWS_PER_PAGE_OPTIONS.to_vec(),
            default_view: Resource::Categories,
        }
    }
}

impl TableSettings {
    /// Validate the page size options.
    pub fn validate(&self) -> Result<()> {
        if self.rows_per_page_options.is_empty() {
            return Err(ConfigError::ValidationError(
                "table rows_per_page_options cannot be empty".to_string(),
            ));
        }

        if self.rows_per_page_options.contains(&0) {
            return Err(ConfigError::ValidationError(
                "table rows_per_page_options cannot contain 0".to_string(),
            ));
        }

        if !self
            .rows_per_page_options
            .contains(&self.default_rows_per_page)
        {
            return Err(ConfigError::ValidationError(format!(
                "table default_rows_per_page {} is not one of {:?}",
                self.default_rows_per_page, self.rows_per_page_options
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = TableSettings::default();
        assert_eq!(settings.default_rows_per_page, 5);
        assert_eq!(settings.rows_per_page_options, vec![5, 10, 25]);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_default_must_be_an_option() {
        let settings = TableSettings {
            default_rows_per_page: 7,
            ..TableSettings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("default_rows_per_page 7"));
    }

    #[test]
    fn test_empty_options_rejected() {
        let settings = TableSettings {
            rows_per_page_options: Vec::new(),
            ..TableSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_parse_view() {
        let settings: TableSettings = toml::from_str(r#"default_view = "products""#).unwrap();
        assert_eq!(settings.default_view, Resource::Products);
        assert_eq!(settings.default_rows_per_page, 5);
    }
}
