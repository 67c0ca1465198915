//! # Catalog Configuration
//!
//! Configuration for the remote product catalog.
//! Values are loaded from environment variables (and `.env` if present).

use shop_core::ShopError;
use std::env;
use std::time::Duration;

/// Default catalog endpoint (dummyjson-compatible)
pub const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com/products";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Remote catalog API configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Products endpoint, e.g. `https://dummyjson.com/products`
    pub api_base_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// User-Agent sent with every request
    pub user_agent: String,
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `CATALOG_API_URL` (default: `https://dummyjson.com/products`)
    /// - `CATALOG_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Result<Self, ShopError> {
        dotenvy::dotenv().ok();

        let api_base_url =
            env::var("CATALOG_API_URL").unwrap_or_else(|_| DEFAULT_CATALOG_URL.to_string());

        let timeout_secs = match env::var("CATALOG_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                ShopError::Configuration(format!(
                    "CATALOG_TIMEOUT_SECS must be a whole number of seconds, got {:?}",
                    raw
                ))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let config = Self::new(api_base_url).with_timeout(Duration::from_secs(timeout_secs));
        config.validate()?;
        Ok(config)
    }

    /// Create config with an explicit endpoint (for testing)
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("SimpleShop/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Builder: set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the endpoint is an http(s) URL and the timeout is non-zero
    pub fn validate(&self) -> Result<(), ShopError> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(ShopError::Configuration(
                "CATALOG_API_URL must start with http:// or https://".to_string(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(ShopError::Configuration(
                "CATALOG_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// URL listing every product
    pub fn list_url(&self) -> String {
        self.api_base_url.clone()
    }

    /// URL for free-text search
    pub fn search_url(&self) -> String {
        format!("{}/search", self.api_base_url)
    }

    /// URL for a single product
    pub fn product_url(&self, id: u64) -> String {
        format!("{}/{}", self.api_base_url, id)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let config = CatalogConfig::new("https://catalog.example.com/products/");

        assert_eq!(config.list_url(), "https://catalog.example.com/products");
        assert_eq!(config.search_url(), "https://catalog.example.com/products/search");
        assert_eq!(config.product_url(7), "https://catalog.example.com/products/7");
    }

    #[test]
    fn test_validation() {
        assert!(CatalogConfig::default().validate().is_ok());
        assert!(CatalogConfig::new("ftp://catalog").validate().is_err());
        assert!(CatalogConfig::default()
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }
}
