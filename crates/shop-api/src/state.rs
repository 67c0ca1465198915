//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the cart store, the catalog source and configuration. The cart store
//! is constructed once here and handed to every handler; there is no global.

use shop_catalog::CatalogClient;
use shop_core::{
    CartStore, FileStore, ProductCatalog, SharedCatalog, SharedStore, DEFAULT_CART_KEY,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// File backing the key-value store
    pub storage_path: PathBuf,
    /// Key the cart snapshot is stored under
    pub storage_key: String,
    /// Optional TOML file replacing the built-in sample products
    pub sample_catalog_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            storage_path: std::env::var("CART_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/cart.json")),
            storage_key: std::env::var("CART_STORAGE_KEY")
                .unwrap_or_else(|_| DEFAULT_CART_KEY.to_string()),
            sample_catalog_path: std::env::var("SAMPLE_CATALOG_PATH").ok().map(PathBuf::from),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            storage_path: PathBuf::from("data/cart.json"),
            storage_key: DEFAULT_CART_KEY.to_string(),
            sample_catalog_path: None,
        }
    }
}

/// Cart store shared between handlers. The mutex serializes mutations.
pub type SharedCart = Arc<Mutex<CartStore>>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The one cart store for this process
    pub cart: SharedCart,
    /// Product source for listing and for resolving "add to cart"
    pub catalog: SharedCatalog,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create state from the environment: file-backed cart, HTTP catalog
    pub async fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let fallback = load_sample_catalog(config.sample_catalog_path.as_deref())?;
        let catalog = CatalogClient::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize catalog: {}", e))?
            .with_fallback(fallback);

        let store: SharedStore = Arc::new(FileStore::new(&config.storage_path));
        let cart = CartStore::open(store, config.storage_key.clone()).await;

        Ok(Self::from_parts(config, cart, Arc::new(catalog)))
    }

    /// Assemble state from already-built parts
    pub fn from_parts(config: AppConfig, cart: CartStore, catalog: SharedCatalog) -> Self {
        Self {
            cart: Arc::new(Mutex::new(cart)),
            catalog,
            config,
        }
    }
}

/// Load the fallback product list.
///
/// An explicit path must exist and parse. Without one, `config/products.toml`
/// is probed from a few working directories and the built-in sample is used
/// when none is found.
fn load_sample_catalog(explicit: Option<&std::path::Path>) -> anyhow::Result<ProductCatalog> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let catalog = ProductCatalog::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded {} sample products from {}", catalog.len(), path.display());
        return Ok(catalog);
    }

    let config_paths = [
        "config/products.toml",
        "../config/products.toml",
        "../../config/products.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog = ProductCatalog::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {} sample products from {}", catalog.len(), path);
            return Ok(catalog);
        }
    }

    tracing::debug!("No sample catalog file found, using built-in products");
    Ok(ProductCatalog::sample())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage_key, "@simpleshop_cart");
        assert!(!config.is_production());
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            ..AppConfig::default()
        };

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");

        let bad = AppConfig {
            host: "not a host".to_string(),
            ..AppConfig::default()
        };
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_explicit_sample_catalog_must_exist() {
        let missing = std::path::Path::new("/definitely/not/here/products.toml");
        assert!(load_sample_catalog(Some(missing)).is_err());
    }
}
