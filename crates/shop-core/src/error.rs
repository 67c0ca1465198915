//! # Shop Error Types
//!
//! Typed error handling for the simpleshop cart service.
//! All fallible cart, storage and catalog operations return `Result<T, ShopError>`.

use thiserror::Error;

/// Core error type for all shop operations
#[derive(Debug, Error)]
pub enum ShopError {
    /// Configuration errors (bad env values, unreadable config files)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid mutation arguments (zero quantity, negative price)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Product not found in the catalog or the sample dataset
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: u64 },

    /// Durable storage read or write failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Network/HTTP error talking to the catalog API
    #[error("Network error: {0}")]
    Network(String),

    /// Catalog API answered with a non-success status
    #[error("Catalog error [{status}]: {message}")]
    Catalog { status: u16, message: String },

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShopError {
    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            ShopError::Network(_) | ShopError::Storage(_) => true,
            ShopError::Catalog { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ShopError::Configuration(_) => 500,
            ShopError::InvalidArgument(_) => 400,
            ShopError::ProductNotFound { .. } => 404,
            ShopError::Storage(_) => 503,
            ShopError::Serialization(_) => 500,
            ShopError::Network(_) => 502,
            ShopError::Catalog { .. } => 502,
            ShopError::Internal(_) => 500,
        }
    }
}

impl From<serde_json::Error> for ShopError {
    fn from(err: serde_json::Error) -> Self {
        ShopError::Serialization(err.to_string())
    }
}

/// Result type alias for shop operations
pub type ShopResult<T> = Result<T, ShopError>;
