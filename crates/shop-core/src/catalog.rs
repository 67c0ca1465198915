//! # Catalog Source Trait
//!
//! The seam between the cart and wherever products come from.
//! Implementations: `CatalogClient` (shop-catalog, HTTP with fallback) and
//! `StaticCatalog` (below, fixed in-memory list).

use crate::error::{ShopError, ShopResult};
use crate::product::{Product, ProductCatalog, ProductId};
use async_trait::async_trait;
use std::sync::Arc;

/// Read-only product lookup.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Every product the source knows about.
    async fn all_products(&self) -> ShopResult<Vec<Product>>;

    /// Products matching a free-text query.
    async fn search(&self, query: &str) -> ShopResult<Vec<Product>>;

    /// A single product, or `ShopError::ProductNotFound`.
    async fn product(&self, id: ProductId) -> ShopResult<Product>;

    /// Source name (for logging).
    fn source_name(&self) -> &'static str;
}

/// Type alias for a shared catalog source (dynamic dispatch)
pub type SharedCatalog = Arc<dyn CatalogSource>;

/// Catalog served entirely from memory
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    catalog: ProductCatalog,
}

impl StaticCatalog {
    pub fn new(catalog: ProductCatalog) -> Self {
        Self { catalog }
    }

    /// The built-in sample dataset
    pub fn sample() -> Self {
        Self::new(ProductCatalog::sample())
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn all_products(&self) -> ShopResult<Vec<Product>> {
        Ok(self.catalog.products.clone())
    }

    async fn search(&self, query: &str) -> ShopResult<Vec<Product>> {
        Ok(self.catalog.search(query))
    }

    async fn product(&self, id: ProductId) -> ShopResult<Product> {
        self.catalog
            .get(id)
            .cloned()
            .ok_or(ShopError::ProductNotFound { product_id: id })
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}
