//! # shop-catalog
//!
//! Product catalog client for simpleshop-rs.
//!
//! `CatalogClient` reads products from a dummyjson-compatible HTTP API and
//! never hard-fails: when the API is down, slow or returns garbage, answers
//! come from a local fallback dataset (`ProductCatalog::sample()` unless
//! replaced).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_catalog::CatalogClient;
//! use shop_core::CatalogSource;
//!
//! let catalog = CatalogClient::from_env()?;
//!
//! let everything = catalog.all_products().await?;
//! let lipsticks = catalog.search("lipstick").await?;
//! let detail = catalog.product(4).await?;
//! ```

pub mod client;
pub mod config;

pub use client::CatalogClient;
pub use config::{CatalogConfig, DEFAULT_CATALOG_URL, DEFAULT_TIMEOUT_SECS};
