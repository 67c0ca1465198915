//! # shop-core
//!
//! Core types and traits for the simpleshop cart service.
//!
//! This crate provides:
//! - `CartStore`, the write-through cart state manager
//! - `LineItem`, `CartState` and `CartSummary` for cart contents
//! - `KeyValueStore` with `MemoryStore` and `FileStore` backends
//! - `Product`, `ProductCatalog` and the `CatalogSource` trait
//! - `ShopError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{CartStore, FileStore, LineItem, ProductCatalog, DEFAULT_CART_KEY};
//! use std::sync::Arc;
//!
//! // Hydrate the cart from disk (empty if nothing was saved yet)
//! let mut cart = CartStore::open(Arc::new(FileStore::new("data/cart.json")), DEFAULT_CART_KEY).await;
//!
//! // Add a product from the catalog
//! let catalog = ProductCatalog::sample();
//! let mascara = catalog.get(1).unwrap();
//! cart.add(LineItem::from_product(mascara, 2)).await?;
//!
//! println!("{} items, total {}", cart.total_items(), cart.total_price());
//! ```

pub mod cart;
pub mod catalog;
pub mod error;
pub mod product;
pub mod storage;
pub mod store;

// Re-exports for convenience
pub use cart::{CartState, CartSummary, LineItem};
pub use catalog::{CatalogSource, SharedCatalog, StaticCatalog};
pub use error::{ShopError, ShopResult};
pub use product::{Product, ProductCatalog, ProductId};
pub use storage::{FileStore, KeyValueStore, MemoryStore, SharedStore};
pub use store::{CartStore, DEFAULT_CART_KEY};

pub use rust_decimal::Decimal;
