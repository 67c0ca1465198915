//! # shop-api
//!
//! HTTP API layer for simpleshop-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Catalog endpoints backed by the remote catalog (with sample fallback)
//! - Cart endpoints backed by a write-through `CartStore`
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/products` | List products |
//! | GET | `/api/v1/products/search?q=` | Search products |
//! | GET | `/api/v1/products/{id}` | Get product |
//! | GET | `/api/v1/cart` | Cart items and totals |
//! | DELETE | `/api/v1/cart` | Clear cart |
//! | GET | `/api/v1/cart/badge` | Total item count |
//! | POST | `/api/v1/cart/items` | Add product to cart |
//! | PATCH | `/api/v1/cart/items/{id}` | Set quantity |
//! | DELETE | `/api/v1/cart/items/{id}` | Remove product |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
