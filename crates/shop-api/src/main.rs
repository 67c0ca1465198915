//! # SimpleShop
//!
//! Storefront backend: product catalog plus a persistent shopping cart.
//!
//! ## Usage
//!
//! ```bash
//! # Optional configuration
//! export CATALOG_API_URL=https://dummyjson.com/products
//! export CART_STORAGE_PATH=data/cart.json
//!
//! # Run the server
//! simpleshop
//! ```

use shop_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    // Initialize application state (hydrates the cart from disk)
    let state = AppState::new().await?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Cart storage: {}", state.config.storage_path.display());
    info!("Catalog source: {}", state.catalog.source_name());
    {
        let cart = state.cart.lock().await;
        info!(
            "Cart restored: {} items, total {}",
            cart.total_items(),
            cart.total_price()
        );
    }

    let app = routes::create_router(state);

    info!("🛒 SimpleShop starting on http://{}", addr);

    if !is_prod {
        info!("📝 Health: http://{}/health", addr);
        info!("🛍  Products: GET http://{}/api/v1/products", addr);
        info!("🧺 Cart: GET http://{}/api/v1/cart", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  🛒 SimpleShop RS 🛒
  ━━━━━━━━━━━━━━━━━━━━━━━
  Catalog + persistent cart
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
