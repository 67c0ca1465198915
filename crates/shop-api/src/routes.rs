//! # Routes
//!
//! Axum router configuration for the storefront API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Catalog:
///   - GET    /api/v1/products - List all products
///   - GET    /api/v1/products/search?q= - Search products
///   - GET    /api/v1/products/{id} - Get product by ID
///
/// - Cart:
///   - GET    /api/v1/cart - Items and totals
///   - DELETE /api/v1/cart - Clear the cart
///   - GET    /api/v1/cart/badge - Total item count
///   - POST   /api/v1/cart/items - Add a product
///   - PATCH  /api/v1/cart/items/{id} - Set quantity
///   - DELETE /api/v1/cart/items/{id} - Remove a product
pub fn create_router(state: AppState) -> Router {
    // The mobile client runs on arbitrary origins during development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let catalog_routes = Router::new()
        .route("/products", get(handlers::list_products))
        .route("/products/search", get(handlers::search_products))
        .route("/products/{product_id}", get(handlers::get_product));

    let cart_routes = Router::new()
        .route(
            "/cart",
            get(handlers::get_cart).delete(handlers::clear_cart),
        )
        .route("/cart/badge", get(handlers::cart_badge))
        .route("/cart/items", post(handlers::add_to_cart))
        .route(
            "/cart/items/{product_id}",
            patch(handlers::update_cart_item).delete(handlers::remove_cart_item),
        );

    let api_routes = Router::new().merge(catalog_routes).merge(cart_routes);

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API v1
        .nest("/api/v1", api_routes)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        // State
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{BadgeResponse, CartResponse, ProductListResponse};
    use crate::state::AppConfig;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use shop_core::{
        CartStore, Decimal, KeyValueStore, MemoryStore, Product, ProductCatalog, StaticCatalog,
        DEFAULT_CART_KEY,
    };
    use std::sync::Arc;

    async fn test_server() -> (TestServer, Arc<MemoryStore>) {
        server_with_catalog(StaticCatalog::sample()).await
    }

    async fn server_with_catalog(catalog: StaticCatalog) -> (TestServer, Arc<MemoryStore>) {
        let backend = Arc::new(MemoryStore::new());
        let cart = CartStore::open(backend.clone(), DEFAULT_CART_KEY).await;
        let state = AppState::from_parts(AppConfig::default(), cart, Arc::new(catalog));
        (TestServer::new(create_router(state)).unwrap(), backend)
    }

    #[tokio::test]
    async fn test_health() {
        let (server, _) = test_server().await;
        let response = server.get("/health").await;
        response.assert_status_ok();
        assert_eq!(response.json::<serde_json::Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_catalog_routes() {
        let (server, _) = test_server().await;

        let all = server.get("/api/v1/products").await.json::<ProductListResponse>();
        assert_eq!(all.count, 10);

        let found = server
            .get("/api/v1/products/search")
            .add_query_param("q", "lipstick")
            .await
            .json::<ProductListResponse>();
        assert_eq!(found.count, 1);
        assert_eq!(found.products[0].id, 4);

        let detail = server.get("/api/v1/products/9").await;
        detail.assert_status_ok();
        assert_eq!(detail.json::<serde_json::Value>()["title"], "Samsung 49-Inch CHG90");

        server.get("/api/v1/products/404").await.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_add_merges_and_persists() {
        let (server, backend) = test_server().await;

        let first = server
            .post("/api/v1/cart/items")
            .json(&json!({ "productId": 1, "quantity": 2 }))
            .await;
        first.assert_status(StatusCode::CREATED);

        server
            .post("/api/v1/cart/items")
            .json(&json!({ "productId": 1, "quantity": 3 }))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post("/api/v1/cart/items")
            .json(&json!({ "productId": 2 }))
            .await
            .assert_status(StatusCode::CREATED);

        let cart = server.get("/api/v1/cart").await.json::<CartResponse>();
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.items[0].title, "Essence Mascara Lash Princess");
        assert_eq!(cart.summary.total_items, 6);
        // 5 x 9.99 + 19.99
        assert_eq!(cart.summary.total_price, Decimal::new(6994, 2));

        let badge = server.get("/api/v1/cart/badge").await.json::<BadgeResponse>();
        assert_eq!(badge.count, 6);

        let stored = backend.get(DEFAULT_CART_KEY).await.unwrap().unwrap();
        assert!(stored.contains(r#""productId":2"#));
    }

    #[tokio::test]
    async fn test_add_rejects_bad_input() {
        let (server, _) = test_server().await;

        server
            .post("/api/v1/cart/items")
            .json(&json!({ "productId": 1, "quantity": 0 }))
            .await
            .assert_status_bad_request();

        server
            .post("/api/v1/cart/items")
            .json(&json!({ "productId": 4242 }))
            .await
            .assert_status_not_found();

        let badge = server.get("/api/v1/cart/badge").await.json::<BadgeResponse>();
        assert_eq!(badge.count, 0);
    }

    #[tokio::test]
    async fn test_add_rejects_out_of_stock() {
        let mut catalog = ProductCatalog::new();
        catalog.add(Product::new(1, "Sold Out", Decimal::new(500, 2)));
        catalog.add(Product::new(2, "In Stock", Decimal::new(300, 2)).with_stats(4.0, 1));
        let (server, backend) = server_with_catalog(StaticCatalog::new(catalog)).await;

        let response = server
            .post("/api/v1/cart/items")
            .json(&json!({ "productId": 1 }))
            .await;
        response.assert_status_bad_request();
        assert_eq!(response.json::<serde_json::Value>()["code"], 400);
        assert_eq!(backend.get(DEFAULT_CART_KEY).await.unwrap(), None);

        server
            .post("/api/v1/cart/items")
            .json(&json!({ "productId": 2 }))
            .await
            .assert_status(StatusCode::CREATED);

        let cart = server.get("/api/v1/cart").await.json::<CartResponse>();
        let ids: Vec<u64> = cart.items.iter().map(|i| i.product_id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn test_update_remove_and_clear() {
        let (server, backend) = test_server().await;
        for id in [3, 5, 7] {
            server
                .post("/api/v1/cart/items")
                .json(&json!({ "productId": id, "quantity": 2 }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let cart = server
            .patch("/api/v1/cart/items/3")
            .json(&json!({ "quantity": 4 }))
            .await
            .json::<CartResponse>();
        assert_eq!(cart.items[0].quantity, 4);

        let cart = server
            .patch("/api/v1/cart/items/5")
            .json(&json!({ "quantity": -1 }))
            .await
            .json::<CartResponse>();
        let ids: Vec<u64> = cart.items.iter().map(|i| i.product_id).collect();
        assert_eq!(ids, vec![3, 7]);

        // absent product is a no-op
        let cart = server.delete("/api/v1/cart/items/99").await.json::<CartResponse>();
        assert_eq!(cart.summary.line_count, 2);

        let cart = server.delete("/api/v1/cart/items/7").await.json::<CartResponse>();
        assert_eq!(cart.summary.total_items, 4);

        let cart = server.delete("/api/v1/cart").await.json::<CartResponse>();
        assert!(cart.items.is_empty());
        assert_eq!(
            backend.get(DEFAULT_CART_KEY).await.unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn test_cart_survives_restart() {
        let (server, backend) = test_server().await;
        server
            .post("/api/v1/cart/items")
            .json(&json!({ "productId": 10, "quantity": 1 }))
            .await
            .assert_status(StatusCode::CREATED);
        drop(server);

        let cart = CartStore::open(backend, DEFAULT_CART_KEY).await;
        assert_eq!(cart.total_items(), 1);
        assert_eq!(cart.get(10).unwrap().unit_price, Decimal::new(19999, 2));
    }
}
