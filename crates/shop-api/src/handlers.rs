//! # Request Handlers
//!
//! Axum request handlers for the catalog and cart API.
//! Cart mutations lock the shared `CartStore`, apply one operation and answer
//! with the resulting cart.

use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use shop_core::{CartStore, CartSummary, LineItem, Product, ProductId, ShopError};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Add-to-cart request (product detail screen)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    /// Catalog product ID
    pub product_id: ProductId,
    /// Quantity to add
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Quantity change request (cart screen stepper)
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    /// New absolute quantity; zero or negative removes the line
    pub quantity: i64,
}

/// Search query string
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Cart contents with aggregates
#[derive(Debug, Serialize, Deserialize)]
pub struct CartResponse {
    pub items: Vec<LineItem>,
    pub summary: CartSummary,
}

impl From<&CartStore> for CartResponse {
    fn from(cart: &CartStore) -> Self {
        Self {
            items: cart.items().to_vec(),
            summary: cart.summary(),
        }
    }
}

/// Cart badge payload
#[derive(Debug, Serialize, Deserialize)]
pub struct BadgeResponse {
    pub count: u64,
}

/// Product list payload
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub count: usize,
}

impl From<Vec<Product>> for ProductListResponse {
    fn from(products: Vec<Product>) -> Self {
        Self {
            count: products.len(),
            products,
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn shop_error_to_response(err: ShopError) -> ApiError {
    let code = err.status_code();
    let mut response = ErrorResponse::new(err.to_string(), code);
    if matches!(err, ShopError::Storage(_)) {
        response = response.with_details("cart changed in memory but was not saved");
    }
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "simpleshop",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// List all products
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let products = state
        .catalog
        .all_products()
        .await
        .map_err(shop_error_to_response)?;
    Ok(Json(products.into()))
}

/// Free-text product search
pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let query = params.q.trim();
    let result = if query.is_empty() {
        state.catalog.all_products().await
    } else {
        state.catalog.search(query).await
    };
    let products = result.map_err(shop_error_to_response)?;
    Ok(Json(products.into()))
}

/// Get single product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .catalog
        .product(product_id)
        .await
        .map_err(shop_error_to_response)?;
    Ok(Json(product))
}

/// Current cart contents
pub async fn get_cart(State(state): State<AppState>) -> Json<CartResponse> {
    let cart = state.cart.lock().await;
    Json(CartResponse::from(&*cart))
}

/// Cart badge count (total quantity)
pub async fn cart_badge(State(state): State<AppState>) -> Json<BadgeResponse> {
    let cart = state.cart.lock().await;
    Json(BadgeResponse {
        count: cart.total_items(),
    })
}

/// Add a product to the cart, capturing its current title and price.
/// Out-of-stock products are rejected.
#[instrument(skip(state, request), fields(product_id = request.product_id, quantity = request.quantity))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<(StatusCode, Json<CartResponse>), ApiError> {
    let product = state
        .catalog
        .product(request.product_id)
        .await
        .map_err(|e| {
            warn!("Cannot add product: {}", e);
            shop_error_to_response(e)
        })?;

    if product.stock == 0 {
        warn!("Cannot add product: {} is out of stock", product.title);
        return Err(shop_error_to_response(ShopError::InvalidArgument(format!(
            "product {} is out of stock",
            product.id
        ))));
    }

    let mut cart = state.cart.lock().await;
    cart.add(LineItem::from_product(&product, request.quantity))
        .await
        .map_err(|e| {
            error!("Failed to add to cart: {}", e);
            shop_error_to_response(e)
        })?;

    info!(
        "Added {} x {} to cart, {} items total",
        request.quantity,
        product.title,
        cart.total_items()
    );

    Ok((StatusCode::CREATED, Json(CartResponse::from(&*cart))))
}

/// Set a line's quantity (zero or less removes it)
#[instrument(skip(state, request), fields(quantity = request.quantity))]
pub async fn update_cart_item(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let mut cart = state.cart.lock().await;
    cart.update_quantity(product_id, request.quantity)
        .await
        .map_err(|e| {
            error!("Failed to update cart: {}", e);
            shop_error_to_response(e)
        })?;

    Ok(Json(CartResponse::from(&*cart)))
}

/// Remove a product from the cart
#[instrument(skip(state))]
pub async fn remove_cart_item(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartResponse>, ApiError> {
    let mut cart = state.cart.lock().await;
    cart.remove(product_id).await.map_err(|e| {
        error!("Failed to remove from cart: {}", e);
        shop_error_to_response(e)
    })?;

    Ok(Json(CartResponse::from(&*cart)))
}

/// Empty the cart
#[instrument(skip(state))]
pub async fn clear_cart(State(state): State<AppState>) -> Result<Json<CartResponse>, ApiError> {
    let mut cart = state.cart.lock().await;
    cart.clear().await.map_err(|e| {
        error!("Failed to clear cart: {}", e);
        shop_error_to_response(e)
    })?;

    info!("Cart cleared");
    Ok(Json(CartResponse::from(&*cart)))
}
