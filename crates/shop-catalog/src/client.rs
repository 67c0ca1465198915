//! # Catalog Client
//!
//! HTTP implementation of `CatalogSource` against a dummyjson-style API.
//!
//! Any remote failure (network error, non-2xx status, unparsable body) is
//! logged and answered from the local fallback dataset instead, so callers
//! only ever see `ShopError::ProductNotFound`.

use crate::config::CatalogConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shop_core::{CatalogSource, Product, ProductCatalog, ProductId, ShopError, ShopResult};
use tracing::{debug, info, instrument, warn};

/// Page size requested from the list endpoint
const LIST_LIMIT: &str = "100";

/// Remote catalog with sample-data fallback
pub struct CatalogClient {
    config: CatalogConfig,
    client: Client,
    fallback: ProductCatalog,
}

impl CatalogClient {
    /// Create a client that falls back to the built-in sample dataset
    pub fn new(config: CatalogConfig) -> ShopResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ShopError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            fallback: ProductCatalog::sample(),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> ShopResult<Self> {
        let config = CatalogConfig::from_env()?;
        Self::new(config)
    }

    /// Builder: replace the fallback dataset
    pub fn with_fallback(mut self, fallback: ProductCatalog) -> Self {
        self.fallback = fallback;
        self
    }

    /// The dataset served when the remote catalog fails
    pub fn fallback(&self) -> &ProductCatalog {
        &self.fallback
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> ShopResult<T> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| ShopError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ShopError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ShopError::Catalog {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            ShopError::Serialization(format!("Failed to parse catalog response: {}", e))
        })
    }

    async fn fetch_all(&self) -> ShopResult<Vec<Product>> {
        let page: ProductPage = self
            .get_json(&self.config.list_url(), &[("limit", LIST_LIMIT)])
            .await?;
        Ok(page.products)
    }

    async fn fetch_search(&self, query: &str) -> ShopResult<Vec<Product>> {
        let page: ProductPage = self
            .get_json(&self.config.search_url(), &[("q", query)])
            .await?;
        Ok(page.products)
    }

    async fn fetch_product(&self, id: ProductId) -> ShopResult<Product> {
        self.get_json(&self.config.product_url(id), &[]).await
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    #[instrument(skip(self))]
    async fn all_products(&self) -> ShopResult<Vec<Product>> {
        match self.fetch_all().await {
            Ok(products) => {
                info!(count = products.len(), "fetched products from catalog API");
                Ok(products)
            }
            Err(e) => {
                warn!(error = %e, "catalog unavailable, using sample products");
                Ok(self.fallback.products.clone())
            }
        }
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> ShopResult<Vec<Product>> {
        match self.fetch_search(query).await {
            Ok(products) => {
                debug!(count = products.len(), "catalog search");
                Ok(products)
            }
            Err(e) => {
                warn!(error = %e, "catalog search failed, searching sample products");
                Ok(self.fallback.search(query))
            }
        }
    }

    #[instrument(skip(self))]
    async fn product(&self, id: ProductId) -> ShopResult<Product> {
        match self.fetch_product(id).await {
            Ok(product) => Ok(product),
            Err(e) => {
                warn!(error = %e, "product fetch failed, using sample products");
                self.fallback
                    .get(id)
                    .cloned()
                    .ok_or(ShopError::ProductNotFound { product_id: id })
            }
        }
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}

/// List/search response envelope
#[derive(Debug, Deserialize)]
struct ProductPage {
    #[serde(default)]
    products: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn remote_product(id: u64, title: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "description": "from the API",
            "price": 42,
            "rating": 4.1,
            "stock": 3,
            "thumbnail": format!("https://cdn.example.com/{id}.webp"),
            "images": [],
            "category": "remote"
        })
    }

    async fn client_for(server: &MockServer) -> CatalogClient {
        CatalogClient::new(CatalogConfig::new(format!("{}/products", server.uri()))).unwrap()
    }

    #[tokio::test]
    async fn test_all_products_from_api() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .and(query_param("limit", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "products": [remote_product(101, "Remote Lamp"), remote_product(102, "Remote Desk")],
                "total": 2,
                "skip": 0,
                "limit": 100
            })))
            .expect(1)
            .mount(&server)
            .await;

        let products = client_for(&server).await.all_products().await.unwrap();
        let ids: Vec<u64> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![101, 102]);
        assert_eq!(products[0].title, "Remote Lamp");
    }

    #[tokio::test]
    async fn test_all_products_falls_back_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let products = client_for(&server).await.all_products().await.unwrap();
        assert_eq!(products.len(), 10);
        assert_eq!(products[0].title, "Essence Mascara Lash Princess");
    }

    #[tokio::test]
    async fn test_falls_back_on_garbage_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let products = client_for(&server).await.all_products().await.unwrap();
        assert_eq!(products.len(), 10);
    }

    #[tokio::test]
    async fn test_falls_back_when_unreachable() {
        let config = CatalogConfig::new("http://127.0.0.1:1/products")
            .with_timeout(Duration::from_secs(2));
        let client = CatalogClient::new(config).unwrap();

        assert_eq!(client.all_products().await.unwrap().len(), 10);
        assert_eq!(client.product(2).await.unwrap().title, "Eyeshadow Palette with Mirror");
        let ids: Vec<u64> = client
            .search("mirror")
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn test_search_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/search"))
            .and(query_param("q", "lamp shade"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "products": [remote_product(101, "Remote Lamp")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = client_for(&server).await.search("lamp shade").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 101);
    }

    #[tokio::test]
    async fn test_product_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/101"))
            .respond_with(ResponseTemplate::new(200).set_body_json(remote_product(101, "Remote Lamp")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/products/3"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/products/999"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.product(101).await.unwrap().title, "Remote Lamp");

        // remote miss, sample hit
        assert_eq!(client.product(3).await.unwrap().title, "Powder Canister");

        // missing everywhere
        assert!(matches!(
            client.product(999).await,
            Err(ShopError::ProductNotFound { product_id: 999 })
        ));
    }

    #[tokio::test]
    async fn test_custom_fallback() {
        let mut fallback = ProductCatalog::new();
        fallback.add(Product::new(77, "Only Item", shop_core::Decimal::new(500, 2)));

        let client = CatalogClient::new(CatalogConfig::new("http://127.0.0.1:1/products"))
            .unwrap()
            .with_fallback(fallback);

        let products = client.all_products().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, 77);
    }
}
