//! # Product Types
//!
//! Catalog records for simpleshop.
//! Products normally come from the remote catalog API; `ProductCatalog::sample()`
//! is the fixed local dataset served whenever that API cannot be reached.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog product identifier
pub type ProductId = u64;

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier
    pub id: ProductId,

    /// Display title
    pub title: String,

    /// Long description
    #[serde(default)]
    pub description: String,

    /// Unit price in the store currency
    pub price: Decimal,

    /// Average review rating (0.0 - 5.0)
    #[serde(default)]
    pub rating: f64,

    /// Units in stock
    #[serde(default)]
    pub stock: u32,

    /// Thumbnail reference (URL)
    #[serde(default)]
    pub thumbnail: String,

    /// Additional image references
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,

    /// Category slug (e.g., "beauty")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Product {
    /// Create a product with the required fields
    pub fn new(id: ProductId, title: impl Into<String>, price: Decimal) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            price,
            rating: 0.0,
            stock: 0,
            thumbnail: String::new(),
            images: None,
            category: None,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: set category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Builder: set rating and stock
    pub fn with_stats(mut self, rating: f64, stock: u32) -> Self {
        self.rating = rating;
        self.stock = stock;
        self
    }

    /// Builder: set thumbnail
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = thumbnail.into();
        self
    }

    /// Case-insensitive substring match over title and description
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}

/// A list of products (the sample dataset, or a TOML override of it)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    pub products: Vec<Product>,
}

impl ProductCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Add a product to the catalog
    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Find a product by ID
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products whose title or description contains `query`
    pub fn search(&self, query: &str) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.matches(query))
            .cloned()
            .collect()
    }

    /// Number of products
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// The built-in sample dataset used when the remote catalog is unavailable
    pub fn sample() -> Self {
        let thumb = |id: u64| format!("https://cdn.dummyjson.com/product-images/{id}/thumbnail.webp");

        let products = vec![
            Product::new(1, "Essence Mascara Lash Princess", Decimal::new(999, 2))
                .with_description("Volumizing and lengthening effects. Achieve dramatic lashes with this long-lasting formula.")
                .with_category("beauty")
                .with_stats(4.56, 99),
            Product::new(2, "Eyeshadow Palette with Mirror", Decimal::new(1999, 2))
                .with_description("Versatile range of eyeshadow shades for creating stunning eye looks.")
                .with_category("beauty")
                .with_stats(3.86, 34),
            Product::new(3, "Powder Canister", Decimal::new(1499, 2))
                .with_description("Finely milled setting powder designed to set makeup and control shine.")
                .with_category("beauty")
                .with_stats(4.64, 89),
            Product::new(4, "Red Lipstick", Decimal::new(1299, 2))
                .with_description("Classic and bold choice for adding a pop of color. Creamy and pigmented formula.")
                .with_category("beauty")
                .with_stats(4.36, 91),
            Product::new(5, "Red Nail Polish", Decimal::new(899, 2))
                .with_description("Rich and glossy red hue for vibrant and polished nails with quick-drying formula.")
                .with_category("beauty")
                .with_stats(4.32, 79),
            Product::new(6, "Calvin Klein CK One", Decimal::new(4999, 2))
                .with_description("Classic unisex fragrance, known for its fresh and clean scent. Versatile for everyday wear.")
                .with_category("fragrances")
                .with_stats(4.37, 29),
            Product::new(7, "Chanel Coco Noir Eau De", Decimal::new(12999, 2))
                .with_description("Elegant and mysterious fragrance with grapefruit, rose, and sandalwood notes.")
                .with_category("fragrances")
                .with_stats(4.26, 58),
            Product::new(8, "Dior J'adore", Decimal::new(8999, 2))
                .with_description("Luxurious floral fragrance blending ylang-ylang, rose, and jasmine.")
                .with_category("fragrances")
                .with_stats(3.8, 98),
            Product::new(9, "Samsung 49-Inch CHG90", Decimal::new(99999, 2))
                .with_description("Super ultrawide gaming monitor with 144Hz refresh rate.")
                .with_category("electronics")
                .with_stats(4.5, 15),
            Product::new(10, "Apple AirPods Pro", Decimal::new(19999, 2))
                .with_description("Wireless earbuds with active noise cancellation and spatial audio.")
                .with_category("electronics")
                .with_stats(4.7, 45),
        ];

        Self {
            products: products
                .into_iter()
                .map(|p| {
                    let id = p.id;
                    p.with_thumbnail(thumb(id))
                })
                .collect(),
        }
    }
}
