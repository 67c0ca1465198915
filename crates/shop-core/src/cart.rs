//! # Cart Types
//!
//! Line items and the in-memory cart state.
//!
//! `CartState` owns the merge rules; it never touches storage. Persistence and
//! change notification live in [`crate::store::CartStore`].

use crate::error::{ShopError, ShopResult};
use crate::product::{Product, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One product's entry in the cart.
///
/// Title, price and thumbnail are frozen at the moment the product is added.
/// They are never re-synced from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Catalog product ID (unique within a cart)
    pub product_id: ProductId,

    /// Product title at add time
    pub title: String,

    /// Unit price at add time
    pub unit_price: Decimal,

    /// Quantity (always >= 1 once in a cart)
    pub quantity: u32,

    /// Opaque thumbnail reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_ref: Option<String>,
}

impl LineItem {
    /// Create a line item
    pub fn new(
        product_id: ProductId,
        title: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
    ) -> Self {
        Self {
            product_id,
            title: title.into(),
            unit_price,
            quantity,
            thumbnail_ref: None,
        }
    }

    /// Create a line item from a catalog product
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        let thumbnail_ref = if product.thumbnail.is_empty() {
            None
        } else {
            Some(product.thumbnail.clone())
        };

        Self {
            product_id: product.id,
            title: product.title.clone(),
            unit_price: product.price,
            quantity,
            thumbnail_ref,
        }
    }

    /// Builder: set thumbnail reference
    pub fn with_thumbnail(mut self, thumbnail_ref: impl Into<String>) -> Self {
        self.thumbnail_ref = Some(thumbnail_ref.into());
        self
    }

    /// `unit_price * quantity`
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Reject items that would break cart invariants
    pub fn validate(&self) -> ShopResult<()> {
        if self.quantity == 0 {
            return Err(ShopError::InvalidArgument(format!(
                "quantity for product {} must be at least 1",
                self.product_id
            )));
        }
        if self.unit_price.is_sign_negative() && !self.unit_price.is_zero() {
            return Err(ShopError::InvalidArgument(format!(
                "unit price for product {} must not be negative",
                self.product_id
            )));
        }
        Ok(())
    }
}

/// Aggregates published to cart observers (badge, totals row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    /// Sum of quantities
    pub total_items: u64,
    /// Sum of line totals
    pub total_price: Decimal,
    /// Number of distinct products
    pub line_count: usize,
}

/// Ordered set of line items, unique by product ID.
///
/// Serializes as a bare JSON array, which is the persisted snapshot format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartState {
    items: Vec<LineItem>,
}

impl CartState {
    /// Create an empty cart
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from items, checking the uniqueness and quantity invariants
    pub fn from_items(items: Vec<LineItem>) -> ShopResult<Self> {
        for (idx, item) in items.iter().enumerate() {
            item.validate()?;
            if items[..idx].iter().any(|i| i.product_id == item.product_id) {
                return Err(ShopError::InvalidArgument(format!(
                    "duplicate product {} in cart",
                    item.product_id
                )));
            }
        }
        Ok(Self { items })
    }

    /// Parse a persisted snapshot
    pub fn from_json(json: &str) -> ShopResult<Self> {
        let items: Vec<LineItem> = serde_json::from_str(json)?;
        Self::from_items(items)
    }

    /// Serialize to the persisted snapshot format
    pub fn to_json(&self) -> ShopResult<String> {
        Ok(serde_json::to_string(&self.items)?)
    }

    /// Line items in insertion order
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Find a line item by product ID
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Number of distinct products
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add an item, merging into an existing line with the same product ID.
    ///
    /// On merge only the quantity changes; the existing title, price and
    /// thumbnail win over the incoming ones.
    pub fn add(&mut self, item: LineItem) -> ShopResult<()> {
        item.validate()?;

        match self
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id)
        {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(item.quantity).ok_or_else(|| {
                    ShopError::InvalidArgument(format!(
                        "quantity for product {} overflows",
                        item.product_id
                    ))
                })?;
            }
            None => self.items.push(item),
        }
        Ok(())
    }

    /// Remove a product. Returns whether anything was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != before
    }

    /// Set an absolute quantity; `<= 0` removes the line.
    ///
    /// Returns whether the cart changed. Unknown products are ignored.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> ShopResult<bool> {
        if quantity <= 0 {
            return Ok(self.remove(product_id));
        }

        let quantity = u32::try_from(quantity).map_err(|_| {
            ShopError::InvalidArgument(format!("quantity {quantity} is too large"))
        })?;

        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Remove every line
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of quantities
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of `unit_price * quantity`
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Aggregates in one pass
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            total_items: self.total_items(),
            total_price: self.total_price(),
            line_count: self.items.len(),
        }
    }
}
