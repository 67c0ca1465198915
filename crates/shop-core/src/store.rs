//! # Cart Store
//!
//! Single source of truth for the shopping cart.
//!
//! Every mutation follows the same sequence:
//!
//! ```text
//! ┌────────┐    ┌──────────┐    ┌───────────────┐    ┌────────────────┐
//! │ modify │───►│ snapshot │───►│ store.set(key)│───►│ publish summary│
//! │ memory │    │  (JSON)  │    │ (write-through)│   │  to watchers   │
//! └────────┘    └──────────┘    └───────────────┘    └────────────────┘
//! ```
//!
//! A failed write is returned as `ShopError::Storage`. The in-memory cart keeps
//! the mutation, so memory and storage disagree until the next successful
//! write. There is no retry.
//!
//! Mutations take `&mut self`; share a store between tasks behind a
//! `tokio::sync::Mutex`.

use crate::cart::{CartState, CartSummary, LineItem};
use crate::error::ShopResult;
use crate::product::ProductId;
use crate::storage::SharedStore;
use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Storage key used when none is configured
pub const DEFAULT_CART_KEY: &str = "@simpleshop_cart";

/// Cart state plus its write-through persistence.
pub struct CartStore {
    state: CartState,
    store: SharedStore,
    key: String,
    summary_tx: watch::Sender<CartSummary>,
}

impl CartStore {
    /// Create an empty store. Nothing is read until [`CartStore::load`].
    pub fn new(store: SharedStore, key: impl Into<String>) -> Self {
        let (summary_tx, _) = watch::channel(CartSummary::default());
        Self {
            state: CartState::new(),
            store,
            key: key.into(),
            summary_tx,
        }
    }

    /// Create a store and hydrate it from storage.
    pub async fn open(store: SharedStore, key: impl Into<String>) -> Self {
        let mut cart = Self::new(store, key);
        cart.load().await;
        cart
    }

    /// Storage key this cart is persisted under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Replace in-memory state with the persisted snapshot.
    ///
    /// Missing, unreadable or corrupt snapshots all yield an empty cart.
    pub async fn load(&mut self) -> &CartState {
        self.state = match self.store.get(&self.key).await {
            Ok(Some(json)) => match CartState::from_json(&json) {
                Ok(state) => state,
                Err(e) => {
                    warn!(key = %self.key, error = %e, "discarding corrupt cart snapshot");
                    CartState::new()
                }
            },
            Ok(None) => {
                debug!(key = %self.key, "no cart snapshot, starting empty");
                CartState::new()
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read cart snapshot, starting empty");
                CartState::new()
            }
        };

        info!(
            key = %self.key,
            backend = self.store.backend_name(),
            lines = self.state.len(),
            items = self.state.total_items(),
            "cart loaded"
        );
        self.publish();
        &self.state
    }

    /// Add an item, merging quantities with an existing line for the same product.
    ///
    /// Descriptive fields of an existing line are kept (first write wins).
    #[instrument(skip(self, item), fields(product_id = item.product_id, quantity = item.quantity))]
    pub async fn add(&mut self, item: LineItem) -> ShopResult<()> {
        self.state.add(item)?;
        self.commit().await
    }

    /// Remove a product. Absent products are a no-op, but the cart is still persisted.
    #[instrument(skip(self))]
    pub async fn remove(&mut self, product_id: ProductId) -> ShopResult<()> {
        if !self.state.remove(product_id) {
            debug!("product not in cart");
        }
        self.commit().await
    }

    /// Set an absolute quantity. `quantity <= 0` removes the product.
    #[instrument(skip(self))]
    pub async fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> ShopResult<()> {
        self.state.update_quantity(product_id, quantity)?;
        self.commit().await
    }

    /// Empty the cart and persist the empty state.
    #[instrument(skip(self))]
    pub async fn clear(&mut self) -> ShopResult<()> {
        self.state.clear();
        self.commit().await
    }

    /// Sum of quantities
    pub fn total_items(&self) -> u64 {
        self.state.total_items()
    }

    /// Sum of `unit_price * quantity`
    pub fn total_price(&self) -> Decimal {
        self.state.total_price()
    }

    /// Totals snapshot, the value subscribers receive
    pub fn summary(&self) -> CartSummary {
        self.state.summary()
    }

    /// The in-memory cart
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Line items in insertion order
    pub fn items(&self) -> &[LineItem] {
        self.state.items()
    }

    /// Line item for a product, if present
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.state.get(product_id)
    }

    /// True when the cart has no lines
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Watch the cart summary. The receiver sees the value as of the last
    /// load or mutation.
    pub fn subscribe(&self) -> watch::Receiver<CartSummary> {
        self.summary_tx.subscribe()
    }

    async fn commit(&mut self) -> ShopResult<()> {
        let result = self.persist().await;
        // Watchers mirror memory, which already changed even if the write failed.
        self.publish();
        result
    }

    async fn persist(&self) -> ShopResult<()> {
        let json = self.state.to_json()?;
        self.store.set(&self.key, &json).await.map_err(|e| {
            warn!(error = %e, key = %self.key, "cart write failed, storage is stale");
            e
        })?;
        debug!(lines = self.state.len(), "cart persisted");
        Ok(())
    }

    fn publish(&self) {
        self.summary_tx.send_replace(self.state.summary());
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("backend", &self.store.backend_name())
            .field("state", &self.state)
            .finish()
    }
}
