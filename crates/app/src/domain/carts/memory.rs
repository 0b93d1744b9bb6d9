//! In-memory cart store.

use std::collections::HashMap;

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::RwLock;
use trolley::cart::{Cart, CartId, CartStatus};

use crate::domain::carts::{errors::StoreError, store::CartStore};

/// Cart store held in process memory; each write checks and bumps the version
/// under a single lock.
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    carts: RwLock<HashMap<CartId, Cart>>,
}

impl MemoryCartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn find_cart(&self, cart: CartId) -> Result<Option<Cart>, StoreError> {
        Ok(self.carts.read().await.get(&cart).cloned())
    }

    async fn create_cart(&self, cart: Cart) -> Result<Cart, StoreError> {
        cart.validate()?;

        let mut carts = self.carts.write().await;

        if carts.contains_key(&cart.id()) {
            return Err(StoreError::AlreadyExists(cart.id()));
        }

        let created = cart.with_version(1);

        carts.insert(created.id(), created.clone());

        Ok(created)
    }

    async fn persist(&self, cart: Cart) -> Result<Cart, StoreError> {
        cart.validate()?;

        let mut carts = self.carts.write().await;

        let stored = carts
            .get_mut(&cart.id())
            .ok_or(StoreError::NotFound(cart.id()))?;

        if stored.version() != cart.version() {
            return Err(StoreError::Conflict(cart.id()));
        }

        let version = cart.version() + 1;
        let saved = cart.with_version(version);

        *stored = saved.clone();

        Ok(saved)
    }

    async fn delete_cart(&self, cart: CartId, version: u64) -> Result<(), StoreError> {
        let mut carts = self.carts.write().await;

        let stored = carts.get(&cart).ok_or(StoreError::NotFound(cart))?;

        if stored.version() != version {
            return Err(StoreError::Conflict(cart));
        }

        carts.remove(&cart);

        Ok(())
    }

    async fn query_carts(
        &self,
        status: CartStatus,
        before: Timestamp,
    ) -> Result<Vec<Cart>, StoreError> {
        let mut matching: Vec<Cart> = self
            .carts
            .read()
            .await
            .values()
            .filter(|cart| cart.status() == status && cart.last_interaction_at() < before)
            .cloned()
            .collect();

        matching.sort_by_key(Cart::last_interaction_at);

        Ok(matching)
    }
}
