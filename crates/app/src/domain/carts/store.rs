//! Cart persistence contract.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use trolley::cart::{Cart, CartId, CartStatus};

use crate::domain::carts::errors::StoreError;

/// Durable storage for carts.
///
/// Writes are optimistic: every stored cart carries a version, and a write made
/// from a stale read fails with [`StoreError::Conflict`] instead of overwriting
/// the newer state. Implementations re-validate carts before saving them.
#[automock]
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Load a cart, returning `None` if it does not exist.
    async fn find_cart(&self, cart: CartId) -> Result<Option<Cart>, StoreError>;

    /// Insert a cart that has never been saved. Returns it at version `1`.
    async fn create_cart(&self, cart: Cart) -> Result<Cart, StoreError>;

    /// Replace a stored cart, provided it is still at `cart.version()`.
    /// Returns the cart at its new version.
    async fn persist(&self, cart: Cart) -> Result<Cart, StoreError>;

    /// Delete a cart, provided it is still at `version`.
    async fn delete_cart(&self, cart: CartId, version: u64) -> Result<(), StoreError>;

    /// Carts in `status` whose last interaction is strictly before `before`,
    /// least recently used first. Carts that cannot be read back are logged
    /// and left out rather than failing the whole query.
    async fn query_carts(
        &self,
        status: CartStatus,
        before: Timestamp,
    ) -> Result<Vec<Cart>, StoreError>;
}
