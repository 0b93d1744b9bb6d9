//! Cart store and service errors.

use thiserror::Error;
use trolley::{
    cart::{CartError, CartId},
    pricing::PricingError,
    products::ProductId,
};

use crate::domain::products::CatalogError;

/// Errors raised by [`CartStore`](super::CartStore) implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cart {0} not found")]
    NotFound(CartId),

    /// The stored version moved on since the cart was read.
    #[error("cart {0} was modified concurrently")]
    Conflict(CartId),

    #[error("cart {0} already exists")]
    AlreadyExists(CartId),

    /// The stored cart, or the cart being saved, breaks an aggregate invariant.
    #[error("invalid cart data")]
    InvalidData(#[from] CartError),

    #[error("unknown currency {0:?}")]
    UnknownCurrency(String),

    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}

/// Errors raised by [`CartsService`](super::CartsService).
#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart {0} not found")]
    CartNotFound(CartId),

    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error("product {0} is already in the cart")]
    DuplicateProduct(ProductId),

    #[error("quantity {quantity} for product {product} must be between 1 and {}", u32::MAX)]
    InvalidQuantity { product: ProductId, quantity: i64 },

    /// Retries ran out while other writers kept changing the cart.
    #[error("cart {0} is too busy to update")]
    Conflict(CartId),

    #[error("failed to price cart")]
    Pricing(#[source] PricingError),

    #[error("cart store error")]
    Store(#[source] StoreError),

    #[error("product catalog error")]
    Catalog(#[from] CatalogError),
}

impl From<CartError> for CartsServiceError {
    fn from(error: CartError) -> Self {
        match error {
            CartError::ProductNotFound(product) => Self::ProductNotFound(product),
            CartError::DuplicateProduct(product) => Self::DuplicateProduct(product),
            CartError::InvalidQuantity { product, quantity } => {
                Self::InvalidQuantity { product, quantity }
            }
            CartError::Pricing(source) => Self::Pricing(source),
            error @ (CartError::NotAbandoned(_) | CartError::TotalMismatch(_)) => {
                Self::Store(StoreError::InvalidData(error))
            }
        }
    }
}

impl From<StoreError> for CartsServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(cart) => Self::CartNotFound(cart),
            StoreError::Conflict(cart) => Self::Conflict(cart),
            other => Self::Store(other),
        }
    }
}
