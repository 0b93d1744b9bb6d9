//! Cart errors

use thiserror::Error;

use crate::{cart::CartId, pricing::PricingError, products::ProductId};

/// Errors raised by cart operations. A failed operation leaves the cart untouched.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// The product has no line in this cart.
    #[error("product {0} is not in the cart")]
    ProductNotFound(ProductId),

    /// The product already has a line in this cart.
    #[error("product {0} is already in the cart")]
    DuplicateProduct(ProductId),

    /// The requested or resulting quantity is outside `1..=u32::MAX`.
    #[error("quantity {quantity} for product {product} must be between 1 and {}", u32::MAX)]
    InvalidQuantity {
        /// Product the quantity was for
        product: ProductId,

        /// Rejected quantity
        quantity: i64,
    },

    /// Only abandoned carts can be purged.
    #[error("cart {0} is still active")]
    NotAbandoned(CartId),

    /// The cart total is not the sum of its lines.
    #[error("cart {0} total does not match its lines")]
    TotalMismatch(CartId),

    /// Line or cart total could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}
