//! Trolley prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartId, CartParts, CartStatus, LineItem, LineItemParts},
    ids::{Id, IdError},
    lifecycle::{LifecycleError, LifecyclePolicy},
    pricing::{PricingError, line_total, to_decimal, total_price},
    products::{Product, ProductId},
};
