//! Trolley
//!
//! Trolley is a shopping cart engine: a priced cart aggregate, its line items and the
//! inactivity lifecycle that abandons and eventually purges idle carts.

pub mod cart;
pub mod ids;
pub mod lifecycle;
pub mod prelude;
pub mod pricing;
pub mod products;
