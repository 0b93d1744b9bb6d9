//! Products

use rust_decimal::Decimal;

use crate::ids::Id;

/// Product identifier
pub type ProductId = Id<Product>;

/// Product, as supplied by the catalog. Carts read products but never change them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Unit price in major currency units, e.g. `1.99`
    pub unit_price: Decimal,
}

impl Product {
    /// Create a new product.
    pub fn new(id: ProductId, name: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
        }
    }
}
