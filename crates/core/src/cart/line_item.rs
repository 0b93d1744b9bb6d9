//! Line items

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::{PricingError, line_total},
    products::{Product, ProductId},
};

/// One product in a cart, with its quantity and rounded line total.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    product: Product,
    quantity: u32,
    total_price: Money<'static, Currency>,
}

impl LineItem {
    /// Price `quantity` units of `product`.
    ///
    /// # Errors
    ///
    /// - [`PricingError::Overflow`]: The line total is out of range.
    pub(crate) fn priced(
        product: Product,
        quantity: u32,
        currency: &'static Currency,
    ) -> Result<Self, PricingError> {
        let total_price = line_total(product.unit_price, quantity, currency)?;

        Ok(Self {
            product,
            quantity,
            total_price,
        })
    }

    /// Product on this line
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Product identifier on this line
    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Quantity, always at least one
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price of the product
    pub fn unit_price(&self) -> Decimal {
        self.product.unit_price
    }

    /// `unit_price × quantity`, rounded to currency precision
    pub fn total_price(&self) -> &Money<'static, Currency> {
        &self.total_price
    }
}
