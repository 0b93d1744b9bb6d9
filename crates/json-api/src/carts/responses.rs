//! Cart Responses

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trolley::{
    cart::{Cart, LineItem},
    pricing::to_decimal,
};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub id: Uuid,

    /// Lifecycle status, `active` or `abandoned`
    pub status: String,

    /// Line items in the order they were added
    pub products: Vec<CartProductResponse>,

    /// Sum of the line totals, in major currency units
    pub total_price: f64,

    /// The date and time the cart was last changed
    pub last_interaction_at: String,
}

impl TryFrom<Cart> for CartResponse {
    type Error = StatusError;

    fn try_from(cart: Cart) -> Result<Self, Self::Error> {
        Ok(Self {
            id: cart.id().into_uuid(),
            status: cart.status().as_str().to_string(),
            products: cart
                .line_items()
                .iter()
                .map(CartProductResponse::try_from)
                .collect::<Result<_, _>>()?,
            total_price: amount(to_decimal(cart.total_price()))?,
            last_interaction_at: cart.last_interaction_at().to_string(),
        })
    }
}

/// Cart Line Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartProductResponse {
    /// The unique identifier of the product
    pub id: Uuid,

    /// Product display name
    pub name: String,

    /// Units of the product in the cart
    pub quantity: u32,

    /// Price of one unit, in major currency units
    pub unit_price: f64,

    /// Quantity times unit price, rounded to the currency's minor unit
    pub total_price: f64,
}

impl TryFrom<&LineItem> for CartProductResponse {
    type Error = StatusError;

    fn try_from(line: &LineItem) -> Result<Self, Self::Error> {
        Ok(Self {
            id: line.product_id().into_uuid(),
            name: line.product().name.clone(),
            quantity: line.quantity(),
            unit_price: amount(line.unit_price())?,
            total_price: amount(to_decimal(line.total_price()))?,
        })
    }
}

fn amount(value: Decimal) -> Result<f64, StatusError> {
    value
        .to_f64()
        .ok_or_else(StatusError::internal_server_error)
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rusty_money::iso;
    use testresult::TestResult;
    use trolley::{
        cart::CartId,
        products::{Product, ProductId},
    };

    use super::*;

    #[test]
    fn renders_lines_in_insertion_order_with_rounded_totals() -> TestResult {
        let now = Timestamp::UNIX_EPOCH;
        let mut cart = Cart::new(CartId::new(), iso::GBP, now);

        let tea = Product::new(ProductId::new(), "Tea", Decimal::new(3333, 3));
        let milk = Product::new(ProductId::new(), "Milk", Decimal::new(120, 2));

        cart.add_product(tea, 3, now)?;
        cart.add_product(milk, 1, now)?;

        let response = CartResponse::try_from(cart)?;

        let names: Vec<_> = response.products.iter().map(|line| line.name.as_str()).collect();

        assert_eq!(names, ["Tea", "Milk"]);
        assert_eq!(response.status, "active");
        let tea_total = response.products.first().map(|line| line.total_price);

        assert!(tea_total.is_some_and(|total| (total - 10.0).abs() < f64::EPSILON), "3 x 3.333");
        assert!((response.total_price - 11.2).abs() < f64::EPSILON, "10.00 + 1.20");

        Ok(())
    }

    #[test]
    fn empty_cart_totals_zero() -> TestResult {
        let cart = Cart::new(CartId::new(), iso::GBP, Timestamp::UNIX_EPOCH);

        let response = CartResponse::try_from(cart)?;

        assert!(response.products.is_empty(), "no lines");
        assert!(response.total_price.abs() < f64::EPSILON, "zero total");

        Ok(())
    }
}
