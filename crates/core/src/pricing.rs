//! Pricing

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::cart::LineItem;

/// Errors that can occur while pricing line items and carts.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// `unit_price × quantity` does not fit in the currency's minor units.
    #[error("line total for {quantity} × {unit_price} is out of range")]
    Overflow {
        /// Unit price of the line
        unit_price: Decimal,

        /// Quantity of the line
        quantity: u32,
    },

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Price a single line: `unit_price × quantity`, rounded half away from zero to the
/// currency's precision.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: The product cannot be represented in minor units.
pub fn line_total(
    unit_price: Decimal,
    quantity: u32,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let overflow = || PricingError::Overflow {
        unit_price,
        quantity,
    };

    let mut rounded = unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(overflow)?
        .round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero);

    rounded.rescale(currency.exponent);

    let minor = i64::try_from(rounded.mantissa()).map_err(|_err| overflow())?;

    Ok(Money::from_minor(minor, currency))
}

/// Sum of the already-rounded line totals, starting from zero in `currency`.
///
/// # Errors
///
/// - [`PricingError::Money`]: A line is priced in another currency, or the sum overflows.
pub fn total_price(
    items: &[LineItem],
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let total = items
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, item| {
            acc.add(*item.total_price())
        })?;

    Ok(total)
}

/// Convert an amount back to major units, e.g. `199` pence to `1.99`.
pub fn to_decimal(money: &Money<'static, Currency>) -> Decimal {
    Decimal::new(money.to_minor_units(), money.currency().exponent)
}
