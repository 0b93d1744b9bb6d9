//! Cart Store Config

use clap::Args;
use rusty_money::{Findable, iso::Currency};

/// Cart store settings.
#[derive(Debug, Args)]
pub struct StoreConfig {
    /// ISO 4217 currency every cart is priced in
    #[arg(long, env = "CART_CURRENCY", default_value = "GBP", value_parser = parse_currency)]
    pub currency: &'static Currency,
}

fn parse_currency(code: &str) -> Result<&'static Currency, String> {
    Currency::find(&code.trim().to_ascii_uppercase())
        .ok_or_else(|| format!("unknown ISO 4217 currency code {code:?}"))
}
