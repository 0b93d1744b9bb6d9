//! Cart Records

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Row, postgres::PgRow};
use trolley::{
    cart::{CartId, CartStatus},
    products::{Product, ProductId},
};

/// Cart row, without its line items
#[derive(Debug, Clone)]
pub(crate) struct CartRecord {
    pub id: CartId,
    pub status: CartStatus,
    pub currency: String,
    pub version: u64,
    pub created_at: Timestamp,
    pub last_interaction_at: Timestamp,
}

/// Line item row, joined with its product
#[derive(Debug, Clone)]
pub(crate) struct CartItemRecord {
    pub cart: CartId,
    pub product: Product,
    pub quantity: i64,
}

impl<'r> FromRow<'r, PgRow> for CartRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        Ok(Self {
            id: CartId::from_uuid(row.try_get("uuid")?),
            status: status.parse().map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?,
            currency: row.try_get("currency")?,
            version: try_get_version(row)?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            last_interaction_at: row
                .try_get::<SqlxTimestamp, _>("last_interaction_at")?
                .to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CartItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            cart: CartId::from_uuid(row.try_get("cart_uuid")?),
            product: Product::new(
                ProductId::from_uuid(row.try_get("uuid")?),
                row.try_get::<String, _>("name")?,
                row.try_get::<Decimal, _>("price")?,
            ),
            quantity: row.try_get("quantity")?,
        })
    }
}

fn try_get_version(row: &PgRow) -> Result<u64, sqlx::Error> {
    let version: i64 = row.try_get("version")?;

    u64::try_from(version).map_err(|e| sqlx::Error::ColumnDecode {
        index: "version".to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn encode_version(version: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(version).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}
