//! Product Records

use rust_decimal::Decimal;
use sqlx::{FromRow, Row, postgres::PgRow};
use trolley::products::{Product, ProductId};

use crate::domain::products::errors::CatalogError;

/// Product to add to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
}

impl NewProduct {
    /// Check the product can be listed.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::MissingName`]: The name is blank.
    /// - [`CatalogError::InvalidPrice`]: The price is negative.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::MissingName);
        }

        if self.unit_price < Decimal::ZERO {
            return Err(CatalogError::InvalidPrice(self.unit_price));
        }

        Ok(())
    }
}

impl From<NewProduct> for Product {
    fn from(product: NewProduct) -> Self {
        Product::new(product.id, product.name, product.unit_price)
    }
}

/// Product row
#[derive(Debug, Clone)]
pub(crate) struct ProductRecord(pub(crate) Product);

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self(Product::new(
            ProductId::from_uuid(row.try_get("uuid")?),
            row.try_get::<String, _>("name")?,
            row.try_get::<Decimal, _>("price")?,
        )))
    }
}
