//! Products Repository

use sqlx::{Postgres, Transaction, query_as};
use trolley::products::{Product, ProductId};

use crate::domain::products::records::{NewProduct, ProductRecord};

const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductId,
    ) -> Result<Option<Product>, sqlx::Error> {
        let record = query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(record.map(|ProductRecord(product)| product))
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let records = query_as::<Postgres, ProductRecord>(LIST_PRODUCTS_SQL)
            .fetch_all(&mut **tx)
            .await?;

        Ok(records
            .into_iter()
            .map(|ProductRecord(product)| product)
            .collect())
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: NewProduct,
    ) -> Result<Product, sqlx::Error> {
        let ProductRecord(created) = query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.id.into_uuid())
            .bind(product.name)
            .bind(product.unit_price)
            .fetch_one(&mut **tx)
            .await?;

        Ok(created)
    }
}
