//! Carts Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction, query, query_as, query_scalar};
use trolley::cart::{CartId, CartStatus};

use super::records::{CartRecord, encode_version};

const GET_CART_SQL: &str = include_str!("../sql/get_cart.sql");
const QUERY_CARTS_SQL: &str = include_str!("../sql/query_carts.sql");
const CART_EXISTS_SQL: &str = include_str!("../sql/cart_exists.sql");
const CREATE_CART_SQL: &str = include_str!("../sql/create_cart.sql");
const UPDATE_CART_SQL: &str = include_str!("../sql/update_cart.sql");
const DELETE_CART_SQL: &str = include_str!("../sql/delete_cart.sql");

/// Column values written for a cart
#[derive(Debug, Clone, Copy)]
pub(crate) struct CartRow<'a> {
    pub id: CartId,
    pub status: CartStatus,
    pub currency: &'a str,
    pub total_price: Decimal,
    pub created_at: Timestamp,
    pub last_interaction_at: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartId,
    ) -> Result<Option<CartRecord>, sqlx::Error> {
        query_as::<Postgres, CartRecord>(GET_CART_SQL)
            .bind(cart.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn query_carts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: CartStatus,
        before: Timestamp,
    ) -> Result<Vec<CartRecord>, sqlx::Error> {
        query_as::<Postgres, CartRecord>(QUERY_CARTS_SQL)
            .bind(status.as_str())
            .bind(SqlxTimestamp::from(before))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn cart_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartId,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(CART_EXISTS_SQL)
            .bind(cart.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartRow<'_>,
        version: u64,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_CART_SQL)
            .bind(cart.id.into_uuid())
            .bind(cart.status.as_str())
            .bind(cart.currency)
            .bind(cart.total_price)
            .bind(encode_version(version)?)
            .bind(SqlxTimestamp::from(cart.created_at))
            .bind(SqlxTimestamp::from(cart.last_interaction_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Returns the number of rows updated, which is zero when `expected` is stale.
    pub(crate) async fn update_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartRow<'_>,
        expected: u64,
        version: u64,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_CART_SQL)
            .bind(cart.id.into_uuid())
            .bind(cart.status.as_str())
            .bind(cart.total_price)
            .bind(SqlxTimestamp::from(cart.last_interaction_at))
            .bind(encode_version(expected)?)
            .bind(encode_version(version)?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartId,
        version: u64,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_SQL)
            .bind(cart.into_uuid())
            .bind(encode_version(version)?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
