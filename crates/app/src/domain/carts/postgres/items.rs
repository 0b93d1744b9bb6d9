//! Cart Items Repository

use sqlx::{Postgres, Transaction, query, query_as};
use trolley::cart::{CartId, LineItem};
use uuid::Uuid;

use super::records::CartItemRecord;

const GET_CART_ITEMS_SQL: &str = include_str!("../sql/get_cart_items.sql");
const CREATE_CART_ITEMS_SQL: &str = include_str!("../sql/create_cart_items.sql");
const DELETE_CART_ITEMS_SQL: &str = include_str!("../sql/delete_cart_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Items of every cart in `carts`, grouped by cart and in insertion order.
    pub(crate) async fn get_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        carts: &[CartId],
    ) -> Result<Vec<CartItemRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = carts.iter().map(|cart| cart.into_uuid()).collect();

        query_as::<Postgres, CartItemRecord>(GET_CART_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    /// Replace the stored items of `cart` with `items`, keeping their order.
    pub(crate) async fn replace_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartId,
        items: &[LineItem],
    ) -> Result<(), sqlx::Error> {
        query(DELETE_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?;

        if items.is_empty() {
            return Ok(());
        }

        let products: Vec<Uuid> = items
            .iter()
            .map(|item| item.product_id().into_uuid())
            .collect();
        let quantities: Vec<i64> = items
            .iter()
            .map(|item| i64::from(item.quantity()))
            .collect();
        let positions: Vec<i64> = (0..).take(items.len()).collect();

        query(CREATE_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .bind(products)
            .bind(quantities)
            .bind(positions)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}
