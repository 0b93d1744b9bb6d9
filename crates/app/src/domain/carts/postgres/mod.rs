//! Postgres cart store.

use std::collections::HashMap;

use async_trait::async_trait;
use jiff::Timestamp;
use rusty_money::{Findable, iso::Currency};
use sqlx::error::{DatabaseError, ErrorKind};
use tracing::warn;
use trolley::{
    cart::{Cart, CartId, CartParts, CartStatus, LineItemParts},
    pricing::to_decimal,
};

use crate::{
    database::Db,
    domain::carts::{errors::StoreError, store::CartStore},
};

use self::{
    carts::{CartRow, PgCartsRepository},
    items::PgCartItemsRepository,
    records::{CartItemRecord, CartRecord},
};

mod carts;
mod items;
mod records;

#[derive(Debug, Clone)]
pub struct PgCartStore {
    db: Db,
    carts: PgCartsRepository,
    items: PgCartItemsRepository,
}

impl PgCartStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts: PgCartsRepository::new(),
            items: PgCartItemsRepository::new(),
        }
    }
}

#[async_trait]
impl CartStore for PgCartStore {
    async fn find_cart(&self, cart: CartId) -> Result<Option<Cart>, StoreError> {
        let mut tx = self.db.begin().await?;

        let Some(record) = self.carts.get_cart(&mut tx, cart).await? else {
            return Ok(None);
        };

        let items = self.items.get_cart_items(&mut tx, &[cart]).await?;

        tx.commit().await?;

        assemble(record, items).map(Some)
    }

    async fn create_cart(&self, cart: Cart) -> Result<Cart, StoreError> {
        cart.validate()?;

        let created = cart.with_version(1);
        let mut tx = self.db.begin().await?;

        self.carts
            .create_cart(&mut tx, cart_row(&created), created.version())
            .await
            .map_err(|error| match error.as_database_error().map(DatabaseError::kind) {
                Some(ErrorKind::UniqueViolation) => StoreError::AlreadyExists(created.id()),
                _ => StoreError::Sql(error),
            })?;

        self.items
            .replace_cart_items(&mut tx, created.id(), created.line_items())
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn persist(&self, cart: Cart) -> Result<Cart, StoreError> {
        cart.validate()?;

        let expected = cart.version();
        let saved = cart.with_version(expected + 1);
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .carts
            .update_cart(&mut tx, cart_row(&saved), expected, saved.version())
            .await?;

        if rows_affected == 0 {
            return Err(if self.carts.cart_exists(&mut tx, saved.id()).await? {
                StoreError::Conflict(saved.id())
            } else {
                StoreError::NotFound(saved.id())
            });
        }

        self.items
            .replace_cart_items(&mut tx, saved.id(), saved.line_items())
            .await?;

        tx.commit().await?;

        Ok(saved)
    }

    async fn delete_cart(&self, cart: CartId, version: u64) -> Result<(), StoreError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.carts.delete_cart(&mut tx, cart, version).await?;

        if rows_affected == 0 {
            return Err(if self.carts.cart_exists(&mut tx, cart).await? {
                StoreError::Conflict(cart)
            } else {
                StoreError::NotFound(cart)
            });
        }

        tx.commit().await?;

        Ok(())
    }

    async fn query_carts(
        &self,
        status: CartStatus,
        before: Timestamp,
    ) -> Result<Vec<Cart>, StoreError> {
        let mut tx = self.db.begin().await?;

        let records = self.carts.query_carts(&mut tx, status, before).await?;
        let ids: Vec<CartId> = records.iter().map(|record| record.id).collect();
        let items = self.items.get_cart_items(&mut tx, &ids).await?;

        tx.commit().await?;

        let mut items_by_cart: HashMap<CartId, Vec<CartItemRecord>> = HashMap::new();

        for item in items {
            items_by_cart.entry(item.cart).or_default().push(item);
        }

        // An unreadable cart must not hide the rest of the batch from the sweeper.
        let carts = records
            .into_iter()
            .filter_map(|record| {
                let id = record.id;
                let items = items_by_cart.remove(&id).unwrap_or_default();

                assemble(record, items)
                    .inspect_err(|error| warn!(cart = %id, %error, "skipping unreadable cart"))
                    .ok()
            })
            .collect();

        Ok(carts)
    }
}

fn cart_row(cart: &Cart) -> CartRow<'static> {
    CartRow {
        id: cart.id(),
        status: cart.status(),
        currency: cart.currency().iso_alpha_code,
        total_price: to_decimal(cart.total_price()),
        created_at: cart.created_at(),
        last_interaction_at: cart.last_interaction_at(),
    }
}

fn assemble(record: CartRecord, items: Vec<CartItemRecord>) -> Result<Cart, StoreError> {
    let currency = Currency::find(&record.currency)
        .ok_or_else(|| StoreError::UnknownCurrency(record.currency.clone()))?;

    let cart = Cart::from_parts(CartParts {
        id: record.id,
        status: record.status,
        currency,
        line_items: items
            .into_iter()
            .map(|item| LineItemParts {
                product: item.product,
                quantity: item.quantity,
            })
            .collect(),
        created_at: record.created_at,
        last_interaction_at: record.last_interaction_at,
        version: record.version,
    })?;

    Ok(cart)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use jiff::SignedDuration;
    use jiff_sqlx::Timestamp as SqlxTimestamp;
    use rust_decimal::Decimal;
    use rusty_money::{Money, iso};
    use testresult::TestResult;
    use trolley::{
        lifecycle::LifecyclePolicy,
        products::{Product, ProductId},
    };

    use crate::{
        domain::products::{NewProduct, ProductCatalog},
        sweeper::Sweeper,
        test::TestContext,
    };

    use super::*;

    async fn create_product(ctx: &TestContext, name: &str, minor: i64) -> TestResult<Product> {
        Ok(ctx
            .products
            .create_product(NewProduct {
                id: ProductId::new(),
                name: name.to_string(),
                unit_price: Decimal::new(minor, 2),
            })
            .await?)
    }

    /// Stale active cart priced in a currency no store would accept.
    async fn insert_unreadable_cart(ctx: &TestContext, at: Timestamp) -> TestResult<CartId> {
        let id = CartId::new();

        sqlx::query(include_str!("../sql/create_cart.sql"))
            .bind(id.into_uuid())
            .bind("active")
            .bind("XYZ")
            .bind(Decimal::ZERO)
            .bind(1_i64)
            .bind(SqlxTimestamp::from(at))
            .bind(SqlxTimestamp::from(at))
            .execute(ctx.pool())
            .await?;

        Ok(id)
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn created_cart_round_trips_with_items_in_order() -> TestResult {
        let ctx = TestContext::new().await;
        let tea = create_product(&ctx, "Tea", 1_99).await?;
        let milk = create_product(&ctx, "Milk", 85).await?;
        let now = Timestamp::now();

        let mut cart = Cart::new(CartId::new(), iso::GBP, now);
        cart.add_product(milk.clone(), 1, now)?;
        cart.add_product(tea.clone(), 2, now)?;

        let created = ctx.carts.create_cart(cart).await?;
        let found = ctx
            .carts
            .find_cart(created.id())
            .await?
            .ok_or("cart missing")?;

        let order: Vec<ProductId> = found
            .line_items()
            .iter()
            .map(|item| item.product_id())
            .collect();

        assert_eq!(found.version(), 1);
        assert_eq!(order, vec![milk.id, tea.id]);
        assert_eq!(found.total_price(), &Money::from_minor(4_83, iso::GBP));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn persist_from_a_stale_read_conflicts() -> TestResult {
        let ctx = TestContext::new().await;
        let tea = create_product(&ctx, "Tea", 1_99).await?;
        let now = Timestamp::now();

        let created = ctx
            .carts
            .create_cart(Cart::new(CartId::new(), iso::GBP, now))
            .await?;

        let mut first = created.clone();
        let mut second = created;

        first.add_product(tea.clone(), 1, now)?;
        second.add_product(tea, 3, now)?;

        let saved = ctx.carts.persist(first).await?;
        let result = ctx.carts.persist(second).await;

        assert_eq!(saved.version(), 2);
        assert!(
            matches!(result, Err(StoreError::Conflict(_))),
            "expected Conflict, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn delete_missing_cart_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx.carts.delete_cart(CartId::new(), 1).await;

        assert!(
            matches!(result, Err(StoreError::NotFound(_))),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn query_returns_idle_carts_with_their_items() -> TestResult {
        let ctx = TestContext::new().await;
        let tea = create_product(&ctx, "Tea", 1_99).await?;
        let now = Timestamp::now();
        let idle_since = now.checked_sub(SignedDuration::from_hours(4))?;

        let mut idle = Cart::new(CartId::new(), iso::GBP, idle_since);
        idle.add_product(tea, 1, idle_since)?;

        let idle = ctx.carts.create_cart(idle).await?;
        ctx.carts
            .create_cart(Cart::new(CartId::new(), iso::GBP, now))
            .await?;

        let cutoff = now.checked_sub(SignedDuration::from_hours(3))?;
        let found = ctx.carts.query_carts(CartStatus::Active, cutoff).await?;

        let ids: Vec<CartId> = found.iter().map(Cart::id).collect();

        assert_eq!(ids, vec![idle.id()]);
        assert_eq!(found.first().map(Cart::len), Some(1));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn query_skips_unreadable_carts() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();
        let idle_since = now.checked_sub(SignedDuration::from_hours(4))?;

        let idle = ctx
            .carts
            .create_cart(Cart::new(CartId::new(), iso::GBP, idle_since))
            .await?;

        let unreadable = insert_unreadable_cart(&ctx, idle_since).await?;

        let cutoff = now.checked_sub(SignedDuration::from_hours(3))?;
        let found = ctx.carts.query_carts(CartStatus::Active, cutoff).await?;

        let ids: Vec<CartId> = found.iter().map(Cart::id).collect();

        assert_eq!(ids, vec![idle.id()]);

        let lookup = ctx.carts.find_cart(unreadable).await;

        assert!(
            matches!(lookup, Err(StoreError::UnknownCurrency(ref code)) if code == "XYZ"),
            "expected UnknownCurrency, got {lookup:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn sweeper_abandons_readable_carts_next_to_unreadable_ones() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();
        let idle_since = now.checked_sub(SignedDuration::from_hours(4))?;

        let idle = ctx
            .carts
            .create_cart(Cart::new(CartId::new(), iso::GBP, idle_since))
            .await?;

        insert_unreadable_cart(&ctx, idle_since).await?;

        let sweeper = Sweeper::new(Arc::new(ctx.carts.clone()), LifecyclePolicy::default());
        let report = sweeper.run_once(now).await;

        let found = ctx.carts.find_cart(idle.id()).await?.ok_or("cart missing")?;

        assert_eq!(report.abandoned, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(found.status(), CartStatus::Abandoned);

        Ok(())
    }
}
