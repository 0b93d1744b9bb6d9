//! App Context

use std::sync::Arc;

use rusty_money::iso::Currency;
use sqlx::migrate::MigrateError;
use thiserror::Error;
use trolley::lifecycle::LifecyclePolicy;

use crate::{
    database::{self, Db},
    domain::{
        carts::{CartStore, CartsService, MemoryCartStore, PgCartStore, StoredCartsService},
        products::{MemoryProductCatalog, PgProductCatalog, ProductCatalog},
    },
    sweeper::Sweeper,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to run database migrations")]
    Migrate(#[source] MigrateError),
}

/// Where carts and products are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres,
}

impl StoreBackend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgres => "postgres",
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartsService>,
    pub products: Arc<dyn ProductCatalog>,
    pub store: Arc<dyn CartStore>,
    pub backend: StoreBackend,
}

impl AppContext {
    /// Assemble a context from its parts.
    #[must_use]
    pub fn new(
        carts: Arc<dyn CartsService>,
        products: Arc<dyn ProductCatalog>,
        store: Arc<dyn CartStore>,
        backend: StoreBackend,
    ) -> Self {
        Self {
            carts,
            products,
            store,
            backend,
        }
    }

    /// Build a context that keeps everything in process memory.
    #[must_use]
    pub fn in_memory(currency: &'static Currency) -> Self {
        Self::with_stores(
            Arc::new(MemoryCartStore::new()),
            Arc::new(MemoryProductCatalog::new()),
            StoreBackend::Memory,
            currency,
        )
    }

    /// Build application context from a database URL, applying migrations.
    ///
    /// # Errors
    ///
    /// Returns an error when connecting to or migrating the database fails.
    pub async fn from_database_url(
        url: &str,
        currency: &'static Currency,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::migrate(&pool)
            .await
            .map_err(AppInitError::Migrate)?;

        let db = Db::new(pool);

        Ok(Self::with_stores(
            Arc::new(PgCartStore::new(db.clone())),
            Arc::new(PgProductCatalog::new(db)),
            StoreBackend::Postgres,
            currency,
        ))
    }

    /// Sweeper over this context's cart store.
    #[must_use]
    pub fn sweeper(&self, policy: LifecyclePolicy) -> Sweeper {
        Sweeper::new(self.store.clone(), policy)
    }

    fn with_stores(
        store: Arc<dyn CartStore>,
        products: Arc<dyn ProductCatalog>,
        backend: StoreBackend,
        currency: &'static Currency,
    ) -> Self {
        Self::new(
            Arc::new(StoredCartsService::new(
                store.clone(),
                products.clone(),
                currency,
            )),
            products,
            store,
            backend,
        )
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso;
    use testresult::TestResult;
    use trolley::products::ProductId;

    use crate::domain::products::NewProduct;

    use super::*;

    #[tokio::test]
    async fn in_memory_context_shares_one_store() -> TestResult {
        let app = AppContext::in_memory(iso::GBP);

        assert_eq!(app.backend, StoreBackend::Memory);
        assert_eq!(app.backend.as_str(), "memory");

        let product = app
            .products
            .create_product(NewProduct {
                id: ProductId::new(),
                name: "Tea".to_string(),
                unit_price: Decimal::ONE,
            })
            .await?;

        let cart = app.carts.add_product(None, product.id, 1).await?;

        assert_eq!(app.store.find_cart(cart.id()).await?, Some(cart));

        Ok(())
    }
}
