//! Test context for store-level integration tests.

use sqlx::PgPool;

use crate::{
    database::Db,
    domain::{carts::PgCartStore, products::PgProductCatalog},
};

use super::db::TestDb;

pub(crate) struct TestContext {
    db: TestDb,
    pub products: PgProductCatalog,
    pub carts: PgCartStore,
}

impl TestContext {
    /// Fresh, migrated database with a product catalog and cart store over it.
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        Self {
            products: PgProductCatalog::new(db.clone()),
            carts: PgCartStore::new(db),
            db: test_db,
        }
    }

    /// Pool of the test database, for rows the stores would refuse to write.
    pub fn pool(&self) -> &PgPool {
        self.db.pool()
    }
}
