//! Product catalog.

use async_trait::async_trait;
use mockall::automock;
use trolley::products::{Product, ProductId};

use crate::{
    database::Db,
    domain::products::{errors::CatalogError, records::NewProduct, repository::PgProductsRepository},
};

#[derive(Debug, Clone)]
pub struct PgProductCatalog {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductCatalog {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductCatalog for PgProductCatalog {
    async fn find_product(&self, product: ProductId) -> Result<Option<Product>, CatalogError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogError> {
        product.validate()?;

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(created)
    }
}

/// Read access to products for carts, plus the admin operations used by the CLI.
#[automock]
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Look up a product by id, returning `None` if it does not exist.
    async fn find_product(&self, product: ProductId) -> Result<Option<Product>, CatalogError>;

    /// All products, oldest first.
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError>;

    /// Add a product to the catalog.
    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    fn new_product(name: &str, minor: i64) -> NewProduct {
        NewProduct {
            id: ProductId::new(),
            name: name.to_string(),
            unit_price: Decimal::new(minor, 2),
        }
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn create_then_find_product() -> TestResult {
        let ctx = TestContext::new().await;
        let product = new_product("Tea", 1_99);

        let created = ctx.products.create_product(product.clone()).await?;
        let found = ctx.products.find_product(product.id).await?;

        assert_eq!(created, Product::from(product));
        assert_eq!(found, Some(created));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn find_unknown_product_returns_none() -> TestResult {
        let ctx = TestContext::new().await;

        assert_eq!(ctx.products.find_product(ProductId::new()).await?, None);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn duplicate_product_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let product = new_product("Tea", 1_99);

        ctx.products.create_product(product.clone()).await?;

        let result = ctx.products.create_product(product).await;

        assert!(
            matches!(result, Err(CatalogError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn list_products_in_creation_order() -> TestResult {
        let ctx = TestContext::new().await;

        let tea = ctx.products.create_product(new_product("Tea", 1_99)).await?;
        let milk = ctx.products.create_product(new_product("Milk", 85)).await?;

        assert_eq!(ctx.products.list_products().await?, vec![tea, milk]);

        Ok(())
    }
}
