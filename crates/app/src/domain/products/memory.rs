//! In-memory product catalog.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use trolley::products::{Product, ProductId};

use crate::domain::products::{
    errors::CatalogError, records::NewProduct, service::ProductCatalog,
};

/// Catalog held in process memory. Products are listed in id order, which for
/// generated (v7) ids is creation order.
#[derive(Debug, Default)]
pub struct MemoryProductCatalog {
    products: RwLock<BTreeMap<ProductId, Product>>,
}

impl MemoryProductCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog pre-filled with `products`.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: RwLock::new(
                products
                    .into_iter()
                    .map(|product| (product.id, product))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl ProductCatalog for MemoryProductCatalog {
    async fn find_product(&self, product: ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self.products.read().await.get(&product).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.read().await.values().cloned().collect())
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogError> {
        product.validate()?;

        let mut products = self.products.write().await;

        if products.contains_key(&product.id) {
            return Err(CatalogError::AlreadyExists);
        }

        let product = Product::from(product);

        products.insert(product.id, product.clone());

        Ok(product)
    }
}
