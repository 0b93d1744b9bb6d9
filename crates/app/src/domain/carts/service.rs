//! Carts service.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rusty_money::iso::Currency;
use tracing::{debug, info};
use trolley::{
    cart::{Cart, CartError, CartId},
    products::{Product, ProductId},
};

use crate::domain::{
    carts::{errors::CartsServiceError, errors::StoreError, store::CartStore},
    products::ProductCatalog,
};

/// Times a mutation is re-read and re-applied after losing a write race.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Cart use cases on top of a [`CartStore`] and a [`ProductCatalog`].
///
/// Each mutation reads the cart, applies the change to the aggregate and writes
/// it back at the version it was read at, retrying on conflict.
#[derive(Clone)]
pub struct StoredCartsService {
    store: Arc<dyn CartStore>,
    products: Arc<dyn ProductCatalog>,
    currency: &'static Currency,
    max_attempts: usize,
}

impl StoredCartsService {
    #[must_use]
    pub fn new(
        store: Arc<dyn CartStore>,
        products: Arc<dyn ProductCatalog>,
        currency: &'static Currency,
    ) -> Self {
        Self {
            store,
            products,
            currency,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Override how many times a conflicting write is retried.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    async fn find_product(&self, product: ProductId) -> Result<Product, CartsServiceError> {
        self.products
            .find_product(product)
            .await?
            .ok_or(CartsServiceError::ProductNotFound(product))
    }

    /// Load `cart`, apply `operation`, and write it back, retrying on conflict.
    async fn mutate<F>(&self, cart: CartId, operation: F) -> Result<Cart, CartsServiceError>
    where
        F: Fn(&mut Cart, Timestamp) -> Result<(), CartError> + Send + Sync,
    {
        for attempt in 1..=self.max_attempts {
            let mut loaded = self
                .store
                .find_cart(cart)
                .await?
                .ok_or(CartsServiceError::CartNotFound(cart))?;

            operation(&mut loaded, Timestamp::now())?;

            match self.store.persist(loaded).await {
                Ok(saved) => return Ok(saved),
                Err(StoreError::Conflict(_)) => {
                    debug!(%cart, attempt, "cart changed while updating; retrying");
                }
                Err(error) => return Err(error.into()),
            }
        }

        Err(CartsServiceError::Conflict(cart))
    }

    async fn start_cart(&self, product: Product, quantity: i64) -> Result<Cart, CartsServiceError> {
        let now = Timestamp::now();
        let mut cart = Cart::new(CartId::new(), self.currency, now);

        cart.add_product(product, quantity, now)?;

        let created = self.store.create_cart(cart).await?;

        info!(cart = %created.id(), "cart created");

        Ok(created)
    }
}

impl Debug for StoredCartsService {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StoredCartsService")
            .field("currency", &self.currency.iso_alpha_code)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CartsService for StoredCartsService {
    async fn get_cart(&self, cart: CartId) -> Result<Cart, CartsServiceError> {
        self.store
            .find_cart(cart)
            .await?
            .ok_or(CartsServiceError::CartNotFound(cart))
    }

    async fn add_product(
        &self,
        cart: Option<CartId>,
        product: ProductId,
        quantity: i64,
    ) -> Result<Cart, CartsServiceError> {
        let product = self.find_product(product).await?;

        if let Some(cart) = cart {
            let result = self
                .mutate(cart, |loaded, now| {
                    loaded.add_product(product.clone(), quantity, now)
                })
                .await;

            match result {
                Err(CartsServiceError::CartNotFound(_)) => {
                    debug!(%cart, "bound cart no longer exists; starting a new one");
                }
                other => return other,
            }
        }

        self.start_cart(product, quantity).await
    }

    async fn remove_product(
        &self,
        cart: CartId,
        product: ProductId,
    ) -> Result<Cart, CartsServiceError> {
        self.mutate(cart, |loaded, now| {
            loaded.remove_product(product, now).map(|_removed| ())
        })
        .await
    }

    async fn update_product_quantity(
        &self,
        cart: CartId,
        product: ProductId,
        delta: i64,
    ) -> Result<Cart, CartsServiceError> {
        self.mutate(cart, |loaded, now| {
            loaded
                .update_product_quantity(product, delta, now)
                .map(|_quantity| ())
        })
        .await
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve a single cart.
    async fn get_cart(&self, cart: CartId) -> Result<Cart, CartsServiceError>;

    /// Add a product to `cart`. Without a cart, or when the cart no longer
    /// exists, a new cart is created holding just this product.
    async fn add_product(
        &self,
        cart: Option<CartId>,
        product: ProductId,
        quantity: i64,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove a product's line from the cart.
    async fn remove_product(
        &self,
        cart: CartId,
        product: ProductId,
    ) -> Result<Cart, CartsServiceError>;

    /// Change a product's quantity by `delta`.
    async fn update_product_quantity(
        &self,
        cart: CartId,
        product: ProductId,
        delta: i64,
    ) -> Result<Cart, CartsServiceError>;
}
