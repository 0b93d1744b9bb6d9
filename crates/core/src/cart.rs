//! Carts

use std::collections::HashSet;

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};

use crate::{
    ids::Id,
    pricing::total_price,
    products::{Product, ProductId},
};

mod errors;
mod line_item;
mod status;

pub use errors::CartError;
pub use line_item::LineItem;
pub use status::{CartStatus, ParseCartStatusError};

/// Cart identifier
pub type CartId = Id<Cart>;

/// Shopping cart aggregate.
///
/// Holds at most one line per product, in insertion order, and keeps
/// `total_price` equal to the sum of the line totals. Every successful mutation
/// refreshes `last_interaction_at`; a failed one changes nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    id: CartId,
    status: CartStatus,
    currency: &'static Currency,
    line_items: Vec<LineItem>,
    total_price: Money<'static, Currency>,
    created_at: Timestamp,
    last_interaction_at: Timestamp,
    version: u64,
}

/// Stored quantity of one product, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemParts {
    /// Product, with its current catalog price
    pub product: Product,

    /// Quantity as stored
    pub quantity: i64,
}

/// Raw stored state of a cart. Stores rebuild carts from this with
/// [`Cart::from_parts`], which re-validates and re-prices every line.
#[derive(Debug, Clone, PartialEq)]
pub struct CartParts {
    /// Cart identifier
    pub id: CartId,

    /// Lifecycle status
    pub status: CartStatus,

    /// Currency every line is priced in
    pub currency: &'static Currency,

    /// Lines in insertion order
    pub line_items: Vec<LineItemParts>,

    /// Creation time
    pub created_at: Timestamp,

    /// Last successful mutation
    pub last_interaction_at: Timestamp,

    /// Store version, bumped on every write
    pub version: u64,
}

impl Cart {
    /// Create an empty, active cart. Its version is `0` until a store saves it.
    pub fn new(id: CartId, currency: &'static Currency, now: Timestamp) -> Self {
        Self {
            id,
            status: CartStatus::Active,
            currency,
            line_items: Vec::new(),
            total_price: Money::from_minor(0, currency),
            created_at: now,
            last_interaction_at: now,
            version: 0,
        }
    }

    /// Rebuild a cart from stored parts.
    ///
    /// # Errors
    ///
    /// - [`CartError::DuplicateProduct`]: Two lines share a product.
    /// - [`CartError::InvalidQuantity`]: A stored quantity is not positive.
    /// - [`CartError::Pricing`]: A line or the total could not be priced.
    pub fn from_parts(parts: CartParts) -> Result<Self, CartError> {
        let CartParts {
            id,
            status,
            currency,
            line_items,
            created_at,
            last_interaction_at,
            version,
        } = parts;

        let mut seen = HashSet::with_capacity(line_items.len());
        let mut priced = Vec::with_capacity(line_items.len());

        for LineItemParts { product, quantity } in line_items {
            if !seen.insert(product.id) {
                return Err(CartError::DuplicateProduct(product.id));
            }

            let quantity = positive_quantity(product.id, quantity)?;

            priced.push(LineItem::priced(product, quantity, currency)?);
        }

        let total_price = total_price(&priced, currency)?;

        Ok(Self {
            id,
            status,
            currency,
            line_items: priced,
            total_price,
            created_at,
            last_interaction_at,
            version,
        })
    }

    /// Break the cart into parts for storage.
    pub fn into_parts(self) -> CartParts {
        CartParts {
            id: self.id,
            status: self.status,
            currency: self.currency,
            line_items: self
                .line_items
                .into_iter()
                .map(|item| LineItemParts {
                    quantity: i64::from(item.quantity()),
                    product: item.product().clone(),
                })
                .collect(),
            created_at: self.created_at,
            last_interaction_at: self.last_interaction_at,
            version: self.version,
        }
    }

    /// Append a new line for `product`.
    ///
    /// # Errors
    ///
    /// - [`CartError::DuplicateProduct`]: The product already has a line.
    /// - [`CartError::InvalidQuantity`]: `quantity` is not positive.
    /// - [`CartError::Pricing`]: The line or the new total could not be priced.
    pub fn add_product(
        &mut self,
        product: Product,
        quantity: i64,
        now: Timestamp,
    ) -> Result<(), CartError> {
        if self.line_item(product.id).is_some() {
            return Err(CartError::DuplicateProduct(product.id));
        }

        let quantity = positive_quantity(product.id, quantity)?;

        let mut line_items = self.line_items.clone();

        line_items.push(LineItem::priced(product, quantity, self.currency)?);

        self.commit(line_items, now)
    }

    /// Remove the line for `product_id`, returning it.
    ///
    /// # Errors
    ///
    /// - [`CartError::ProductNotFound`]: The product has no line.
    pub fn remove_product(
        &mut self,
        product_id: ProductId,
        now: Timestamp,
    ) -> Result<LineItem, CartError> {
        let index = self
            .line_items
            .iter()
            .position(|item| item.product_id() == product_id)
            .ok_or(CartError::ProductNotFound(product_id))?;

        let mut line_items = self.line_items.clone();
        let removed = line_items.remove(index);

        self.commit(line_items, now)?;

        Ok(removed)
    }

    /// Adjust the quantity of an existing line by `delta`, returning the new quantity.
    ///
    /// # Errors
    ///
    /// - [`CartError::ProductNotFound`]: The product has no line.
    /// - [`CartError::InvalidQuantity`]: The resulting quantity would not be positive.
    /// - [`CartError::Pricing`]: The line or the new total could not be priced.
    pub fn update_product_quantity(
        &mut self,
        product_id: ProductId,
        delta: i64,
        now: Timestamp,
    ) -> Result<u32, CartError> {
        let mut line_items = self.line_items.clone();

        let line = line_items
            .iter_mut()
            .find(|item| item.product_id() == product_id)
            .ok_or(CartError::ProductNotFound(product_id))?;

        let quantity =
            positive_quantity(product_id, i64::from(line.quantity()).saturating_add(delta))?;

        *line = LineItem::priced(line.product().clone(), quantity, self.currency)?;

        self.commit(line_items, now)?;

        Ok(quantity)
    }

    /// Move an active cart to [`CartStatus::Abandoned`]. Returns `false` if it
    /// already was. The interaction time is left alone so retention counts from
    /// the last real use.
    pub fn mark_abandoned(&mut self) -> bool {
        if self.status == CartStatus::Abandoned {
            return false;
        }

        self.status = CartStatus::Abandoned;

        true
    }

    /// Consume an abandoned cart, yielding the id to delete.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotAbandoned`]: The cart is still active.
    pub fn purge(self) -> Result<CartId, CartError> {
        match self.status {
            CartStatus::Abandoned => Ok(self.id),
            CartStatus::Active => Err(CartError::NotAbandoned(self.id)),
        }
    }

    /// Check the aggregate invariants hold.
    ///
    /// # Errors
    ///
    /// - [`CartError::DuplicateProduct`]: Two lines share a product.
    /// - [`CartError::InvalidQuantity`]: A line has a zero quantity.
    /// - [`CartError::TotalMismatch`]: The total no longer matches the lines.
    pub fn validate(&self) -> Result<(), CartError> {
        let mut seen = HashSet::with_capacity(self.line_items.len());

        for item in &self.line_items {
            if !seen.insert(item.product_id()) {
                return Err(CartError::DuplicateProduct(item.product_id()));
            }

            positive_quantity(item.product_id(), i64::from(item.quantity()))?;
        }

        let expected = total_price(&self.line_items, self.currency)?;

        if expected != self.total_price {
            return Err(CartError::TotalMismatch(self.id));
        }

        Ok(())
    }

    /// Cart identifier
    pub fn id(&self) -> CartId {
        self.id
    }

    /// Lifecycle status
    pub fn status(&self) -> CartStatus {
        self.status
    }

    /// Currency every line is priced in
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Lines in insertion order
    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    /// Line for `product_id`, if present
    pub fn line_item(&self, product_id: ProductId) -> Option<&LineItem> {
        self.line_items
            .iter()
            .find(|item| item.product_id() == product_id)
    }

    /// Sum of the line totals
    pub fn total_price(&self) -> &Money<'static, Currency> {
        &self.total_price
    }

    /// Creation time
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Last successful mutation
    pub fn last_interaction_at(&self) -> Timestamp {
        self.last_interaction_at
    }

    /// Store version this cart was read at
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Return the cart as saved at `version`. Only stores should call this.
    #[must_use]
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.line_items.len()
    }

    /// Whether the cart has no lines
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    fn commit(&mut self, line_items: Vec<LineItem>, now: Timestamp) -> Result<(), CartError> {
        let total_price = total_price(&line_items, self.currency)?;

        self.line_items = line_items;
        self.total_price = total_price;
        self.last_interaction_at = now;

        Ok(())
    }
}

fn positive_quantity(product: ProductId, quantity: i64) -> Result<u32, CartError> {
    u32::try_from(quantity)
        .ok()
        .filter(|quantity| *quantity > 0)
        .ok_or(CartError::InvalidQuantity { product, quantity })
}
