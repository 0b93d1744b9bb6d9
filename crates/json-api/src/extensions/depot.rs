//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};
use trolley::cart::CartId;

const CART_ID_KEY: &str = "trolley.cart_id";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Bind the request to a cart.
    fn insert_cart_id(&mut self, cart: CartId);

    /// Cart bound to the request, if any.
    fn cart_id(&self) -> Option<CartId>;

    /// Cart bound to the request, or 404 when there is none.
    fn cart_id_or_404(&self) -> Result<CartId, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_cart_id(&mut self, cart: CartId) {
        self.insert(CART_ID_KEY, cart);
    }

    fn cart_id(&self) -> Option<CartId> {
        self.get::<CartId>(CART_ID_KEY).ok().copied()
    }

    fn cart_id_or_404(&self) -> Result<CartId, StatusError> {
        self.cart_id()
            .ok_or_else(|| StatusError::not_found().brief("Cart not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_id_is_absent_until_inserted() {
        let mut depot = Depot::new();

        assert_eq!(depot.cart_id(), None);
        assert!(depot.cart_id_or_404().is_err(), "no cart bound");

        let cart = CartId::new();
        depot.insert_cart_id(cart);

        assert_eq!(depot.cart_id(), Some(cart));
    }
}
