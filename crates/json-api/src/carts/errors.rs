//! Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use trolley_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::CartNotFound(_) => StatusError::not_found().brief("Cart not found"),
        CartsServiceError::ProductNotFound(_) => {
            StatusError::not_found().brief("Product not found")
        }
        CartsServiceError::DuplicateProduct(_) => {
            StatusError::unprocessable_entity().brief("Product already in cart")
        }
        CartsServiceError::InvalidQuantity { .. } => {
            StatusError::unprocessable_entity().brief("Quantity must be between 1 and 4294967295")
        }
        CartsServiceError::Conflict(cart) => {
            warn!(%cart, "gave up updating contended cart");

            StatusError::conflict().brief("Cart is being updated, please retry")
        }
        error @ (CartsServiceError::Pricing(_)
        | CartsServiceError::Store(_)
        | CartsServiceError::Catalog(_)) => {
            error!("cart request failed: {error}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use trolley::{cart::CartId, products::ProductId};
    use trolley_app::domain::carts::StoreError;

    use super::*;

    #[test]
    fn missing_cart_and_product_are_not_found() {
        let cart = into_status_error(CartsServiceError::CartNotFound(CartId::new()));
        let product = into_status_error(CartsServiceError::ProductNotFound(ProductId::new()));

        assert_eq!(cart.code, StatusCode::NOT_FOUND);
        assert_eq!(cart.brief, "Cart not found");
        assert_eq!(product.code, StatusCode::NOT_FOUND);
        assert_eq!(product.brief, "Product not found");
    }

    #[test]
    fn rejected_mutations_are_unprocessable() {
        let duplicate = into_status_error(CartsServiceError::DuplicateProduct(ProductId::new()));
        let quantity = into_status_error(CartsServiceError::InvalidQuantity {
            product: ProductId::new(),
            quantity: 0,
        });

        assert_eq!(duplicate.code, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(quantity.code, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(quantity.brief, "Quantity must be between 1 and 4294967295");
    }

    #[test]
    fn contention_and_storage_failures() {
        let conflict = into_status_error(CartsServiceError::Conflict(CartId::new()));
        let store = into_status_error(CartsServiceError::Store(StoreError::UnknownCurrency(
            "XYZ".to_string(),
        )));

        assert_eq!(conflict.code, StatusCode::CONFLICT);
        assert_eq!(store.code, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
