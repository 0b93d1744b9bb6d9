//! Remove Product Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use trolley::products::ProductId;

use crate::{
    carts::{errors::into_status_error, responses::CartResponse},
    extensions::*,
    state::State,
};

/// Remove Product Handler
///
/// Removes a product's line from the session's cart.
#[endpoint(
    tags("carts"),
    summary = "Remove Product from Cart",
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product_id: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let cart = depot.cart_id_or_404()?;

    let cart = state
        .app
        .carts
        .remove_product(cart, ProductId::from_uuid(product_id.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.try_into()?))
}
