//! Show Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, responses::CartResponse},
    extensions::*,
    state::State,
};

/// Show Cart Handler
///
/// Returns the cart bound to the session cookie.
#[endpoint(
    tags("carts"),
    summary = "Show Cart",
    responses(
        (status_code = StatusCode::OK, description = "Cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let cart = depot.cart_id_or_404()?;

    let cart = state
        .app
        .carts
        .get_cart(cart)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.try_into()?))
}
