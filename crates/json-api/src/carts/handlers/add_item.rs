//! Change Quantity Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trolley::products::ProductId;

use crate::{
    carts::{errors::into_status_error, responses::CartResponse},
    extensions::*,
    state::State,
};

/// Change Quantity Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ChangeQuantityRequest {
    /// Product already in the cart
    pub product_id: Uuid,

    /// Signed change applied to the current quantity
    pub quantity: i64,
}

/// Change Quantity Handler
///
/// Adjusts the quantity of a product already in the session's cart by a
/// signed amount.
#[endpoint(
    tags("carts"),
    summary = "Change Product Quantity",
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or product not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Resulting quantity is outside 1 to 4294967295"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ChangeQuantityRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let cart = depot.cart_id_or_404()?;
    let request = json.into_inner();

    let cart = state
        .app
        .carts
        .update_product_quantity(
            cart,
            ProductId::from_uuid(request.product_id),
            request.quantity,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.try_into()?))
}
