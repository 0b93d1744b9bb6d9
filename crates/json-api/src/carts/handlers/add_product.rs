//! Add Product Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trolley::products::ProductId;

use crate::{
    carts::{errors::into_status_error, responses::CartResponse, session},
    extensions::*,
    state::State,
};

/// Add Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddProductRequest {
    /// Product to add
    pub product_id: Uuid,

    /// Units to add, from 1 to 4294967295
    pub quantity: i64,
}

/// Add Product Handler
///
/// Adds a product to the session's cart, starting a new cart when the
/// session has none.
#[endpoint(
    tags("carts"),
    summary = "Add Product to Cart",
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Duplicate product or invalid quantity"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let cart = state
        .app
        .carts
        .add_product(
            depot.cart_id(),
            ProductId::from_uuid(request.product_id),
            request.quantity,
        )
        .await
        .map_err(into_status_error)?;

    session::bind_cart(res, cart.id());

    Ok(Json(cart.try_into()?))
}
