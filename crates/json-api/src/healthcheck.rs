//! Liveness Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State};

/// Healthcheck response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Backend holding carts and products: `memory` or `postgres`
    pub store: String,
}

/// Healthcheck handler
///
/// Answers as long as the server is accepting requests, and names the cart
/// store so an operator can tell a volatile in-memory deployment apart.
#[endpoint(tags("health"), summary = "Health check endpoint")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<HealthResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        store: state.app.backend.as_str().to_string(),
    }))
}
