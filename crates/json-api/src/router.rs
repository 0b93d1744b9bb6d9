//! App Router

use salvo::Router;

use crate::{carts, healthcheck};

/// Cart routes behind the session hoop, plus the healthcheck.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(
            Router::with_path("cart")
                .hoop(carts::session::handler)
                .get(carts::show::handler)
                .post(carts::add_product::handler)
                .push(Router::with_path("add_item").post(carts::add_item::handler))
                .push(Router::with_path("{product_id}").delete(carts::remove_product::handler)),
        )
}
