//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::iso;
use salvo::{affix_state::inject, http::header::SET_COOKIE, prelude::*, test::RequestBuilder};
use trolley::{
    cart::{Cart, CartId},
    products::{Product, ProductId},
};
use trolley_app::{
    context::{AppContext, StoreBackend},
    domain::{
        carts::{MockCartStore, MockCartsService},
        products::MockProductCatalog,
    },
};

use crate::{
    carts::session::{self, CART_COOKIE},
    state::State,
};

fn strict_products_mock() -> MockProductCatalog {
    let mut products = MockProductCatalog::new();

    products.expect_find_product().never();
    products.expect_list_products().never();
    products.expect_create_product().never();

    products
}

fn strict_store_mock() -> MockCartStore {
    let mut store = MockCartStore::new();

    store.expect_find_cart().never();
    store.expect_create_cart().never();
    store.expect_persist().never();
    store.expect_delete_cart().never();
    store.expect_query_carts().never();

    store
}

pub(crate) fn state_with_carts(carts: MockCartsService) -> Arc<State> {
    State::from_app_context(AppContext::new(
        Arc::new(carts),
        Arc::new(strict_products_mock()),
        Arc::new(strict_store_mock()),
        StoreBackend::Memory,
    ))
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_carts(carts)))
            .hoop(session::handler)
            .push(route),
    )
}

/// Active cart holding two units of a single product.
pub(crate) fn make_cart() -> Cart {
    let now = Timestamp::UNIX_EPOCH;
    let mut cart = Cart::new(CartId::new(), iso::GBP, now);
    let tea = Product::new(ProductId::new(), "Tea", Decimal::new(199, 2));

    cart.add_product(tea, 2, now)
        .expect("Failed to add product to test cart");

    cart
}

pub(crate) fn with_cart_cookie(request: RequestBuilder, cart: CartId) -> RequestBuilder {
    request.add_header("cookie", format!("{CART_COOKIE}={cart}"), true)
}

/// Value of the cart cookie set on the response, if any.
pub(crate) fn bound_cart(res: &Response) -> Option<String> {
    if let Some(cookie) = res.cookie(CART_COOKIE) {
        return Some(cookie.value().to_string());
    }

    res.headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.strip_prefix(CART_COOKIE)?.strip_prefix('='))
        .find_map(|value| value.split(';').next())
        .map(str::to_string)
}
