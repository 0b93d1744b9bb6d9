//! Cart session binding.
//!
//! The cart a visitor is working on is remembered in the `cart_id` cookie.
//! The hoop resolves it into the depot so handlers only ever see an explicit
//! [`CartId`].

use salvo::{http::cookie::Cookie, prelude::*};
use tracing::debug;
use trolley::cart::CartId;

use crate::extensions::*;

pub(crate) const CART_COOKIE: &str = "cart_id";

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if let Some(cookie) = req.cookie(CART_COOKIE) {
        match cookie.value().parse::<CartId>() {
            Ok(cart) => depot.insert_cart_id(cart),
            Err(error) => debug!(%error, "ignoring malformed cart cookie"),
        }
    }

    ctrl.call_next(req, depot, res).await;
}

/// Remember `cart` for subsequent requests.
pub(crate) fn bind_cart(res: &mut Response, cart: CartId) {
    let mut cookie = Cookie::new(CART_COOKIE, cart.to_string());

    cookie.set_path("/");
    cookie.set_http_only(true);

    res.add_cookie(cookie);
}
