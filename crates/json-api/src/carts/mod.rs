//! Cart routes

pub(crate) mod errors;
pub(crate) mod handlers;
pub(crate) mod responses;
pub(crate) mod session;

pub(crate) use handlers::*;
