//! Cart Handlers

pub(crate) mod add_item;
pub(crate) mod add_product;
pub(crate) mod remove_product;
pub(crate) mod show;
