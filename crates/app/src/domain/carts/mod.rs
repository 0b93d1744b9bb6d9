//! Carts

pub mod errors;
mod memory;
mod postgres;
pub mod service;
pub mod store;

pub use errors::{CartsServiceError, StoreError};
pub use memory::MemoryCartStore;
pub use postgres::PgCartStore;
pub use service::*;
pub use store::*;
