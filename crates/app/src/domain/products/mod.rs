//! Products

pub mod errors;
mod memory;
pub mod records;
mod repository;
pub mod service;

pub use errors::CatalogError;
pub use memory::MemoryProductCatalog;
pub use records::NewProduct;
pub use service::*;
