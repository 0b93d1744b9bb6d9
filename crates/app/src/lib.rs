//! Cart application services, persistence and background jobs.

pub mod context;
pub mod database;
pub mod domain;
pub mod sweeper;

#[cfg(test)]
mod test;
