//! Test support for Postgres-backed tests.

mod context;
mod db;

pub(crate) use context::TestContext;
