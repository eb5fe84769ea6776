//! REST service for users, quotes and per-user favorite quotes, persisted in a
//! single SQLite file.

use store::Store;

pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod init;
pub mod models;
pub mod store;
pub mod telemetry;

/// Shared router state.
#[derive(Clone, Debug)]
pub struct Data {
    pub store: Store,
}

impl Data {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}
