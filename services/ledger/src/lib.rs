//! Household ledger service
//!
//! Username/password accounts with opaque session tokens, per-user money
//! accounts whose balances follow their income and expense history, and a
//! JSON HTTP surface that also renders allocation reports through the
//! `planner` crate.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod password;
pub mod rate_limiter;
pub mod repositories;
pub mod routes;
pub mod store;
pub mod validation;

use crate::{
    config::AppConfig,
    error::StoreResult,
    rate_limiter::{RateLimiter, RateLimiterConfig},
    store::LedgerStore,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: LedgerStore,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(store: LedgerStore) -> Self {
        Self {
            store,
            rate_limiter: RateLimiter::new(RateLimiterConfig::default()),
        }
    }

    /// Connect to the configured database and build the state
    pub async fn from_config(config: &AppConfig) -> StoreResult<Self> {
        let store = LedgerStore::connect(&config.database, config.ledger.clone()).await?;
        Ok(Self::new(store))
    }
}
