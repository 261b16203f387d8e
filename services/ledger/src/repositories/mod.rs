//! Repositories for database operations
//!
//! One repository per table. Repositories do no input validation; that
//! happens in [`crate::store::LedgerStore`] before they are called.

use chrono::{DateTime, Utc};

use crate::error::{StoreError, StoreResult};

pub mod account;
pub mod session;
pub mod transaction;
pub mod user;

pub use account::AccountRepository;
pub use session::SessionRepository;
pub use transaction::TransactionRepository;
pub use user::UserRepository;

/// Current time as stored in `created_at` columns
pub(crate) fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}

pub(crate) fn timestamp_to_datetime(secs: i64) -> StoreResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| StoreError::Corrupt(format!("timestamp out of range: {}", secs)))
}
