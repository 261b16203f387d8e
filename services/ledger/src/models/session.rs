//! Session model and related functionality

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Session entity
///
/// A row in `sessions` is the only evidence that a user is logged in.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}
