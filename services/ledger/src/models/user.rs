//! User model and related functionality

use serde::{Deserialize, Serialize};

/// User entity
///
/// The password hash lives in [`Credentials`] and is never part of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// Stored credential for a user
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: i64,
    pub username: String,
    pub password_hash: String,
}
