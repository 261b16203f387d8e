//! User repository for database operations

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use tracing::info;

use crate::{
    error::StoreResult,
    models::{Credentials, User},
};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user
    ///
    /// Returns `None` when the username is already taken.
    pub async fn create(&self, username: &str, password_hash: &str) -> StoreResult<Option<User>> {
        info!("Creating new user: {}", username);

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES (?, ?)
            RETURNING id, username
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(Some(user_from_row(&row)?)),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Find the stored credentials for a username
    pub async fn find_credentials(&self, username: &str) -> StoreResult<Option<Credentials>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Credentials {
                user_id: row.try_get("id")?,
                username: row.try_get("username")?,
                password_hash: row.try_get("password_hash")?,
            })),
            None => Ok(None),
        }
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }
}

pub(crate) fn user_from_row(row: &SqliteRow) -> StoreResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
    })
}
