//! Session repository for database operations

use sqlx::{Row, SqlitePool};
use tracing::info;

use super::{now_timestamp, timestamp_to_datetime, user::user_from_row};
use crate::{
    error::StoreResult,
    models::{Session, User},
    password::generate_session_token,
};

/// Session repository
#[derive(Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Create a new session repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a new session for a user with a fresh random token
    ///
    /// Existing sessions for the same user stay valid.
    pub async fn create(&self, user_id: i64) -> StoreResult<Session> {
        info!("Creating session for user: {}", user_id);

        let token = generate_session_token();
        let created_at = now_timestamp();

        sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES (?, ?, ?)")
            .bind(&token)
            .bind(user_id)
            .bind(created_at)
            .execute(&self.pool)
            .await?;

        Ok(Session {
            token,
            user_id,
            created_at: timestamp_to_datetime(created_at)?,
        })
    }

    /// Resolve a token to its user
    ///
    /// Sessions created before `not_before` (unix seconds) are ignored.
    pub async fn find_user(&self, token: &str, not_before: Option<i64>) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT u.id, u.username
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = ? AND s.created_at >= ?
            "#,
        )
        .bind(token)
        .bind(not_before.unwrap_or(i64::MIN))
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Count the open sessions of a user
    pub async fn count_for_user(&self, user_id: i64) -> StoreResult<i64> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS open_sessions FROM sessions WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?
            .try_get("open_sessions")?;

        Ok(count)
    }

    /// Delete a session by token
    pub async fn delete(&self, token: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every session created before `cutoff` (unix seconds)
    pub async fn delete_created_before(&self, cutoff: i64) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE created_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
