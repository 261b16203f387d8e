//! Account repository for database operations

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use tracing::info;

use super::{now_timestamp, timestamp_to_datetime};
use crate::{
    error::StoreResult,
    models::{ManagedAccount, from_minor_units},
};

/// Account repository
#[derive(Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Create a new account repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an account with its opening balance
    pub async fn create(
        &self,
        user_id: i64,
        name: &str,
        account_type: &str,
        balance_minor: i64,
    ) -> StoreResult<ManagedAccount> {
        info!("Creating account {:?} for user: {}", name, user_id);

        let row = sqlx::query(
            r#"
            INSERT INTO accounts (user_id, name, account_type, balance_minor, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, user_id, name, account_type, balance_minor, created_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(account_type)
        .bind(balance_minor)
        .bind(now_timestamp())
        .fetch_one(&self.pool)
        .await?;

        account_from_row(&row)
    }

    /// Get a user's accounts in creation order
    pub async fn list_for_user(&self, user_id: i64) -> StoreResult<Vec<ManagedAccount>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, name, account_type, balance_minor, created_at
            FROM accounts
            WHERE user_id = ?
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(account_from_row).collect()
    }

    /// Find an account only if it belongs to `user_id`
    pub async fn find_owned(
        &self,
        user_id: i64,
        account_id: i64,
    ) -> StoreResult<Option<ManagedAccount>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, name, account_type, balance_minor, created_at
            FROM accounts
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(account_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(account_from_row).transpose()
    }
}

fn account_from_row(row: &SqliteRow) -> StoreResult<ManagedAccount> {
    Ok(ManagedAccount {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        account_type: row.try_get("account_type")?,
        balance: from_minor_units(row.try_get("balance_minor")?),
        created_at: timestamp_to_datetime(row.try_get("created_at")?)?,
    })
}
