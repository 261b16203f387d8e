//! Transaction repository for database operations

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use tracing::{info, warn};

use super::{now_timestamp, timestamp_to_datetime};
use crate::{
    error::{StoreError, StoreResult},
    models::{ManagedTransaction, TransactionKind, from_minor_units},
};

/// Transaction repository
#[derive(Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a transaction and apply it to the account balance
    ///
    /// The ownership check, the insert and the balance update share one
    /// database transaction: either all of them land or none do. Returns
    /// `None` when the account does not exist, belongs to someone else, or
    /// its balance would leave the `i64` range.
    pub async fn record(
        &self,
        user_id: i64,
        account_id: i64,
        kind: TransactionKind,
        amount_minor: i64,
        description: &str,
    ) -> StoreResult<Option<ManagedTransaction>> {
        let mut tx = self.pool.begin().await?;

        let balance_minor: Option<i64> = sqlx::query_scalar(
            "SELECT balance_minor FROM accounts WHERE id = ? AND user_id = ?",
        )
        .bind(account_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(balance_minor) = balance_minor else {
            tx.rollback().await?;
            return Ok(None);
        };

        // SQLite turns an overflowing integer sum into REAL
        let Some(new_balance) = balance_minor.checked_add(kind.signed(amount_minor)) else {
            tx.rollback().await?;
            warn!("Balance of account {} would overflow", account_id);
            return Ok(None);
        };

        let row = sqlx::query(
            r#"
            INSERT INTO transactions (user_id, account_id, kind, amount_minor, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, account_id, kind, amount_minor, description, created_at
            "#,
        )
        .bind(user_id)
        .bind(account_id)
        .bind(kind.as_str())
        .bind(amount_minor)
        .bind(description)
        .bind(now_timestamp())
        .fetch_one(&mut *tx)
        .await?;
        let transaction = transaction_from_row(&row)?;

        sqlx::query("UPDATE accounts SET balance_minor = ? WHERE id = ?")
            .bind(new_balance)
            .bind(account_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            "Recorded {} of {} on account {} for user {}",
            kind, transaction.amount, account_id, user_id
        );
        Ok(Some(transaction))
    }

    /// Get a user's transactions, newest first
    pub async fn list_for_user(&self, user_id: i64) -> StoreResult<Vec<ManagedTransaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, account_id, kind, amount_minor, description, created_at
            FROM transactions
            WHERE user_id = ?
            ORDER BY id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(transaction_from_row).collect()
    }
}

fn transaction_from_row(row: &SqliteRow) -> StoreResult<ManagedTransaction> {
    let kind: String = row.try_get("kind")?;

    Ok(ManagedTransaction {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        account_id: row.try_get("account_id")?,
        kind: kind.parse::<TransactionKind>().map_err(StoreError::Corrupt)?,
        amount: from_minor_units(row.try_get("amount_minor")?),
        description: row.try_get("description")?,
        created_at: timestamp_to_datetime(row.try_get("created_at")?)?,
    })
}
