//! Ledger store: users, sessions, accounts and transactions
//!
//! [`LedgerStore`] is the surface the HTTP layer and CLI talk to. Every
//! operation validates its input first and reports rejected input as
//! `Ok(false)` or `Ok(None)`; `Err` means the database itself failed.

use common::database::{DatabaseConfig, init_pool, run_migrations};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::{
    config::LedgerConfig,
    error::StoreResult,
    models::{ManagedAccount, ManagedTransaction, User},
    password::{hash_password, verify_password},
    repositories::{
        AccountRepository, SessionRepository, TransactionRepository, UserRepository, now_timestamp,
    },
    validation::{
        require_text, validate_kind, validate_opening_balance, validate_registration,
        validate_transaction_amount,
    },
};

#[derive(Clone)]
pub struct LedgerStore {
    pool: SqlitePool,
    config: LedgerConfig,
    users: UserRepository,
    sessions: SessionRepository,
    accounts: AccountRepository,
    transactions: TransactionRepository,
}

impl LedgerStore {
    /// Wrap an existing pool; the schema must already be migrated
    pub fn new(pool: SqlitePool, config: LedgerConfig) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            sessions: SessionRepository::new(pool.clone()),
            accounts: AccountRepository::new(pool.clone()),
            transactions: TransactionRepository::new(pool.clone()),
            pool,
            config,
        }
    }

    /// Open the database, apply the schema and build the store
    pub async fn connect(database: &DatabaseConfig, config: LedgerConfig) -> StoreResult<Self> {
        let pool = init_pool(database).await?;
        run_migrations(&pool).await?;
        Ok(Self::new(pool, config))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Register a new user
    ///
    /// Fails on an empty username or password, or when the username is taken.
    pub async fn register(&self, username: &str, password: &str) -> StoreResult<bool> {
        if let Err(reason) = validate_registration(username, password) {
            warn!("Registration rejected: {}", reason);
            return Ok(false);
        }

        let password_hash = hash_password(password);
        match self.users.create(username, &password_hash).await? {
            Some(user) => {
                info!("Registered user {} ({})", user.username, user.id);
                Ok(true)
            }
            None => {
                warn!("Registration rejected: username {:?} already exists", username);
                Ok(false)
            }
        }
    }

    /// Check a username/password pair and open a session
    ///
    /// Returns the new session token, or `None` for an unknown user or a
    /// wrong password.
    pub async fn authenticate(&self, username: &str, password: &str) -> StoreResult<Option<String>> {
        let Some(credentials) = self.users.find_credentials(username).await? else {
            warn!("Login failed for unknown user {:?}", username);
            return Ok(None);
        };

        if !verify_password(password, &credentials.password_hash) {
            warn!("Login failed for user {:?}", username);
            return Ok(None);
        }

        let session = self.sessions.create(credentials.user_id).await?;
        info!("User {} logged in", credentials.username);
        Ok(Some(session.token))
    }

    /// Resolve a session token to its user
    pub async fn user_for_token(&self, token: &str) -> StoreResult<Option<User>> {
        if token.is_empty() {
            return Ok(None);
        }

        self.sessions.find_user(token, self.session_cutoff()).await
    }

    /// Close a session; unknown tokens are ignored
    pub async fn logout(&self, token: &str) -> StoreResult<()> {
        if self.sessions.delete(token).await? {
            info!("Session closed");
        }
        Ok(())
    }

    /// Delete sessions older than the configured TTL
    ///
    /// Returns the number of sessions removed; always zero when sessions
    /// never expire.
    pub async fn purge_expired_sessions(&self) -> StoreResult<u64> {
        let Some(cutoff) = self.session_cutoff() else {
            return Ok(0);
        };

        let purged = self.sessions.delete_created_before(cutoff).await?;
        if purged > 0 {
            info!("Purged {} expired sessions", purged);
        }
        Ok(purged)
    }

    /// Number of open sessions for a user
    pub async fn open_sessions(&self, user_id: i64) -> StoreResult<i64> {
        self.sessions.count_for_user(user_id).await
    }

    /// Find a user by ID
    pub async fn find_user(&self, user_id: i64) -> StoreResult<Option<User>> {
        self.users.find_by_id(user_id).await
    }

    /// Create an account with an opening balance of any sign
    ///
    /// Name and type are trimmed and must not be blank.
    pub async fn create_account(
        &self,
        user_id: i64,
        name: &str,
        account_type: &str,
        opening_balance: Decimal,
    ) -> StoreResult<bool> {
        let validated = require_text("Account name", name).and_then(|name| {
            let account_type = require_text("Account type", account_type)?;
            let balance_minor = validate_opening_balance(opening_balance)?;
            Ok((name, account_type, balance_minor))
        });

        let (name, account_type, balance_minor) = match validated {
            Ok(fields) => fields,
            Err(reason) => {
                warn!("Account creation rejected for user {}: {}", user_id, reason);
                return Ok(false);
            }
        };

        self.accounts
            .create(user_id, name, account_type, balance_minor)
            .await?;
        Ok(true)
    }

    /// A user's accounts in creation order
    pub async fn list_accounts(&self, user_id: i64) -> StoreResult<Vec<ManagedAccount>> {
        self.accounts.list_for_user(user_id).await
    }

    /// One account, only if it belongs to the user
    pub async fn get_account(
        &self,
        user_id: i64,
        account_id: i64,
    ) -> StoreResult<Option<ManagedAccount>> {
        self.accounts.find_owned(user_id, account_id).await
    }

    /// Record an income or expense against one of the user's accounts
    ///
    /// Fails for any kind other than exactly `income` or `expense`, a
    /// non-positive amount, a blank description, an account the user does not
    /// own, or a balance that would overflow. On success the balance moves by `+amount` or `-amount` in the
    /// same database transaction as the insert.
    pub async fn create_transaction(
        &self,
        user_id: i64,
        account_id: i64,
        kind: &str,
        amount: Decimal,
        description: &str,
    ) -> StoreResult<bool> {
        let validated = validate_kind(kind).and_then(|kind| {
            let amount_minor = validate_transaction_amount(amount)?;
            let description = require_text("Description", description)?;
            Ok((kind, amount_minor, description))
        });

        let (kind, amount_minor, description) = match validated {
            Ok(fields) => fields,
            Err(reason) => {
                warn!("Transaction rejected for user {}: {}", user_id, reason);
                return Ok(false);
            }
        };

        let recorded = self
            .transactions
            .record(user_id, account_id, kind, amount_minor, description)
            .await?;

        if recorded.is_none() {
            warn!(
                "Transaction rejected for user {}: account {} not found, not owned or out of range",
                user_id, account_id
            );
        }
        Ok(recorded.is_some())
    }

    /// A user's transactions, newest first
    pub async fn list_transactions(&self, user_id: i64) -> StoreResult<Vec<ManagedTransaction>> {
        self.transactions.list_for_user(user_id).await
    }

    fn session_cutoff(&self) -> Option<i64> {
        self.config.session_ttl.map(|ttl| {
            let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
            now_timestamp().saturating_sub(ttl_secs)
        })
    }
}
