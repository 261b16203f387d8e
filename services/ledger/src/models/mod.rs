//! Ledger models

pub mod account;
pub mod amount;
pub mod session;
pub mod transaction;
pub mod user;

// Re-export for convenience
pub use account::{ManagedAccount, NewAccount};
pub use amount::{from_minor_units, to_minor_units};
pub use session::Session;
pub use transaction::{ManagedTransaction, NewTransaction, TransactionKind};
pub use user::{Credentials, User};
