//! Integration tests for the ledger store on an in-memory database

use common::database::DatabaseConfig;
use ledger::{config::LedgerConfig, models::TransactionKind, store::LedgerStore};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

async fn store() -> LedgerStore {
    store_with(LedgerConfig::default()).await
}

async fn store_with(config: LedgerConfig) -> LedgerStore {
    LedgerStore::connect(&DatabaseConfig::in_memory(), config)
        .await
        .expect("Failed to open ledger store")
}

/// Register `username` and return its id
async fn user_id(store: &LedgerStore, username: &str) -> i64 {
    assert!(store.register(username, "pw123").await.unwrap());
    let token = store.authenticate(username, "pw123").await.unwrap().unwrap();
    store.user_for_token(&token).await.unwrap().unwrap().id
}

#[tokio::test]
async fn test_register_login_logout_cycle() {
    let store = store().await;

    assert!(store.register("alice", "pw123").await.unwrap());
    assert!(!store.register("alice", "pw123").await.unwrap());

    let token = store.authenticate("alice", "pw123").await.unwrap().unwrap();
    let user = store.user_for_token(&token).await.unwrap().unwrap();
    assert_eq!(user.username, "alice");

    store.logout(&token).await.unwrap();
    assert!(store.user_for_token(&token).await.unwrap().is_none());

    store.logout(&token).await.unwrap();
}

#[tokio::test]
async fn test_register_rejects_empty_fields() {
    let store = store().await;

    assert!(!store.register("", "pw123").await.unwrap());
    assert!(!store.register("carol", "").await.unwrap());
    assert!(store.register("carol", "pw123").await.unwrap());
}

#[tokio::test]
async fn test_auth_rejects_bad_credentials() {
    let store = store().await;
    assert!(store.register("bob", "good").await.unwrap());

    assert!(store.authenticate("bob", "bad").await.unwrap().is_none());
    assert!(store.authenticate("missing", "good").await.unwrap().is_none());
    assert!(store.user_for_token("").await.unwrap().is_none());
    assert!(store.user_for_token("not-a-token").await.unwrap().is_none());
}

#[tokio::test]
async fn test_password_is_not_stored_in_plaintext() {
    let store = store().await;
    assert!(store.register("dana", "hunter2").await.unwrap());

    let stored: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE username = 'dana'")
        .fetch_one(store.pool())
        .await
        .unwrap();

    assert!(!stored.contains("hunter2"));
    assert!(ledger::password::verify_password("hunter2", &stored));
}

#[tokio::test]
async fn test_malformed_stored_hash_fails_authentication() {
    let store = store().await;
    assert!(store.register("erin", "pw").await.unwrap());

    sqlx::query("UPDATE users SET password_hash = 'garbage' WHERE username = 'erin'")
        .execute(store.pool())
        .await
        .unwrap();

    assert!(store.authenticate("erin", "pw").await.unwrap().is_none());
}

#[tokio::test]
async fn test_multiple_sessions_per_user() {
    let store = store().await;
    assert!(store.register("frank", "pw").await.unwrap());

    let first = store.authenticate("frank", "pw").await.unwrap().unwrap();
    let second = store.authenticate("frank", "pw").await.unwrap().unwrap();
    assert_ne!(first, second);

    let user = store.user_for_token(&first).await.unwrap().unwrap();
    assert_eq!(store.open_sessions(user.id).await.unwrap(), 2);

    store.logout(&first).await.unwrap();
    assert!(store.user_for_token(&first).await.unwrap().is_none());
    assert!(store.user_for_token(&second).await.unwrap().is_some());
}

#[tokio::test]
async fn test_sessions_without_ttl_never_expire() {
    let store = store().await;
    assert!(store.register("gina", "pw").await.unwrap());
    let token = store.authenticate("gina", "pw").await.unwrap().unwrap();

    sqlx::query("UPDATE sessions SET created_at = 0")
        .execute(store.pool())
        .await
        .unwrap();

    assert!(store.user_for_token(&token).await.unwrap().is_some());
    assert_eq!(store.purge_expired_sessions().await.unwrap(), 0);
}

#[tokio::test]
async fn test_sessions_older_than_ttl_are_ignored_and_purged() {
    let store = store_with(LedgerConfig {
        session_ttl: Some(Duration::from_secs(3600)),
    })
    .await;
    assert!(store.register("hank", "pw").await.unwrap());
    let stale = store.authenticate("hank", "pw").await.unwrap().unwrap();
    let fresh = store.authenticate("hank", "pw").await.unwrap().unwrap();

    sqlx::query("UPDATE sessions SET created_at = 0 WHERE token = ?")
        .bind(&stale)
        .execute(store.pool())
        .await
        .unwrap();

    assert!(store.user_for_token(&stale).await.unwrap().is_none());
    assert!(store.user_for_token(&fresh).await.unwrap().is_some());

    assert_eq!(store.purge_expired_sessions().await.unwrap(), 1);
    assert!(store.user_for_token(&fresh).await.unwrap().is_some());
}

#[tokio::test]
async fn test_create_and_list_accounts() {
    let store = store().await;
    let alice = user_id(&store, "alice").await;
    let bob = user_id(&store, "bob").await;

    assert!(store.create_account(alice, "  Checking ", " checking ", dec!(1000)).await.unwrap());
    assert!(store.create_account(alice, "Credit card", "credit", dec!(-250.75)).await.unwrap());
    assert!(store.create_account(bob, "Savings", "savings", Decimal::ZERO).await.unwrap());

    let accounts = store.list_accounts(alice).await.unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].name, "Checking");
    assert_eq!(accounts[0].account_type, "checking");
    assert_eq!(accounts[0].balance, dec!(1000));
    assert_eq!(accounts[1].name, "Credit card");
    assert_eq!(accounts[1].balance, dec!(-250.75));
    assert!(accounts.iter().all(|account| account.user_id == alice));

    let bobs = store.list_accounts(bob).await.unwrap();
    assert_eq!(bobs.len(), 1);
    assert!(store.get_account(alice, bobs[0].id).await.unwrap().is_none());
    assert!(store.get_account(bob, bobs[0].id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_create_account_rejects_blank_fields() {
    let store = store().await;
    let alice = user_id(&store, "alice").await;

    assert!(!store.create_account(alice, "", "checking", dec!(1)).await.unwrap());
    assert!(!store.create_account(alice, "   ", "checking", dec!(1)).await.unwrap());
    assert!(!store.create_account(alice, "Checking", " ", dec!(1)).await.unwrap());
    assert!(store.list_accounts(alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_transactions_move_the_balance() {
    let store = store().await;
    let alice = user_id(&store, "alice").await;
    assert!(store.create_account(alice, "Checking", "checking", dec!(1000)).await.unwrap());
    let account_id = store.list_accounts(alice).await.unwrap()[0].id;

    assert!(store.create_transaction(alice, account_id, "income", dec!(2000), "Salary").await.unwrap());
    assert!(store.create_transaction(alice, account_id, "expense", dec!(150), "Groceries").await.unwrap());

    let account = store.get_account(alice, account_id).await.unwrap().unwrap();
    assert_eq!(account.balance, dec!(2850));

    let transactions = store.list_transactions(alice).await.unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0].description, "Groceries");
    assert_eq!(transactions[0].kind, TransactionKind::Expense);
    assert_eq!(transactions[0].amount, dec!(150));
    assert_eq!(transactions[1].description, "Salary");
    assert_eq!(transactions[1].kind, TransactionKind::Income);
    assert!(transactions.iter().all(|t| t.user_id == alice && t.account_id == account_id));
}

#[tokio::test]
async fn test_balance_matches_opening_balance_plus_history() {
    let store = store().await;
    let alice = user_id(&store, "alice").await;
    assert!(store.create_account(alice, "Wallet", "cash", dec!(12.34)).await.unwrap());
    let account_id = store.list_accounts(alice).await.unwrap()[0].id;

    for (kind, amount) in [
        ("income", dec!(0.66)),
        ("expense", dec!(3.10)),
        ("expense", dec!(20)),
        ("income", dec!(100.01)),
    ] {
        assert!(store.create_transaction(alice, account_id, kind, amount, "entry").await.unwrap());
    }

    let history: Decimal = store
        .list_transactions(alice)
        .await
        .unwrap()
        .iter()
        .map(|t| match t.kind {
            TransactionKind::Income => t.amount,
            TransactionKind::Expense => -t.amount,
        })
        .sum();

    let account = store.get_account(alice, account_id).await.unwrap().unwrap();
    assert_eq!(account.balance, dec!(12.34) + history);
    assert_eq!(account.balance, dec!(89.91));
}

#[tokio::test]
async fn test_rejected_transactions_leave_no_trace() {
    let store = store().await;
    let alice = user_id(&store, "alice").await;
    let mallory = user_id(&store, "mallory").await;
    assert!(store.create_account(alice, "Checking", "checking", dec!(1000)).await.unwrap());
    let account_id = store.list_accounts(alice).await.unwrap()[0].id;

    let rejected = [
        (alice, account_id, "income", dec!(0), "zero"),
        (alice, account_id, "expense", dec!(-10), "negative"),
        (alice, account_id, "transfer", dec!(10), "bad kind"),
        (alice, account_id, "Income", dec!(10), "wrong case"),
        (alice, account_id, "income", dec!(10), "   "),
        (alice, account_id + 100, "income", dec!(10), "missing account"),
        (mallory, account_id, "expense", dec!(10), "not the owner"),
    ];

    for (user, account, kind, amount, description) in rejected {
        assert!(
            !store
                .create_transaction(user, account, kind, amount, description)
                .await
                .unwrap(),
            "accepted {:?}",
            description
        );
    }

    assert!(store.list_transactions(alice).await.unwrap().is_empty());
    assert!(store.list_transactions(mallory).await.unwrap().is_empty());
    let account = store.get_account(alice, account_id).await.unwrap().unwrap();
    assert_eq!(account.balance, dec!(1000));
}

#[tokio::test]
async fn test_transactions_are_scoped_to_their_owner() {
    let store = store().await;
    let alice = user_id(&store, "alice").await;
    let bob = user_id(&store, "bob").await;
    assert!(store.create_account(alice, "A", "checking", dec!(0)).await.unwrap());
    assert!(store.create_account(bob, "B", "checking", dec!(0)).await.unwrap());
    let alice_account = store.list_accounts(alice).await.unwrap()[0].id;
    let bob_account = store.list_accounts(bob).await.unwrap()[0].id;

    assert!(store.create_transaction(alice, alice_account, "income", dec!(5), "a").await.unwrap());
    assert!(store.create_transaction(bob, bob_account, "income", dec!(7), "b").await.unwrap());

    let alices = store.list_transactions(alice).await.unwrap();
    assert_eq!(alices.len(), 1);
    assert_eq!(alices[0].amount, dec!(5));
}

#[tokio::test]
async fn test_balance_overflow_is_rejected() {
    let store = store().await;
    let alice = user_id(&store, "alice").await;
    let opening = dec!(90_000_000_000_000_000);
    assert!(store.create_account(alice, "Vault", "savings", opening).await.unwrap());
    let account_id = store.list_accounts(alice).await.unwrap()[0].id;

    assert!(
        !store
            .create_transaction(alice, account_id, "income", opening, "Windfall")
            .await
            .unwrap()
    );

    let accounts = store.list_accounts(alice).await.unwrap();
    assert_eq!(accounts[0].balance, opening);
    assert!(store.list_transactions(alice).await.unwrap().is_empty());

    assert!(store.create_transaction(alice, account_id, "expense", opening, "Spend").await.unwrap());
    let account = store.get_account(alice, account_id).await.unwrap().unwrap();
    assert_eq!(account.balance, Decimal::ZERO);
}

#[tokio::test]
async fn test_failed_balance_update_rolls_back_the_insert() {
    let store = store().await;
    let alice = user_id(&store, "alice").await;
    assert!(store.create_account(alice, "Checking", "checking", dec!(1000)).await.unwrap());
    let account_id = store.list_accounts(alice).await.unwrap()[0].id;

    sqlx::query(
        r#"
        CREATE TRIGGER freeze_balances BEFORE UPDATE ON accounts
        BEGIN
            SELECT RAISE(ABORT, 'balances are frozen');
        END
        "#,
    )
    .execute(store.pool())
    .await
    .unwrap();

    let result = store
        .create_transaction(alice, account_id, "income", dec!(50), "Refund")
        .await;
    assert!(result.is_err());

    assert!(store.list_transactions(alice).await.unwrap().is_empty());
    let account = store.get_account(alice, account_id).await.unwrap().unwrap();
    assert_eq!(account.balance, dec!(1000));
}
