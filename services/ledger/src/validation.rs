//! Input validation utilities
//!
//! Each check returns the reason for rejection so callers can log it; the
//! store itself only reports accept/reject.

use rust_decimal::Decimal;

use crate::models::{TransactionKind, to_minor_units};

/// Validate registration input
pub fn validate_registration(username: &str, password: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    Ok(())
}

/// Validate a required free-text field and return it trimmed
pub fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} is required", field));
    }

    Ok(trimmed)
}

/// Validate an opening balance and convert it to cents; any sign is allowed
pub fn validate_opening_balance(amount: Decimal) -> Result<i64, String> {
    to_minor_units(amount).ok_or_else(|| format!("Opening balance {} is out of range", amount))
}

/// Validate a transaction kind
pub fn validate_kind(kind: &str) -> Result<TransactionKind, String> {
    kind.parse::<TransactionKind>()
        .map_err(|_| "Transaction kind must be income or expense".to_string())
}

/// Validate a transaction amount and convert it to cents
pub fn validate_transaction_amount(amount: Decimal) -> Result<i64, String> {
    if amount <= Decimal::ZERO {
        return Err("Amount must be greater than zero".to_string());
    }

    match to_minor_units(amount) {
        Some(minor) if minor > 0 => Ok(minor),
        Some(_) => Err("Amount must be at least one cent".to_string()),
        None => Err(format!("Amount {} is out of range", amount)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_registration_requires_both_fields() {
        assert!(validate_registration("alice", "pw").is_ok());
        assert!(validate_registration("", "pw").is_err());
        assert!(validate_registration("alice", "").is_err());
    }

    #[test]
    fn test_require_text_trims() {
        assert_eq!(require_text("Name", "  Checking "), Ok("Checking"));
        assert!(require_text("Name", "   ").is_err());
        assert!(require_text("Name", "").is_err());
    }

    #[test]
    fn test_transaction_amounts() {
        assert_eq!(validate_transaction_amount(dec!(150)), Ok(15_000));
        assert_eq!(validate_transaction_amount(dec!(0.01)), Ok(1));
        assert!(validate_transaction_amount(dec!(0)).is_err());
        assert!(validate_transaction_amount(dec!(-5)).is_err());
        assert!(validate_transaction_amount(dec!(0.001)).is_err());
    }

    #[test]
    fn test_opening_balance_allows_any_sign() {
        assert_eq!(validate_opening_balance(dec!(-250.5)), Ok(-25_050));
        assert_eq!(validate_opening_balance(dec!(0)), Ok(0));
        assert!(validate_opening_balance(Decimal::MAX).is_err());
    }

    #[test]
    fn test_kinds() {
        assert_eq!(validate_kind("income"), Ok(TransactionKind::Income));
        assert!(validate_kind("refund").is_err());
    }
}
