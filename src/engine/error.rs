//! Ledger error types
//!
//! One taxonomy for the whole engine: input validation, not-found,
//! business-state conflicts, retryable lock timeouts, and fatal invariant
//! violations. Error codes are stable strings for API mapping.

use crate::account::AccountStatus;
use crate::core_types::{AccountId, WalletId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Ledger error types
#[derive(Error, Debug, Clone)]
pub enum LedgerError {
    // === Validation Errors (rejected pre-lock, zero side effects) ===
    #[error("Amount must be greater than zero (got {0})")]
    InvalidAmount(Decimal),

    #[error("Idempotency token is required and must not be blank")]
    InvalidIdempotencyKey,

    #[error("Source and destination wallet must differ")]
    DistinctWalletsRequired,

    #[error("Currency code must be 3-10 characters: {0}")]
    InvalidCurrency(String),

    #[error("Cannot transfer between currencies {from} and {to}")]
    CurrencyMismatch { from: String, to: String },

    // === Not-Found Errors ===
    #[error("Wallet not found: {0}")]
    WalletNotFound(WalletId),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    // === Business-State Conflicts (rejected post-lock, fully rolled back) ===
    #[error("Account {account_id} is {status} and cannot transact")]
    AccountInactive {
        account_id: AccountId,
        status: AccountStatus,
    },

    #[error("Insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: Decimal, requested: Decimal },

    #[error("Account already owns a wallet: {0}")]
    WalletAlreadyExists(AccountId),

    #[error("Email already registered: {0}")]
    EmailAlreadyRegistered(String),

    #[error("Account status cannot change from {from} to {to}")]
    InvalidStatusTransition {
        from: AccountStatus,
        to: AccountStatus,
    },

    // === Retryable Errors ===
    #[error("Wallet lock wait exceeded the configured timeout")]
    LockTimeout,

    // === Fatal Errors (must never occur in correct code) ===
    #[error("Transfer {0} is half-applied: debit entry exists without credit entry")]
    IncompleteTransfer(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    // === System Errors ===
    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InvalidAmount(_) => "INVALID_AMOUNT",
            LedgerError::InvalidIdempotencyKey => "INVALID_IDEMPOTENCY_KEY",
            LedgerError::DistinctWalletsRequired => "DISTINCT_WALLETS_REQUIRED",
            LedgerError::InvalidCurrency(_) => "INVALID_CURRENCY",
            LedgerError::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            LedgerError::WalletNotFound(_) => "NOT_FOUND",
            LedgerError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            LedgerError::AccountInactive { .. } => "ACCOUNT_INACTIVE",
            LedgerError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            LedgerError::WalletAlreadyExists(_) => "WALLET_ALREADY_EXISTS",
            LedgerError::EmailAlreadyRegistered(_) => "EMAIL_ALREADY_REGISTERED",
            LedgerError::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            LedgerError::LockTimeout => "LOCK_TIMEOUT",
            LedgerError::IncompleteTransfer(_) => "INCOMPLETE_TRANSFER",
            LedgerError::InvariantViolation(_) => "INVARIANT_VIOLATION",
            LedgerError::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Get HTTP status code suggestion for the request-handling adapter
    pub fn http_status(&self) -> u16 {
        match self {
            LedgerError::InvalidAmount(_)
            | LedgerError::InvalidIdempotencyKey
            | LedgerError::DistinctWalletsRequired
            | LedgerError::InvalidCurrency(_)
            | LedgerError::CurrencyMismatch { .. } => 400,
            LedgerError::WalletNotFound(_) | LedgerError::AccountNotFound(_) => 404,
            LedgerError::AccountInactive { .. }
            | LedgerError::InsufficientFunds { .. }
            | LedgerError::WalletAlreadyExists(_)
            | LedgerError::EmailAlreadyRegistered(_)
            | LedgerError::InvalidStatusTransition { .. } => 422,
            LedgerError::LockTimeout => 503,
            LedgerError::IncompleteTransfer(_)
            | LedgerError::InvariantViolation(_)
            | LedgerError::Database(_) => 500,
        }
    }

    /// Whether the caller may safely resubmit the same token
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::LockTimeout)
    }

    /// Fatal errors indicate a defect, never a business rejection.
    /// They always abort the unit of work and are logged at highest severity.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LedgerError::IncompleteTransfer(_) | LedgerError::InvariantViolation(_)
        )
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        // 55P03 = lock_not_available, raised when lock_timeout expires
        if let sqlx::Error::Database(db) = &e {
            if db.code().as_deref() == Some("55P03") {
                return LedgerError::LockTimeout;
            }
        }
        LedgerError::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::InvalidAmount(Decimal::ZERO).code(),
            "INVALID_AMOUNT"
        );
        assert_eq!(LedgerError::WalletNotFound(7).code(), "NOT_FOUND");
        assert_eq!(
            LedgerError::DistinctWalletsRequired.code(),
            "DISTINCT_WALLETS_REQUIRED"
        );
        assert_eq!(LedgerError::LockTimeout.code(), "LOCK_TIMEOUT");
    }

    #[test]
    fn test_http_status() {
        assert_eq!(LedgerError::InvalidIdempotencyKey.http_status(), 400);
        assert_eq!(LedgerError::WalletNotFound(1).http_status(), 404);
        assert_eq!(
            LedgerError::InsufficientFunds {
                balance: Decimal::ZERO,
                requested: Decimal::ONE,
            }
            .http_status(),
            422
        );
        assert_eq!(LedgerError::LockTimeout.http_status(), 503);
        assert_eq!(
            LedgerError::InvariantViolation("x".into()).http_status(),
            500
        );
    }

    #[test]
    fn test_retryable_and_fatal_are_disjoint() {
        assert!(LedgerError::LockTimeout.is_retryable());
        assert!(!LedgerError::LockTimeout.is_fatal());

        let fatal = LedgerError::IncompleteTransfer("T1".into());
        assert!(fatal.is_fatal());
        assert!(!fatal.is_retryable());

        let business = LedgerError::InsufficientFunds {
            balance: Decimal::ZERO,
            requested: Decimal::ONE,
        };
        assert!(!business.is_fatal());
    }

    #[test]
    fn test_display() {
        let err = LedgerError::CurrencyMismatch {
            from: "USD".into(),
            to: "EUR".into(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot transfer between currencies USD and EUR"
        );
    }
}
