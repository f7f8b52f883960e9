//! Data models for wallet state

use crate::core_types::{AccountId, WalletId};
use crate::engine::LedgerError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Wallet - mutable balance cache, 1:1 with an account
///
/// The balance is denormalized state: at every committed point it equals the
/// sum of the wallet's ledger entries. Only the transaction engine, holding
/// the row lock, may move it. `version` is bumped on every balance write as
/// an optimistic backstop under the pessimistic lock.
#[derive(Debug, Clone)]
pub struct Wallet {
    pub id: WalletId,
    pub account_id: AccountId,
    pub balance: Decimal,
    /// ISO 4217 style code, uppercase, immutable after creation
    pub currency: String,
    pub version: i64,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Balance after crediting `amount`. Caller validates positivity.
    pub fn credited(&self, amount: Decimal) -> Decimal {
        self.balance + amount
    }

    /// Balance after debiting `amount`, rejecting a negative result.
    pub fn debited(&self, amount: Decimal) -> Result<Decimal, LedgerError> {
        let next = self.balance - amount;
        if next < Decimal::ZERO {
            return Err(LedgerError::InsufficientFunds {
                balance: self.balance,
                requested: amount,
            });
        }
        Ok(next)
    }

    pub fn has_sufficient_balance(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet(balance: &str) -> Wallet {
        Wallet {
            id: 1,
            account_id: 1,
            balance: balance.parse().unwrap(),
            currency: "USD".to_string(),
            version: 0,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_credited() {
        let w = wallet("100.00");
        assert_eq!(w.credited("50.25".parse().unwrap()), "150.25".parse().unwrap());
    }

    #[test]
    fn test_debited_ok() {
        let w = wallet("100.00");
        let next = w.debited("100.00".parse().unwrap()).expect("exact drain is allowed");
        assert_eq!(next, Decimal::ZERO);
    }

    #[test]
    fn test_debited_insufficient() {
        let w = wallet("100.00");
        let err = w.debited("100.0001".parse().unwrap()).unwrap_err();
        assert_eq!(err.code(), "INSUFFICIENT_FUNDS");
        // wallet state untouched
        assert_eq!(w.balance, "100.00".parse().unwrap());
    }

    #[test]
    fn test_has_sufficient_balance() {
        let w = wallet("10.5000");
        assert!(w.has_sufficient_balance("10.50".parse().unwrap()));
        assert!(!w.has_sufficient_balance("10.5001".parse().unwrap()));
    }
}
