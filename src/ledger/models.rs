//! Data models for the append-only ledger

use crate::core_types::{EntryId, WalletId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Entry type - categorizes movements for reporting and reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryType {
    /// External funds coming in
    Deposit,
    /// External funds going out
    Withdrawal,
    /// Internal transfer, receiving side
    TransferIn,
    /// Internal transfer, sending side
    TransferOut,
    /// Service fee deduction
    Fee,
    /// Refund of a previous movement
    Refund,
    /// Manual correction, should be rare
    Adjustment,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Deposit => "DEPOSIT",
            EntryType::Withdrawal => "WITHDRAWAL",
            EntryType::TransferIn => "TRANSFER_IN",
            EntryType::TransferOut => "TRANSFER_OUT",
            EntryType::Fee => "FEE",
            EntryType::Refund => "REFUND",
            EntryType::Adjustment => "ADJUSTMENT",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "DEPOSIT" => Some(EntryType::Deposit),
            "WITHDRAWAL" => Some(EntryType::Withdrawal),
            "TRANSFER_IN" => Some(EntryType::TransferIn),
            "TRANSFER_OUT" => Some(EntryType::TransferOut),
            "FEE" => Some(EntryType::Fee),
            "REFUND" => Some(EntryType::Refund),
            "ADJUSTMENT" => Some(EntryType::Adjustment),
            _ => None,
        }
    }
}

/// LedgerEntry - one immutable, signed money movement
///
/// The ledger is the source of truth: every committed wallet balance equals
/// the sum of its entries. Rows are never updated or deleted after creation
/// (a storage trigger denies both).
///
/// Positive amount = credit (money in), negative = debit (money out).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub wallet_id: WalletId,
    pub amount: Decimal,
    pub entry_type: EntryType,
    /// Client-supplied idempotency token, globally unique
    pub token: String,
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn is_credit(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_debit(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn absolute_amount(&self) -> Decimal {
        self.amount.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_roundtrip() {
        for t in [
            EntryType::Deposit,
            EntryType::Withdrawal,
            EntryType::TransferIn,
            EntryType::TransferOut,
            EntryType::Fee,
            EntryType::Refund,
            EntryType::Adjustment,
        ] {
            assert_eq!(EntryType::from_str(t.as_str()), Some(t));
        }
        assert_eq!(EntryType::from_str("CHARGEBACK"), None);
    }

    #[test]
    fn test_entry_serializes_for_adapters() {
        let entry = LedgerEntry {
            id: 9,
            wallet_id: 3,
            amount: "100.00".parse().unwrap(),
            entry_type: EntryType::Deposit,
            token: "D1".to_string(),
            memo: Some("payroll".to_string()),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&entry).expect("should serialize");
        assert_eq!(json["entry_type"], "Deposit");
        assert_eq!(json["token"], "D1");
    }

    #[test]
    fn test_credit_debit_helpers() {
        let entry = LedgerEntry {
            id: 1,
            wallet_id: 1,
            amount: "-30.00".parse().unwrap(),
            entry_type: EntryType::TransferOut,
            token: "T1-OUT".to_string(),
            memo: None,
            created_at: Utc::now(),
        };
        assert!(entry.is_debit());
        assert!(!entry.is_credit());
        assert_eq!(entry.absolute_amount(), "30.00".parse().unwrap());
    }
}
