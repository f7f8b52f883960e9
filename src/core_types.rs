//! Core types used throughout the system
//!
//! These are fundamental type aliases used by all modules.
//! They provide semantic meaning and enable future type evolution.

/// Account ID - globally unique, immutable after assignment.
///
/// Assigned by the backing store (BIGSERIAL). Primary key for accounts.
pub type AccountId = i64;

/// Wallet ID - globally unique identifier for a wallet.
///
/// # Constraints:
/// - **Immutable**: Once assigned, NEVER changes
/// - **Totally ordered**: Doubles as the lock-ordering key. Multi-wallet
///   operations always acquire row locks in ascending wallet ID order.
pub type WalletId = i64;

/// Ledger entry ID - unique within the system
pub type EntryId = i64;
