//! Ledger module - the append-only source of truth
//!
//! Records every balance change as one immutable signed entry, keyed by a
//! globally unique idempotency token.

pub mod models;
pub mod repository;

// Re-export commonly used types
pub use models::{EntryType, LedgerEntry};
pub use repository::LedgerRepository;
