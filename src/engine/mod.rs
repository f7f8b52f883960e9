//! Transaction engine module
//!
//! Orchestrates deposit / withdraw / transfer over the wallet and ledger
//! stores with the locking + idempotency protocol that keeps them honest.
//!
//! # Safety Invariants
//!
//! 1. **Ledger-Before-Balance**: entries are appended before the cached
//!    balance moves, inside one database transaction
//! 2. **Post-Lock Idempotency**: the authoritative token check runs with the
//!    row lock held; the unique constraint is the final backstop
//! 3. **Ascending Lock Order**: multi-wallet operations lock rows in
//!    ascending wallet ID order, so no wait-for cycle can form
//! 4. **Fatal Post-Conditions**: a failed post-condition is a defect, never
//!    a business rejection; it aborts and rolls back the unit of work

pub mod error;
pub mod service;
pub mod validation;

#[cfg(test)]
mod integration_tests;

// Re-exports for convenience
pub use error::LedgerError;
pub use service::TransactionEngine;
