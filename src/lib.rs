//! LedgerX - Double-Entry Wallet Ledger Engine
//!
//! A transaction engine over PostgreSQL that stays correct under concurrent
//! access: balances always reconcile to an immutable entry log, retried
//! operations never double-apply, and transfers never partially complete.
//!
//! # Modules
//!
//! - [`core_types`] - Core type definitions (AccountId, WalletId, EntryId)
//! - [`account`] - Account identity and lifecycle status
//! - [`wallet`] - Wallet balance cache and row-lock acquisition
//! - [`ledger`] - Append-only ledger entries keyed by idempotency token
//! - [`engine`] - Deposit / withdraw / transfer orchestration
//! - [`db`] - Connection pool and schema bootstrap
//! - [`config`] - YAML application configuration
//! - [`logging`] - tracing subscriber setup

// Core types - must be first!
pub mod core_types;

pub mod config;
pub mod db;
pub mod logging;

// Domain stores
pub mod account;
pub mod ledger;
pub mod wallet;

// Transaction engine
pub mod engine;

// Convenient re-exports at crate root
pub use account::{Account, AccountRepository, AccountStatus};
pub use core_types::{AccountId, EntryId, WalletId};
pub use db::Database;
pub use engine::{LedgerError, TransactionEngine};
pub use ledger::{EntryType, LedgerEntry, LedgerRepository};
pub use wallet::{Wallet, WalletRepository};
