//! Wallet module
//!
//! The wallet row is the only contested resource in the system. All balance
//! mutation funnels through the transaction engine while it holds the
//! exclusive row lock taken via [`WalletRepository::acquire`].

pub mod models;
pub mod repository;

// Re-export commonly used types
pub use models::Wallet;
pub use repository::WalletRepository;
