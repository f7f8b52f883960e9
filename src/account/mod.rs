//! Account management module
//!
//! PostgreSQL-based storage for account identity and lifecycle status.
//! The transaction engine only ever reads `status` from here.

pub mod models;
pub mod repository;

// Re-export commonly used types
pub use models::{Account, AccountStatus};
pub use repository::AccountRepository;
