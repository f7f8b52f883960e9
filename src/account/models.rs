//! Data models for account management

use crate::core_types::AccountId;
use chrono::{DateTime, Utc};

/// Account lifecycle status
///
/// Transitions: ACTIVE <-> SUSPENDED (reversible); any state -> CLOSED
/// (terminal, no reactivation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum AccountStatus {
    Active = 1,
    Suspended = 2,
    Closed = 3,
}

impl AccountStatus {
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(AccountStatus::Active),
            2 => Some(AccountStatus::Suspended),
            3 => Some(AccountStatus::Closed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "ACTIVE",
            AccountStatus::Suspended => "SUSPENDED",
            AccountStatus::Closed => "CLOSED",
        }
    }

    /// Whether the state machine permits moving to `next`.
    ///
    /// CLOSED is terminal; every other pair of distinct states is reachable.
    pub fn can_transition_to(&self, next: AccountStatus) -> bool {
        match (self, next) {
            (AccountStatus::Closed, _) => false,
            (_, next) => *self != next,
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account - the wallet owner identity consumed by the engine
///
/// The engine reads `status` and never mutates anything else here.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_id_roundtrip() {
        for status in [
            AccountStatus::Active,
            AccountStatus::Suspended,
            AccountStatus::Closed,
        ] {
            assert_eq!(AccountStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(AccountStatus::from_id(0), None);
        assert_eq!(AccountStatus::from_id(99), None);
    }

    #[test]
    fn test_active_suspended_reversible() {
        assert!(AccountStatus::Active.can_transition_to(AccountStatus::Suspended));
        assert!(AccountStatus::Suspended.can_transition_to(AccountStatus::Active));
    }

    #[test]
    fn test_closed_is_terminal() {
        assert!(AccountStatus::Active.can_transition_to(AccountStatus::Closed));
        assert!(AccountStatus::Suspended.can_transition_to(AccountStatus::Closed));
        assert!(!AccountStatus::Closed.can_transition_to(AccountStatus::Active));
        assert!(!AccountStatus::Closed.can_transition_to(AccountStatus::Suspended));
    }

    #[test]
    fn test_self_transition_rejected() {
        assert!(!AccountStatus::Active.can_transition_to(AccountStatus::Active));
        assert!(!AccountStatus::Closed.can_transition_to(AccountStatus::Closed));
    }

    #[test]
    fn test_is_active() {
        let account = Account {
            id: 1,
            email: "a@example.com".to_string(),
            status: AccountStatus::Suspended,
            created_at: Utc::now(),
        };
        assert!(!account.is_active());
    }
}
