//! Transaction engine - deposit, withdraw, transfer
//!
//! Every mutation runs the same pipeline inside one database transaction:
//!
//! 1. Validate inputs (pre-lock, zero side effects)
//! 2. Acquire wallet row lock(s), ascending wallet ID order
//! 3. Idempotency check under the lock (unique token constraint is the
//!    final backstop against concurrent duplicates)
//! 4. Append ledger entries, strictly before any balance write
//! 5. Mutate wallet balance(s)
//! 6. Verify post-conditions, fatal on violation
//! 7. Commit, or roll back everything on any failure

use super::error::LedgerError;
use super::validation;
use crate::account::AccountRepository;
use crate::core_types::WalletId;
use crate::ledger::{EntryType, LedgerEntry, LedgerRepository};
use crate::wallet::{Wallet, WalletRepository};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

/// Orchestrates all balance mutations against the backing store.
///
/// Cheap to clone; shares the underlying connection pool.
#[derive(Clone)]
pub struct TransactionEngine {
    pool: PgPool,
    lock_timeout_secs: u64,
}

impl TransactionEngine {
    pub fn new(pool: PgPool, lock_timeout_secs: u64) -> Self {
        Self {
            pool,
            lock_timeout_secs,
        }
    }

    /// Deposit funds into a wallet. Idempotent on `token`.
    pub async fn deposit(
        &self,
        wallet_id: WalletId,
        amount: Decimal,
        token: &str,
        memo: Option<&str>,
    ) -> Result<LedgerEntry, LedgerError> {
        validation::positive_amount(amount)?;
        validation::idempotency_token(token)?;

        // Replay fast path. Not authoritative: re-checked under the lock.
        if let Some(existing) = LedgerRepository::find_by_token(&self.pool, token).await? {
            return Ok(existing);
        }

        let mut tx = self.begin().await?;
        let wallet = WalletRepository::acquire(&mut tx, wallet_id).await?;

        // Authoritative idempotency check, serialized by the row lock
        if let Some(existing) = LedgerRepository::find_by_token(&mut *tx, token).await? {
            tx.rollback().await?;
            return Ok(existing);
        }

        Self::require_active(&mut tx, &wallet).await?;

        let balance_before = wallet.balance;

        // Ledger entry first: the log is the source of truth
        let Some(entry) = LedgerRepository::insert(
            &mut tx,
            wallet.id,
            amount,
            EntryType::Deposit,
            token,
            memo,
        )
        .await?
        else {
            // Unique backstop fired: a concurrent caller committed this token
            tx.rollback().await?;
            return self.committed_entry(token).await;
        };

        WalletRepository::update_balance(&mut tx, wallet.id, wallet.credited(amount), wallet.version)
            .await?;

        let balance_after = WalletRepository::balance_of(&mut *tx, wallet.id).await?;
        if balance_after != balance_before + amount {
            return Err(Self::invariant_violation(format!(
                "deposit balance mismatch on wallet {}: expected {}, found {}",
                wallet.id,
                balance_before + amount,
                balance_after
            )));
        }

        tx.commit().await?;
        tracing::info!(wallet_id, %amount, token, "Deposit committed");
        Ok(entry)
    }

    /// Withdraw funds from a wallet. Idempotent on `token`.
    pub async fn withdraw(
        &self,
        wallet_id: WalletId,
        amount: Decimal,
        token: &str,
        memo: Option<&str>,
    ) -> Result<LedgerEntry, LedgerError> {
        validation::positive_amount(amount)?;
        validation::idempotency_token(token)?;

        if let Some(existing) = LedgerRepository::find_by_token(&self.pool, token).await? {
            return Ok(existing);
        }

        let mut tx = self.begin().await?;
        let wallet = WalletRepository::acquire(&mut tx, wallet_id).await?;

        if let Some(existing) = LedgerRepository::find_by_token(&mut *tx, token).await? {
            tx.rollback().await?;
            return Ok(existing);
        }

        Self::require_active(&mut tx, &wallet).await?;

        let balance_before = wallet.balance;

        let Some(entry) = LedgerRepository::insert(
            &mut tx,
            wallet.id,
            -amount,
            EntryType::Withdrawal,
            token,
            memo,
        )
        .await?
        else {
            tx.rollback().await?;
            return self.committed_entry(token).await;
        };

        // Rejects INSUFFICIENT_FUNDS; the entry above is rolled back with us
        let new_balance = wallet.debited(amount)?;
        WalletRepository::update_balance(&mut tx, wallet.id, new_balance, wallet.version).await?;

        let balance_after = WalletRepository::balance_of(&mut *tx, wallet.id).await?;
        if balance_after != balance_before - amount {
            return Err(Self::invariant_violation(format!(
                "withdrawal balance mismatch on wallet {}: expected {}, found {}",
                wallet.id,
                balance_before - amount,
                balance_after
            )));
        }
        // Defense in depth on top of the debit check and the storage CHECK
        if balance_after < Decimal::ZERO {
            return Err(Self::invariant_violation(format!(
                "negative balance {} on wallet {} after withdrawal",
                balance_after, wallet.id
            )));
        }

        tx.commit().await?;
        tracing::info!(wallet_id, %amount, token, "Withdrawal committed");
        Ok(entry)
    }

    /// Transfer funds between two wallets. Idempotent on `token`; the debit
    /// and credit entries carry `token-OUT` / `token-IN`.
    ///
    /// Locks are always taken in ascending wallet ID order regardless of
    /// transfer direction, so two transfers sharing a wallet pair contend on
    /// the same row first and no wait-for cycle can form.
    pub async fn transfer(
        &self,
        from_wallet_id: WalletId,
        to_wallet_id: WalletId,
        amount: Decimal,
        token: &str,
        memo: Option<&str>,
    ) -> Result<(LedgerEntry, LedgerEntry), LedgerError> {
        validation::positive_amount(amount)?;
        validation::idempotency_token(token)?;
        if from_wallet_id == to_wallet_id {
            return Err(LedgerError::DistinctWalletsRequired);
        }

        let out_token = format!("{}-OUT", token);
        let in_token = format!("{}-IN", token);

        if let Some(pair) = self
            .completed_transfer(token, &out_token, &in_token)
            .await?
        {
            return Ok(pair);
        }

        let mut tx = self.begin().await?;

        let lo = from_wallet_id.min(to_wallet_id);
        let hi = from_wallet_id.max(to_wallet_id);
        let first = WalletRepository::acquire(&mut tx, lo).await?;
        let second = WalletRepository::acquire(&mut tx, hi).await?;

        // Re-identify sides by the requested IDs, not acquisition order
        let (from_wallet, to_wallet) = if first.id == from_wallet_id {
            (first, second)
        } else {
            (second, first)
        };

        // Authoritative replay check under both locks
        if let Some(debit) = LedgerRepository::find_by_token(&mut *tx, &out_token).await? {
            tx.rollback().await?;
            let credit = self.matching_credit(token, &in_token).await?;
            return Ok((debit, credit));
        }

        if from_wallet.currency != to_wallet.currency {
            return Err(LedgerError::CurrencyMismatch {
                from: from_wallet.currency.clone(),
                to: to_wallet.currency.clone(),
            });
        }

        Self::require_active(&mut tx, &from_wallet).await?;
        Self::require_active(&mut tx, &to_wallet).await?;

        if !from_wallet.has_sufficient_balance(amount) {
            return Err(LedgerError::InsufficientFunds {
                balance: from_wallet.balance,
                requested: amount,
            });
        }

        let from_before = from_wallet.balance;
        let to_before = to_wallet.balance;

        // Both ledger writes precede both balance writes
        let Some(debit) = LedgerRepository::insert(
            &mut tx,
            from_wallet.id,
            -amount,
            EntryType::TransferOut,
            &out_token,
            memo,
        )
        .await?
        else {
            tx.rollback().await?;
            let debit = self
                .committed_entry(&out_token)
                .await?;
            let credit = self.matching_credit(token, &in_token).await?;
            return Ok((debit, credit));
        };

        let Some(credit) = LedgerRepository::insert(
            &mut tx,
            to_wallet.id,
            amount,
            EntryType::TransferIn,
            &in_token,
            memo,
        )
        .await?
        else {
            // An IN entry without its OUT sibling is a half-applied transfer
            tracing::error!(token, "FATAL: orphan credit entry found for transfer token");
            return Err(LedgerError::IncompleteTransfer(token.to_string()));
        };

        let new_from_balance = from_wallet.debited(amount)?;
        WalletRepository::update_balance(&mut tx, from_wallet.id, new_from_balance, from_wallet.version)
            .await?;
        WalletRepository::update_balance(
            &mut tx,
            to_wallet.id,
            to_wallet.credited(amount),
            to_wallet.version,
        )
        .await?;

        let from_after = WalletRepository::balance_of(&mut *tx, from_wallet.id).await?;
        let to_after = WalletRepository::balance_of(&mut *tx, to_wallet.id).await?;

        if from_after != from_before - amount {
            return Err(Self::invariant_violation(format!(
                "transfer debit mismatch on wallet {}: expected {}, found {}",
                from_wallet.id,
                from_before - amount,
                from_after
            )));
        }
        if to_after != to_before + amount {
            return Err(Self::invariant_violation(format!(
                "transfer credit mismatch on wallet {}: expected {}, found {}",
                to_wallet.id,
                to_before + amount,
                to_after
            )));
        }
        // Money conservation: the two deltas cancel exactly
        let total_delta = (from_after - from_before) + (to_after - to_before);
        if total_delta != Decimal::ZERO {
            return Err(Self::invariant_violation(format!(
                "money not conserved in transfer {}: total delta {}",
                token, total_delta
            )));
        }

        tx.commit().await?;
        tracing::info!(
            from_wallet_id,
            to_wallet_id,
            %amount,
            token,
            "Transfer committed"
        );
        Ok((debit, credit))
    }

    // === Query surface (read-only, unlocked) ===

    /// Full history of a wallet in append order (oldest first)
    pub async fn history(&self, wallet_id: WalletId) -> Result<Vec<LedgerEntry>, LedgerError> {
        WalletRepository::get(&self.pool, wallet_id)
            .await?
            .ok_or(LedgerError::WalletNotFound(wallet_id))?;
        LedgerRepository::history(&self.pool, wallet_id).await
    }

    /// Look up a single entry by idempotency token
    pub async fn find_by_token(&self, token: &str) -> Result<Option<LedgerEntry>, LedgerError> {
        LedgerRepository::find_by_token(&self.pool, token).await
    }

    /// Current cached balance of a wallet
    pub async fn balance(&self, wallet_id: WalletId) -> Result<Decimal, LedgerError> {
        WalletRepository::balance_of(&self.pool, wallet_id).await
    }

    /// Monitoring probe: does the cached balance match the ledger sum?
    ///
    /// Evaluated as one statement, so concurrent commits cannot slip between
    /// the balance read and the sum and produce a spurious mismatch.
    pub async fn is_reconciled(&self, wallet_id: WalletId) -> Result<bool, LedgerError> {
        LedgerRepository::balance_matches_ledger(&self.pool, wallet_id)
            .await?
            .ok_or(LedgerError::WalletNotFound(wallet_id))
    }

    // === Internals ===

    /// Open the unit of work with the configured lock wait bound.
    /// SET LOCAL scopes the timeout to this transaction only.
    async fn begin(&self) -> Result<Transaction<'static, Postgres>, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let stmt = format!("SET LOCAL lock_timeout = '{}s'", self.lock_timeout_secs);
        sqlx::query(&stmt).execute(&mut *tx).await?;
        Ok(tx)
    }

    /// Require the wallet's owning account to be ACTIVE, re-read while the
    /// row lock is held. Closes the race where suspension lands mid-flight.
    async fn require_active(conn: &mut PgConnection, wallet: &Wallet) -> Result<(), LedgerError> {
        let account = AccountRepository::get(&mut *conn, wallet.account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(wallet.account_id))?;
        if !account.is_active() {
            return Err(LedgerError::AccountInactive {
                account_id: account.id,
                status: account.status,
            });
        }
        Ok(())
    }

    /// Fetch the entry a concurrent duplicate committed for `token`.
    /// Called after the unique backstop fired, so the row must exist.
    async fn committed_entry(&self, token: &str) -> Result<LedgerEntry, LedgerError> {
        LedgerRepository::find_by_token(&self.pool, token)
            .await?
            .ok_or_else(|| {
                LedgerError::Database(format!(
                    "entry for duplicate token {} not visible after conflict",
                    token
                ))
            })
    }

    /// Replay lookup for a transfer: both linked entries, or nothing.
    async fn completed_transfer(
        &self,
        token: &str,
        out_token: &str,
        in_token: &str,
    ) -> Result<Option<(LedgerEntry, LedgerEntry)>, LedgerError> {
        let Some(debit) = LedgerRepository::find_by_token(&self.pool, out_token).await? else {
            return Ok(None);
        };
        let credit = self.matching_credit(token, in_token).await?;
        Ok(Some((debit, credit)))
    }

    /// The credit side must exist whenever the debit side does. Its absence
    /// signals a half-applied transfer, which the atomic unit of work makes
    /// impossible; fail fast rather than attempt repair.
    async fn matching_credit(
        &self,
        token: &str,
        in_token: &str,
    ) -> Result<LedgerEntry, LedgerError> {
        match LedgerRepository::find_by_token(&self.pool, in_token).await? {
            Some(credit) => Ok(credit),
            None => {
                tracing::error!(token, "FATAL: debit entry exists without credit entry");
                Err(LedgerError::IncompleteTransfer(token.to_string()))
            }
        }
    }

    fn invariant_violation(msg: String) -> LedgerError {
        tracing::error!(
            violation = %msg,
            "FATAL: post-condition failed, rolling back unit of work"
        );
        LedgerError::InvariantViolation(msg)
    }
}
