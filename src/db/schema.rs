//! PostgreSQL schema bootstrap
//!
//! Creates the accounts / wallets / ledger_entries tables along with the
//! storage-level backstops the engine relies on:
//! - unique constraint on the idempotency token
//! - non-negative balance CHECK on wallets
//! - trigger denying UPDATE/DELETE on ledger rows (append-only)

use anyhow::Result;
use sqlx::PgPool;

const CREATE_ACCOUNTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id          BIGSERIAL PRIMARY KEY,
    email       VARCHAR(255) NOT NULL UNIQUE,
    status      SMALLINT NOT NULL DEFAULT 1,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_WALLETS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS wallets (
    id          BIGSERIAL PRIMARY KEY,
    account_id  BIGINT NOT NULL UNIQUE REFERENCES accounts(id),
    balance     NUMERIC(19,4) NOT NULL DEFAULT 0 CHECK (balance >= 0),
    currency    VARCHAR(10) NOT NULL,
    version     BIGINT NOT NULL DEFAULT 0,
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_LEDGER_ENTRIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ledger_entries (
    id          BIGSERIAL PRIMARY KEY,
    wallet_id   BIGINT NOT NULL REFERENCES wallets(id),
    amount      NUMERIC(19,4) NOT NULL CHECK (amount <> 0),
    entry_type  VARCHAR(50) NOT NULL,
    token       VARCHAR(255) NOT NULL UNIQUE,
    memo        VARCHAR(500),
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_LEDGER_HISTORY_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_ledger_wallet_created
    ON ledger_entries (wallet_id, created_at)
"#;

// Ledger rows are immutable post-commit. Enforced in storage so no code
// path, including ad-hoc SQL, can rewrite history.
const CREATE_APPEND_ONLY_FUNCTION: &str = r#"
CREATE OR REPLACE FUNCTION ledger_entries_deny_mutation() RETURNS trigger AS $$
BEGIN
    RAISE EXCEPTION 'ledger_entries is append-only: % denied', TG_OP;
END;
$$ LANGUAGE plpgsql
"#;

const DROP_APPEND_ONLY_TRIGGER: &str = r#"
DROP TRIGGER IF EXISTS ledger_append_only ON ledger_entries
"#;

const CREATE_APPEND_ONLY_TRIGGER: &str = r#"
CREATE TRIGGER ledger_append_only
    BEFORE UPDATE OR DELETE ON ledger_entries
    FOR EACH ROW EXECUTE FUNCTION ledger_entries_deny_mutation()
"#;

/// Initialize the PostgreSQL schema for the ledger database
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    tracing::info!("Initializing PostgreSQL schema...");

    sqlx::query(CREATE_ACCOUNTS_TABLE)
        .execute(pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create accounts table: {}", e))?;

    sqlx::query(CREATE_WALLETS_TABLE)
        .execute(pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create wallets table: {}", e))?;

    sqlx::query(CREATE_LEDGER_ENTRIES_TABLE)
        .execute(pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create ledger_entries table: {}", e))?;

    sqlx::query(CREATE_LEDGER_HISTORY_INDEX)
        .execute(pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create ledger history index: {}", e))?;

    sqlx::query(CREATE_APPEND_ONLY_FUNCTION)
        .execute(pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create append-only function: {}", e))?;

    sqlx::query(DROP_APPEND_ONLY_TRIGGER)
        .execute(pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to drop stale append-only trigger: {}", e))?;

    sqlx::query(CREATE_APPEND_ONLY_TRIGGER)
        .execute(pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create append-only trigger: {}", e))?;

    tracing::info!("PostgreSQL schema initialized successfully");
    Ok(())
}
