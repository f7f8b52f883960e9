//! End-to-end demo against a live PostgreSQL
//!
//! Usage:
//!   cargo run --bin ledger_demo
//!
//! Reads `config/{LEDGERX_ENV:-dev}.yaml`, bootstraps the schema, then runs
//! a deposit / withdraw / transfer sequence across two fresh wallets and
//! prints the resulting ledger history.

use ledgerx::config::AppConfig;
use ledgerx::db::{Database, schema};
use ledgerx::logging::init_logging;
use ledgerx::{AccountRepository, TransactionEngine, WalletRepository};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("LEDGERX_ENV").unwrap_or_else(|_| "dev".to_string());
    let config = AppConfig::load(&env);
    let _guard = init_logging(&config);

    let db = Database::connect(&config.postgres_url, &config.database).await?;
    db.health_check().await?;
    schema::init_schema(db.pool()).await?;

    let engine = TransactionEngine::new(db.pool().clone(), config.database.lock_timeout_secs);

    let run_id = uuid::Uuid::new_v4();
    let alice = AccountRepository::create(db.pool(), &format!("alice-{}@demo", run_id)).await?;
    let bob = AccountRepository::create(db.pool(), &format!("bob-{}@demo", run_id)).await?;
    let alice_wallet = WalletRepository::create(db.pool(), alice.id, "USD").await?;
    let bob_wallet = WalletRepository::create(db.pool(), bob.id, "USD").await?;

    let amount: Decimal = "100.00".parse()?;
    engine
        .deposit(alice_wallet.id, amount, &format!("demo-{}-D1", run_id), Some("payroll"))
        .await?;
    engine
        .withdraw(
            alice_wallet.id,
            "15.00".parse()?,
            &format!("demo-{}-W1", run_id),
            Some("coffee fund"),
        )
        .await?;
    let (debit, credit) = engine
        .transfer(
            alice_wallet.id,
            bob_wallet.id,
            "30.00".parse()?,
            &format!("demo-{}-T1", run_id),
            Some("rent split"),
        )
        .await?;

    println!("Transfer entries:");
    println!("  debit  {} {} {}", debit.token, debit.amount, debit.entry_type.as_str());
    println!("  credit {} {} {}", credit.token, credit.amount, credit.entry_type.as_str());

    println!(
        "Balances: alice={} bob={}",
        engine.balance(alice_wallet.id).await?,
        engine.balance(bob_wallet.id).await?
    );
    println!(
        "Reconciled: alice={} bob={}",
        engine.is_reconciled(alice_wallet.id).await?,
        engine.is_reconciled(bob_wallet.id).await?
    );

    println!("Alice history:");
    for entry in engine.history(alice_wallet.id).await? {
        println!(
            "  {:>12} {:>10} {} {}",
            entry.entry_type.as_str(),
            entry.amount,
            entry.token,
            entry.memo.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
