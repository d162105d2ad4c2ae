use anyhow::Context;
use ticketing_bench::run_benchmark;
use ticketing_core::TicketRegistry;
use ticketing_store::app_config::{Config, LedgerBackend};
use ticketing_store::{LedgerHost, MemoryLedger, RedisLedger};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ticketing_bench=info,ticketing_store=info,ticketing_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    let registry = TicketRegistry::with_system_clock(config.registry.clone());
    tracing::info!(
        "Starting benchmark: {} workers x {} transactions, {:?} ledger",
        config.bench.workers,
        config.bench.transactions_per_worker,
        config.ledger.backend
    );

    match config.ledger.backend {
        LedgerBackend::Memory => {
            run_benchmark(LedgerHost::new(MemoryLedger::new(), registry), &config.bench).await?;
        }
        LedgerBackend::Redis => {
            let redis = config
                .ledger
                .redis
                .as_ref()
                .context("ledger.redis must be set for the redis backend")?;
            let ledger = RedisLedger::new(&redis.url, &redis.namespace)
                .await
                .context("Failed to open Redis ledger")?;
            run_benchmark(LedgerHost::new(ledger, registry), &config.bench).await?;
        }
    }

    Ok(())
}
