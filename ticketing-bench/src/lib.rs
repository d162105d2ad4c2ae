pub mod report;
pub mod workload;

use std::sync::Arc;
use tracing::info;
use ticketing_core::Invocation;
use ticketing_store::app_config::{BenchConfig, WorkloadKind};
use ticketing_store::{LedgerHost, TransactionalLedger};

pub use report::RoundReport;
pub use workload::run_round;

/// Seed the ledger, then run every configured round in order
pub async fn run_benchmark<L>(host: LedgerHost<L>, bench: &BenchConfig) -> anyhow::Result<Vec<RoundReport>>
where
    L: TransactionalLedger + 'static,
{
    let host = Arc::new(host);
    host.submit(Invocation::InitLedger).await?;
    info!("Ledger initialised");

    let mut reports = Vec::with_capacity(bench.rounds.len());
    for kind in &bench.rounds {
        let report = run_round(Arc::clone(&host), *kind, bench).await;
        info!("{}", report);

        if *kind == WorkloadKind::Contention && report.succeeded > 1 {
            anyhow::bail!("Seat {} was sold {} times", bench.contended_seat, report.succeeded);
        }
        reports.push(report);
    }

    Ok(reports)
}
