use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use ticketing_core::Invocation;
use ticketing_store::app_config::{BenchConfig, WorkloadKind};
use ticketing_store::{LedgerHost, TransactionalLedger};
use crate::report::{RoundReport, Tally};

/// Run one round with `bench.workers` concurrent workers
pub async fn run_round<L>(host: Arc<LedgerHost<L>>, kind: WorkloadKind, bench: &BenchConfig) -> RoundReport
where
    L: TransactionalLedger + 'static,
{
    let started = Instant::now();
    let mut handles = Vec::with_capacity(bench.workers);

    for worker in 0..bench.workers {
        let host = Arc::clone(&host);
        let count = bench.transactions_per_worker;
        let seat = bench.contended_seat.clone();

        handles.push(tokio::spawn(async move {
            match kind {
                WorkloadKind::Register => register_worker(&host, count).await,
                WorkloadKind::Buy => buy_worker(&host, worker, count).await,
                WorkloadKind::Contention => contention_worker(&host, worker, &seat).await,
            }
        }));
    }

    let mut tally = Tally::default();
    for handle in handles {
        match handle.await {
            Ok(outcome) => tally.merge(outcome),
            Err(e) => error!("Worker task failed: {}", e),
        }
    }

    RoundReport::new(kind, tally, started.elapsed())
}

/// Registers random passengers; ids are drawn from a small range so some
/// registrations collide with earlier ones
async fn register_worker<L: TransactionalLedger>(host: &LedgerHost<L>, count: usize) -> Tally {
    let mut rng = StdRng::from_entropy();
    let mut tally = Tally::default();

    for _ in 0..count {
        let invocation = Invocation::RegisterPassenger {
            id: format!("Passenger_{}", rng.gen_range(0..100_000)),
            name: format!("User{}", rng.gen_range(0..1_000)),
            email: "user@example.com".to_string(),
        };
        tally.record(&host.submit(invocation).await);
    }

    tally
}

/// Registers one passenger, then buys fresh seats that the registry
/// provisions on first reference
async fn buy_worker<L: TransactionalLedger>(host: &LedgerHost<L>, worker: usize, count: usize) -> Tally {
    let started_at = Utc::now().timestamp_millis();
    let passenger_id = format!("Passenger_Worker{}_{}", worker, started_at);
    register_for_round(host, worker, &passenger_id).await;

    let mut tally = Tally::default();
    for sequence in 0..count {
        let invocation = Invocation::BuyTicket {
            seat_number: format!("SEAT_{}_{}_{}", worker, started_at, sequence),
            passenger_id: passenger_id.clone(),
        };
        tally.record(&host.submit(invocation).await);
    }

    tally
}

/// Every worker tries to buy the same seat once
async fn contention_worker<L: TransactionalLedger>(host: &LedgerHost<L>, worker: usize, seat: &str) -> Tally {
    let passenger_id = format!("Passenger_Contender{}_{}", worker, Utc::now().timestamp_millis());
    register_for_round(host, worker, &passenger_id).await;

    let mut tally = Tally::default();
    let invocation = Invocation::BuyTicket {
        seat_number: seat.to_string(),
        passenger_id,
    };
    tally.record(&host.submit(invocation).await);
    tally
}

async fn register_for_round<L: TransactionalLedger>(host: &LedgerHost<L>, worker: usize, passenger_id: &str) {
    info!("Worker {}: registering passenger {}", worker, passenger_id);
    let invocation = Invocation::RegisterPassenger {
        id: passenger_id.to_string(),
        name: format!("Worker{}", worker),
        email: "worker@example.com".to_string(),
    };
    if let Err(e) = host.submit(invocation).await {
        error!("Worker {}: failed to register passenger: {}", worker, e);
    }
}
