use chrono::{TimeZone, Utc};
use std::sync::Arc;
use ticketing_core::{
    FixedClock, Invocation, KeyScheme, RegistryError, RegistryRules, StoreError, TicketRegistry,
};
use ticketing_shared::{Ticket, TicketStatus};
use ticketing_store::{LedgerHost, MemoryLedger};

fn host_with(rules: RegistryRules) -> LedgerHost<MemoryLedger> {
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap());
    LedgerHost::new(MemoryLedger::new(), TicketRegistry::new(rules, Arc::new(clock)))
}

fn host() -> LedgerHost<MemoryLedger> {
    host_with(RegistryRules::default())
}

fn register(id: &str) -> Invocation {
    Invocation::RegisterPassenger {
        id: id.to_string(),
        name: format!("Rider {}", id),
        email: format!("{}@example.com", id),
    }
}

fn buy(seat: &str, passenger: &str) -> Invocation {
    Invocation::BuyTicket {
        seat_number: seat.to_string(),
        passenger_id: passenger.to_string(),
    }
}

async fn read_ticket(host: &LedgerHost<MemoryLedger>, seat: &str) -> Ticket {
    let payload = host
        .evaluate(Invocation::ReadTicket { seat_number: seat.to_string() })
        .await
        .unwrap();
    serde_json::from_slice(&payload).unwrap()
}

#[tokio::test]
async fn test_seed_then_purchase_flow() {
    let host = host();
    host.submit(Invocation::InitLedger).await.unwrap();
    assert_eq!(
        host.ledger().committed("BUS-101").unwrap().unwrap(),
        br#"{"seatNumber":"BUS-101","ownerID":"","price":20,"status":"AVAILABLE","orgType":"Bus"}"#.to_vec()
    );

    host.submit(register("p1")).await.unwrap();
    host.submit(buy("BUS-101", "p1")).await.unwrap();

    let ticket = read_ticket(&host, "BUS-101").await;
    assert_eq!(ticket.status, TicketStatus::Sold);
    assert_eq!(ticket.owner_id, "p1");
    assert_eq!(ticket.price, 20);
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let host = host();
    host.submit(register("p1")).await.unwrap();
    let stored = host.ledger().committed("p1").unwrap();

    let err = host.submit(register("p1")).await.unwrap_err();

    assert!(matches!(err, RegistryError::AlreadyExists(_)));
    assert_eq!(host.ledger().committed("p1").unwrap(), stored);
}

#[tokio::test]
async fn test_auto_provisioned_seat() {
    let host = host();
    host.submit(register("p1")).await.unwrap();

    host.submit(buy("NEW-99", "p1")).await.unwrap();

    let ticket = read_ticket(&host, "NEW-99").await;
    assert_eq!(ticket.status, TicketStatus::Sold);
    assert_eq!(ticket.owner_id, "p1");
    assert_eq!(ticket.price, 100);
    assert_eq!(ticket.org_type, "Benchmark");
}

#[tokio::test]
async fn test_ghost_passenger_leaves_seat_untouched() {
    let host = host();
    host.submit(Invocation::InitLedger).await.unwrap();
    let before = host.ledger().committed("RAIL-A1").unwrap();

    let err = host.submit(buy("RAIL-A1", "ghost")).await.unwrap_err();

    assert_eq!(err.to_string(), "Passenger ghost does not exist");
    assert_eq!(host.ledger().committed("RAIL-A1").unwrap(), before);
}

#[tokio::test]
async fn test_second_buyer_sees_already_sold() {
    let host = host();
    host.submit(Invocation::InitLedger).await.unwrap();
    host.submit(register("p1")).await.unwrap();
    host.submit(register("p2")).await.unwrap();

    host.submit(buy("AIR-F1", "p1")).await.unwrap();
    let err = host.submit(buy("AIR-F1", "p2")).await.unwrap_err();

    assert!(matches!(err, RegistryError::AlreadySold(ref seat) if seat == "AIR-F1"));
    assert_eq!(read_ticket(&host, "AIR-F1").await.owner_id, "p1");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_buyers_single_winner() {
    let host = Arc::new(host());
    host.submit(Invocation::InitLedger).await.unwrap();

    let buyers: Vec<String> = (0..16).map(|i| format!("p{}", i)).collect();
    for id in &buyers {
        host.submit(register(id)).await.unwrap();
    }

    let mut handles = Vec::new();
    for id in buyers.clone() {
        let host = Arc::clone(&host);
        handles.push(tokio::spawn(async move { host.submit(buy("RAIL-A1", &id)).await }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(RegistryError::AlreadySold(_)) => {}
            Err(RegistryError::Store(StoreError::ReadConflict { key })) => assert_eq!(key, "RAIL-A1"),
            Err(other) => panic!("unexpected failure: {}", other),
        }
    }

    assert_eq!(winners, 1);
    let ticket = read_ticket(&host, "RAIL-A1").await;
    assert_eq!(ticket.status, TicketStatus::Sold);
    assert!(buyers.contains(&ticket.owner_id));
}

#[tokio::test]
async fn test_interleaved_purchase_surfaces_conflict() {
    let host = host();
    host.submit(Invocation::InitLedger).await.unwrap();
    host.submit(register("p1")).await.unwrap();
    host.submit(register("p2")).await.unwrap();

    // Both transactions read the seat before either commits
    let ledger = host.ledger();
    let first = ledger.begin();
    let second = ledger.begin();
    host.registry().buy_ticket(&first, "RAIL-A1", "p1").await.unwrap();
    host.registry().buy_ticket(&second, "RAIL-A1", "p2").await.unwrap();

    ledger.commit(first).unwrap();
    let err = ledger.commit(second).unwrap_err();

    assert_eq!(err, StoreError::ReadConflict { key: "RAIL-A1".to_string() });
    assert_eq!(read_ticket(&host, "RAIL-A1").await.owner_id, "p1");
}

#[tokio::test]
async fn test_reseed_clobbers_sold_seats() {
    let host = host();
    host.submit(Invocation::InitLedger).await.unwrap();
    host.submit(register("p1")).await.unwrap();
    host.submit(buy("RAIL-A1", "p1")).await.unwrap();

    host.submit(Invocation::InitLedger).await.unwrap();

    let ticket = read_ticket(&host, "RAIL-A1").await;
    assert_eq!(ticket, Ticket::available("RAIL-A1", 50, "Railway"));
}

#[tokio::test]
async fn test_namespaced_ledger_layout() {
    let host = host_with(RegistryRules {
        key_scheme: KeyScheme::Namespaced,
        ..RegistryRules::default()
    });
    host.submit(Invocation::InitLedger).await.unwrap();
    host.submit(register("p1")).await.unwrap();
    host.submit(buy("RAIL-A1", "p1")).await.unwrap();

    assert!(host.ledger().committed("RAIL-A1").unwrap().is_none());
    assert!(host.ledger().committed("ticket:RAIL-A1").unwrap().is_some());
    assert_eq!(
        host.ledger().committed("passenger:p1").unwrap().unwrap(),
        br#"{"id":"p1","name":"Rider p1","email":"p1@example.com","registeredTime":"2025-06-01T12:00:00Z"}"#.to_vec()
    );
}

#[tokio::test]
async fn test_call_by_function_name() {
    let host = host();
    let args = |values: &[&str]| values.iter().map(|v| v.to_string()).collect::<Vec<String>>();

    host.call("InitLedger", &[]).await.unwrap();
    host.call("RegisterPassenger", &args(&["p1", "Ada", "ada@example.com"])).await.unwrap();
    host.call("BuyTicket", &args(&["AIR-F1", "p1"])).await.unwrap();

    let payload = host.call("ReadPassenger", &args(&["p1"])).await.unwrap();
    let passenger: serde_json::Value = serde_json::from_slice(&payload).unwrap();
    assert_eq!(passenger["registeredTime"], "2025-06-01T12:00:00Z");

    let err = host.call("CancelTicket", &args(&["AIR-F1"])).await.unwrap_err();
    assert!(matches!(err, RegistryError::UnknownFunction(_)));
}
