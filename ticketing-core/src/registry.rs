use std::sync::Arc;
use tracing::{debug, info, warn};
use ticketing_shared::{LedgerRecord, Passenger, RecordKind, Ticket};
use crate::clock::{format_timestamp, Clock, SystemClock};
use crate::contract::Invocation;
use crate::rules::{RegistryRules, SeedPolicy};
use crate::store::LedgerStore;
use crate::{RegistryError, RegistryResult};

/// Transition logic for passengers and tickets.
///
/// Holds no ledger state. Every operation reads what it needs from the
/// supplied store, finishes all of its reads before its first write, and
/// leaves commit or abort to the host.
pub struct TicketRegistry {
    rules: RegistryRules,
    clock: Arc<dyn Clock>,
}

impl TicketRegistry {
    pub fn new(rules: RegistryRules, clock: Arc<dyn Clock>) -> Self {
        Self { rules, clock }
    }

    pub fn with_system_clock(rules: RegistryRules) -> Self {
        Self::new(rules, Arc::new(SystemClock))
    }

    pub fn rules(&self) -> &RegistryRules {
        &self.rules
    }

    /// Install the seed table.
    ///
    /// With `SeedPolicy::Overwrite` every seed seat is reset to AVAILABLE,
    /// including seats that were already sold.
    pub async fn init_ledger<S: LedgerStore + ?Sized>(&self, store: &S) -> RegistryResult<()> {
        let scheme = self.rules.key_scheme;
        let mut pending = Vec::with_capacity(self.rules.seed.len());

        for seed in &self.rules.seed {
            let key = scheme.ticket_key(&seed.seat_number);

            if self.rules.seed_policy == SeedPolicy::PreserveSold {
                if let Some(record) = self.read_record(store, &key).await? {
                    let existing = expect_ticket(&key, record)?;
                    if existing.is_sold() {
                        debug!("Seed seat {} already sold, keeping it", seed.seat_number);
                        continue;
                    }
                }
            }

            pending.push((key, seed.to_ticket()));
        }

        let written = pending.len();
        for (key, ticket) in pending {
            self.write_record(store, &key, &LedgerRecord::Ticket(ticket)).await?;
        }

        info!("Ledger seeded with {} of {} tickets", written, self.rules.seed.len());
        Ok(())
    }

    /// Create a passenger record. Any record already stored at the key counts
    /// as a duplicate, whatever its kind.
    pub async fn register_passenger<S: LedgerStore + ?Sized>(
        &self,
        store: &S,
        id: &str,
        name: &str,
        email: &str,
    ) -> RegistryResult<Passenger> {
        require_non_empty("passenger id", id)?;

        let key = self.rules.key_scheme.passenger_key(id);
        if store.get(&key).await?.is_some() {
            warn!("Rejected registration, passenger {} already exists", id);
            return Err(RegistryError::AlreadyExists(id.to_string()));
        }

        let passenger = Passenger::new(id, name, email, format_timestamp(self.clock.now()));
        self.write_record(store, &key, &LedgerRecord::Passenger(passenger.clone())).await?;

        info!("Passenger {} registered", id);
        Ok(passenger)
    }

    /// Sell a seat to a registered passenger: AVAILABLE -> SOLD.
    pub async fn buy_ticket<S: LedgerStore + ?Sized>(
        &self,
        store: &S,
        seat_number: &str,
        passenger_id: &str,
    ) -> RegistryResult<Ticket> {
        require_non_empty("seat number", seat_number)?;
        require_non_empty("passenger id", passenger_id)?;

        // 1. Passenger must exist and actually be a passenger
        let passenger_key = self.rules.key_scheme.passenger_key(passenger_id);
        match self.read_record(store, &passenger_key).await? {
            Some(record) => {
                expect_passenger(&passenger_key, record)?;
            }
            None => {
                warn!("Rejected purchase of {}, passenger {} does not exist", seat_number, passenger_id);
                return Err(RegistryError::PassengerNotFound(passenger_id.to_string()));
            }
        }

        // 2. Load the seat, or provision it on first reference
        let seat_key = self.rules.key_scheme.ticket_key(seat_number);
        let mut ticket = match self.read_record(store, &seat_key).await? {
            Some(record) => expect_ticket(&seat_key, record)?,
            None if self.rules.auto_provision => {
                debug!("Auto-provisioning seat {}", seat_number);
                Ticket::available(seat_number, self.rules.default_price, self.rules.default_org_type.clone())
            }
            None => return Err(RegistryError::TicketNotFound(seat_number.to_string())),
        };

        // 3. SOLD is terminal
        if ticket.is_sold() {
            warn!("Rejected purchase of {}, already sold", seat_number);
            return Err(RegistryError::AlreadySold(seat_number.to_string()));
        }

        // 4. Transition and write back
        ticket.mark_sold(passenger_id);
        self.write_record(store, &seat_key, &LedgerRecord::Ticket(ticket.clone())).await?;

        info!("Seat {} sold to {}", seat_number, passenger_id);
        Ok(ticket)
    }

    pub async fn read_ticket<S: LedgerStore + ?Sized>(&self, store: &S, seat_number: &str) -> RegistryResult<Ticket> {
        let key = self.rules.key_scheme.ticket_key(seat_number);
        match self.read_record(store, &key).await? {
            Some(record) => expect_ticket(&key, record),
            None => Err(RegistryError::TicketNotFound(seat_number.to_string())),
        }
    }

    pub async fn read_passenger<S: LedgerStore + ?Sized>(&self, store: &S, id: &str) -> RegistryResult<Passenger> {
        let key = self.rules.key_scheme.passenger_key(id);
        match self.read_record(store, &key).await? {
            Some(record) => expect_passenger(&key, record),
            None => Err(RegistryError::PassengerNotFound(id.to_string())),
        }
    }

    /// Run a decoded host request. Queries return the JSON record, submits
    /// return an empty payload.
    pub async fn invoke<S: LedgerStore + ?Sized>(&self, store: &S, invocation: Invocation) -> RegistryResult<Vec<u8>> {
        debug!("Invoking {}", invocation.function_name());

        match invocation {
            Invocation::InitLedger => {
                self.init_ledger(store).await?;
                Ok(Vec::new())
            }
            Invocation::RegisterPassenger { id, name, email } => {
                self.register_passenger(store, &id, &name, &email).await?;
                Ok(Vec::new())
            }
            Invocation::BuyTicket { seat_number, passenger_id } => {
                self.buy_ticket(store, &seat_number, &passenger_id).await?;
                Ok(Vec::new())
            }
            Invocation::ReadTicket { seat_number } => {
                let ticket = self.read_ticket(store, &seat_number).await?;
                encode(&seat_number, &LedgerRecord::Ticket(ticket))
            }
            Invocation::ReadPassenger { id } => {
                let passenger = self.read_passenger(store, &id).await?;
                encode(&id, &LedgerRecord::Passenger(passenger))
            }
        }
    }

    async fn read_record<S: LedgerStore + ?Sized>(&self, store: &S, key: &str) -> RegistryResult<Option<LedgerRecord>> {
        match store.get(key).await? {
            Some(bytes) => LedgerRecord::decode(&bytes)
                .map(Some)
                .map_err(|source| RegistryError::Serialization { key: key.to_string(), source }),
            None => Ok(None),
        }
    }

    async fn write_record<S: LedgerStore + ?Sized>(&self, store: &S, key: &str, record: &LedgerRecord) -> RegistryResult<()> {
        let bytes = encode(key, record)?;
        store.put(key, bytes).await?;
        Ok(())
    }
}

fn encode(key: &str, record: &LedgerRecord) -> RegistryResult<Vec<u8>> {
    record
        .encode()
        .map_err(|source| RegistryError::Serialization { key: key.to_string(), source })
}

fn expect_ticket(key: &str, record: LedgerRecord) -> RegistryResult<Ticket> {
    record.into_ticket().map_err(|found| RegistryError::WrongRecordKind {
        key: key.to_string(),
        expected: RecordKind::Ticket,
        found,
    })
}

fn expect_passenger(key: &str, record: LedgerRecord) -> RegistryResult<Passenger> {
    record.into_passenger().map_err(|found| RegistryError::WrongRecordKind {
        key: key.to_string(),
        expected: RecordKind::Passenger,
        found,
    })
}

fn require_non_empty(field: &str, value: &str) -> RegistryResult<()> {
    if value.is_empty() {
        return Err(RegistryError::InvalidArgument(format!("{} must not be empty", field)));
    }
    Ok(())
}
