use serde::{Deserialize, Serialize};
use std::fmt;
use super::{Passenger, Ticket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Passenger,
    Ticket,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Passenger => f.write_str("passenger"),
            RecordKind::Ticket => f.write_str("ticket"),
        }
    }
}

/// Any value stored in the ledger keyspace.
///
/// The stored JSON carries no type tag; the two record shapes have disjoint
/// field sets, so the variant is recovered from the fields that are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LedgerRecord {
    Ticket(Ticket),
    Passenger(Passenger),
}

impl LedgerRecord {
    pub fn decode(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            LedgerRecord::Ticket(_) => RecordKind::Ticket,
            LedgerRecord::Passenger(_) => RecordKind::Passenger,
        }
    }

    /// Returns the ticket, or the kind actually found
    pub fn into_ticket(self) -> Result<Ticket, RecordKind> {
        match self {
            LedgerRecord::Ticket(ticket) => Ok(ticket),
            other => Err(other.kind()),
        }
    }

    /// Returns the passenger, or the kind actually found
    pub fn into_passenger(self) -> Result<Passenger, RecordKind> {
        match self {
            LedgerRecord::Passenger(passenger) => Ok(passenger),
            other => Err(other.kind()),
        }
    }
}

impl From<Ticket> for LedgerRecord {
    fn from(ticket: Ticket) -> Self {
        LedgerRecord::Ticket(ticket)
    }
}

impl From<Passenger> for LedgerRecord {
    fn from(passenger: Passenger) -> Self {
        LedgerRecord::Passenger(passenger)
    }
}
