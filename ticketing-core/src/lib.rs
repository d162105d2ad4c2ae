pub mod clock;
pub mod contract;
pub mod keys;
pub mod registry;
pub mod rules;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use contract::Invocation;
pub use keys::KeyScheme;
pub use registry::TicketRegistry;
pub use rules::{RegistryRules, SeedPolicy, SeedTicket};
pub use store::{LedgerStore, StoreError};

use ticketing_shared::RecordKind;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Store failures pass through untouched, including commit conflicts
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Failed to encode or decode record at key {key}: {source}")]
    Serialization {
        key: String,
        source: serde_json::Error,
    },
    #[error("Passenger {0} already exists")]
    AlreadyExists(String),
    #[error("Passenger {0} does not exist")]
    PassengerNotFound(String),
    #[error("Seat {0} does not exist")]
    TicketNotFound(String),
    #[error("Seat {0} is already sold")]
    AlreadySold(String),
    #[error("Record at key {key} is a {found}, expected a {expected}")]
    WrongRecordKind {
        key: String,
        expected: RecordKind,
        found: RecordKind,
    },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
}

impl RegistryError {
    /// Short stable label, used when tallying failures
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::Store(StoreError::ReadConflict { .. }) => "read_conflict",
            RegistryError::Store(_) => "store",
            RegistryError::Serialization { .. } => "serialization",
            RegistryError::AlreadyExists(_) => "already_exists",
            RegistryError::PassengerNotFound(_) => "passenger_not_found",
            RegistryError::TicketNotFound(_) => "ticket_not_found",
            RegistryError::AlreadySold(_) => "already_sold",
            RegistryError::WrongRecordKind { .. } => "wrong_record_kind",
            RegistryError::InvalidArgument(_) => "invalid_argument",
            RegistryError::UnknownFunction(_) => "unknown_function",
        }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;
