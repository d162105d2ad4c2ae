pub mod models;
pub mod pii;

pub use models::{LedgerRecord, Passenger, RecordKind, Ticket, TicketStatus};
pub use pii::Masked;
