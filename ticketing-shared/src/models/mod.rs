pub mod passenger;
pub mod record;
pub mod ticket;

pub use passenger::Passenger;
pub use record::{LedgerRecord, RecordKind};
pub use ticket::{Ticket, TicketStatus};
