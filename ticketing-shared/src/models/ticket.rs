use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticket status in the lifecycle. AVAILABLE -> SOLD is the only transition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Available,
    Sold,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Available => "AVAILABLE",
            TicketStatus::Sold => "SOLD",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchasable seat. Field order and names match the stored JSON layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(rename = "seatNumber")]
    pub seat_number: String,
    /// Empty until sold
    #[serde(rename = "ownerID")]
    pub owner_id: String,
    pub price: i64,
    pub status: TicketStatus,
    /// Carrier classification (Railway, Bus, Airway, ...), informational only
    #[serde(rename = "orgType")]
    pub org_type: String,
}

impl Ticket {
    /// Create an unsold ticket
    pub fn available(seat_number: impl Into<String>, price: i64, org_type: impl Into<String>) -> Self {
        Self {
            seat_number: seat_number.into(),
            owner_id: String::new(),
            price,
            status: TicketStatus::Available,
            org_type: org_type.into(),
        }
    }

    pub fn is_sold(&self) -> bool {
        self.status == TicketStatus::Sold
    }

    /// Assign the seat to its owner. Callers check `is_sold` first.
    pub fn mark_sold(&mut self, owner_id: impl Into<String>) {
        self.status = TicketStatus::Sold;
        self.owner_id = owner_id.into();
    }
}
