use serde::{Deserialize, Serialize};
use crate::pii::Masked;

/// A registered rider. Field order and names match the stored JSON layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    pub id: String,
    pub name: String,
    pub email: Masked<String>,
    /// Kept as stored text so re-encoding never rewrites existing records
    #[serde(rename = "registeredTime")]
    pub registered_time: String,
}

impl Passenger {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        registered_time: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: Masked(email.into()),
            registered_time: registered_time.into(),
        }
    }
}
