use serde::{Deserialize, Serialize};

/// How passenger ids and seat numbers map onto ledger keys.
///
/// `Flat` stores both kinds under their bare id, which is what existing ledgers
/// contain. `Namespaced` prefixes each kind so the two spaces can never collide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyScheme {
    #[default]
    Flat,
    Namespaced,
}

impl KeyScheme {
    pub fn passenger_key(&self, id: &str) -> String {
        match self {
            KeyScheme::Flat => id.to_string(),
            KeyScheme::Namespaced => format!("passenger:{}", id),
        }
    }

    pub fn ticket_key(&self, seat_number: &str) -> String {
        match self {
            KeyScheme::Flat => seat_number.to_string(),
            KeyScheme::Namespaced => format!("ticket:{}", seat_number),
        }
    }
}
