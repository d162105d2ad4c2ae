use serde::{Deserialize, Serialize};
use ticketing_shared::Ticket;
use crate::keys::KeyScheme;

/// Price given to seats created on first purchase
pub const DEFAULT_PRICE: i64 = 100;
/// Org type given to seats created on first purchase
pub const BENCHMARK_ORG_TYPE: &str = "Benchmark";

/// What `init_ledger` does when a seed seat has already been sold
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
    /// Reset every seed seat to AVAILABLE
    #[default]
    Overwrite,
    /// Leave sold seed seats alone
    PreserveSold,
}

/// One entry of the seed table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedTicket {
    pub seat_number: String,
    pub price: i64,
    pub org_type: String,
}

impl SeedTicket {
    pub fn new(seat_number: impl Into<String>, price: i64, org_type: impl Into<String>) -> Self {
        Self {
            seat_number: seat_number.into(),
            price,
            org_type: org_type.into(),
        }
    }

    pub fn to_ticket(&self) -> Ticket {
        Ticket::available(self.seat_number.clone(), self.price, self.org_type.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRules {
    #[serde(default)]
    pub key_scheme: KeyScheme,
    /// Sell unknown seats instead of rejecting them
    #[serde(default = "default_auto_provision")]
    pub auto_provision: bool,
    #[serde(default = "default_price")]
    pub default_price: i64,
    #[serde(default = "default_org_type")]
    pub default_org_type: String,
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    #[serde(default = "default_seed")]
    pub seed: Vec<SeedTicket>,
}

fn default_auto_provision() -> bool { true }

fn default_price() -> i64 { DEFAULT_PRICE }

fn default_org_type() -> String { BENCHMARK_ORG_TYPE.to_string() }

/// Seats installed by `init_ledger` unless configured otherwise
pub fn default_seed() -> Vec<SeedTicket> {
    vec![
        SeedTicket::new("RAIL-A1", 50, "Railway"),
        SeedTicket::new("BUS-101", 20, "Bus"),
        SeedTicket::new("AIR-F1", 200, "Airway"),
    ]
}

impl Default for RegistryRules {
    fn default() -> Self {
        Self {
            key_scheme: KeyScheme::default(),
            auto_provision: default_auto_provision(),
            default_price: default_price(),
            default_org_type: default_org_type(),
            seed_policy: SeedPolicy::default(),
            seed: default_seed(),
        }
    }
}
