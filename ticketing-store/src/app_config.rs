use serde::Deserialize;
use std::env;
use ticketing_core::RegistryRules;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub registry: RegistryRules,
    pub bench: BenchConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LedgerBackend {
    Memory,
    Redis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LedgerConfig {
    pub backend: LedgerBackend,
    pub redis: Option<RedisConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_namespace() -> String { "ticketing".to_string() }

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadKind {
    /// Random passenger registrations
    Register,
    /// Each worker buys fresh, auto-provisioned seats
    Buy,
    /// Every worker races for the same seed seat
    Contention,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BenchConfig {
    pub workers: usize,
    pub transactions_per_worker: usize,
    #[serde(default = "default_rounds")]
    pub rounds: Vec<WorkloadKind>,
    /// Seat used by the contention round
    #[serde(default = "default_contended_seat")]
    pub contended_seat: String,
}

fn default_rounds() -> Vec<WorkloadKind> {
    vec![WorkloadKind::Register, WorkloadKind::Buy, WorkloadKind::Contention]
}

fn default_contended_seat() -> String { "RAIL-A1".to_string() }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Layered load: `<dir>/default`, then `<dir>/<RUN_MODE>` and
    /// `<dir>/local` when present, then `TICKETING__*` environment variables.
    pub fn load_from(dir: &str) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name(&format!("{}/default", dir)))
            .add_source(config::File::with_name(&format!("{}/{}", dir, run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name(&format!("{}/local", dir)).required(false))
            // e.g. TICKETING__LEDGER__BACKEND=redis
            .add_source(config::Environment::with_prefix("TICKETING").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
