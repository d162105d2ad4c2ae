pub mod app_config;
pub mod host;
pub mod memory;
pub mod redis_repo;

pub use host::{LedgerHost, TransactionalLedger};
pub use memory::{MemoryLedger, MemoryTransaction};
pub use redis_repo::{RedisLedger, RedisTransaction};
