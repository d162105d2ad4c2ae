use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, warn};
use ticketing_core::{LedgerStore, StoreError};
use crate::host::TransactionalLedger;

#[derive(Debug, Clone)]
struct Versioned {
    value: Vec<u8>,
    /// Ledger height of the commit that wrote this value
    version: u64,
}

#[derive(Debug, Default)]
struct LedgerState {
    entries: HashMap<String, Versioned>,
    height: u64,
}

/// In-process versioned key-value ledger with optimistic concurrency.
///
/// Transactions read committed state and buffer their writes. At commit the
/// version of every key a transaction read is compared against the current
/// one; any difference aborts the commit with `StoreError::ReadConflict`.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    state: Arc<RwLock<LedgerState>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commits that carried at least one write
    pub fn height(&self) -> Result<u64, StoreError> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.height)
    }

    /// Committed value at `key`, outside any transaction
    pub fn committed(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.entries.get(key).map(|entry| entry.value.clone()))
    }

    pub fn begin(&self) -> MemoryTransaction {
        MemoryTransaction {
            state: Arc::clone(&self.state),
            reads: Mutex::new(HashMap::new()),
            writes: Mutex::new(BTreeMap::new()),
        }
    }

    /// Validate the read set and apply the write set atomically.
    /// Returns the height the writes landed at.
    pub fn commit(&self, tx: MemoryTransaction) -> Result<u64, StoreError> {
        let reads = tx.reads.into_inner().map_err(poisoned)?;
        let writes = tx.writes.into_inner().map_err(poisoned)?;

        let mut state = self.state.write().map_err(poisoned)?;

        for (key, observed) in &reads {
            let current = state.entries.get(key).map(|entry| entry.version);
            if current != *observed {
                warn!("Commit aborted, {} changed since it was read", key);
                return Err(StoreError::ReadConflict { key: key.clone() });
            }
        }

        if writes.is_empty() {
            return Ok(state.height);
        }

        state.height += 1;
        let height = state.height;
        let count = writes.len();
        for (key, value) in writes {
            state.entries.insert(key, Versioned { value, version: height });
        }

        debug!("Committed {} writes at height {}", count, height);
        Ok(height)
    }
}

#[async_trait]
impl TransactionalLedger for MemoryLedger {
    type Transaction = MemoryTransaction;

    async fn begin(&self) -> Result<MemoryTransaction, StoreError> {
        Ok(MemoryLedger::begin(self))
    }

    async fn commit(&self, tx: MemoryTransaction) -> Result<u64, StoreError> {
        MemoryLedger::commit(self, tx)
    }
}

/// One transaction's view of a `MemoryLedger`
pub struct MemoryTransaction {
    state: Arc<RwLock<LedgerState>>,
    /// key -> version seen on first read, `None` when absent
    reads: Mutex<HashMap<String, Option<u64>>>,
    writes: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryTransaction {
    pub fn read_keys(&self) -> Result<Vec<String>, StoreError> {
        let reads = self.reads.lock().map_err(poisoned)?;
        let mut keys: Vec<String> = reads.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    pub fn write_keys(&self) -> Result<Vec<String>, StoreError> {
        let writes = self.writes.lock().map_err(poisoned)?;
        Ok(writes.keys().cloned().collect())
    }
}

#[async_trait]
impl LedgerStore for MemoryTransaction {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        // Own writes win and are not part of the read set
        let pending = self.writes.lock().map_err(poisoned)?.get(key).cloned();
        if let Some(value) = pending {
            return Ok(Some(value));
        }

        let entry = {
            let state = self.state.read().map_err(poisoned)?;
            state.entries.get(key).cloned()
        };

        self.reads
            .lock()
            .map_err(poisoned)?
            .entry(key.to_string())
            .or_insert(entry.as_ref().map(|e| e.version));

        Ok(entry.map(|e| e.value))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.writes.lock().map_err(poisoned)?.insert(key.to_string(), value);
        Ok(())
    }
}

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Backend("ledger lock poisoned".to_string())
}
