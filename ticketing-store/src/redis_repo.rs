use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, error, info, warn};
use ticketing_core::{LedgerStore, StoreError};
use crate::host::TransactionalLedger;

/// Validates the read set and applies the write set in one step.
///
/// KEYS[1] is the height counter, then the read keys, then the write keys.
/// ARGV[1] is the read count, then a (present flag, value) pair per read,
/// then one value per write. Returns the new height, or `-i` when the i-th
/// read no longer matches.
const COMMIT_SCRIPT: &str = r#"
    local reads = tonumber(ARGV[1])
    local arg = 2
    for i = 1, reads do
        local present = ARGV[arg]
        local expected = ARGV[arg + 1]
        arg = arg + 2
        local current = redis.call("GET", KEYS[i + 1])
        if present == "0" then
            if current then
                return -i
            end
        elseif current ~= expected then
            return -i
        end
    end
    if #KEYS == reads + 1 then
        return tonumber(redis.call("GET", KEYS[1]) or "0")
    end
    for i = reads + 2, #KEYS do
        redis.call("SET", KEYS[i], ARGV[arg])
        arg = arg + 1
    end
    return redis.call("INCR", KEYS[1])
"#;

/// Ledger kept in Redis under `<namespace>:<key>`
#[derive(Clone)]
pub struct RedisLedger {
    client: redis::Client,
    namespace: String,
}

impl RedisLedger {
    pub async fn new(connection_string: &str, namespace: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        info!("Redis ledger configured under namespace {}", namespace);
        Ok(Self {
            client,
            namespace: namespace.to_string(),
        })
    }

    fn height_key(&self) -> String {
        format!("{}#height", self.namespace)
    }
}

#[async_trait]
impl TransactionalLedger for RedisLedger {
    type Transaction = RedisTransaction;

    async fn begin(&self) -> Result<RedisTransaction, StoreError> {
        let conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| {
                error!("Failed to connect to Redis: {}", e);
                StoreError::Unavailable(e.to_string())
            })?;

        Ok(RedisTransaction {
            conn,
            namespace: self.namespace.clone(),
            reads: Mutex::new(HashMap::new()),
            writes: Mutex::new(BTreeMap::new()),
        })
    }

    async fn commit(&self, tx: RedisTransaction) -> Result<u64, StoreError> {
        let reads = tx.reads.into_inner().map_err(poisoned)?;
        let writes = tx.writes.into_inner().map_err(poisoned)?;
        let mut conn = tx.conn;

        let script = redis::Script::new(COMMIT_SCRIPT);
        let mut invocation = script.prepare_invoke();
        invocation.key(self.height_key());

        let read_keys: Vec<String> = reads.keys().cloned().collect();
        for key in &read_keys {
            invocation.key(namespaced(&tx.namespace, key));
        }
        for key in writes.keys() {
            invocation.key(namespaced(&tx.namespace, key));
        }

        invocation.arg(read_keys.len());
        for key in &read_keys {
            match &reads[key] {
                Some(value) => invocation.arg("1").arg(value.as_slice()),
                None => invocation.arg("0").arg(""),
            };
        }
        for value in writes.values() {
            invocation.arg(value.as_slice());
        }

        let outcome: i64 = invocation.invoke_async(&mut conn).await.map_err(backend)?;

        if outcome < 0 {
            let index = (-outcome - 1) as usize;
            let key = read_keys.get(index).cloned().unwrap_or_default();
            warn!("Commit aborted, {} changed since it was read", key);
            return Err(StoreError::ReadConflict { key });
        }

        debug!("Committed {} writes at height {}", writes.len(), outcome);
        Ok(outcome as u64)
    }
}

/// One transaction's view of a `RedisLedger`
pub struct RedisTransaction {
    conn: MultiplexedConnection,
    namespace: String,
    /// key -> value seen on first read
    reads: Mutex<HashMap<String, Option<Vec<u8>>>>,
    writes: Mutex<BTreeMap<String, Vec<u8>>>,
}

#[async_trait]
impl LedgerStore for RedisTransaction {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let pending = self.writes.lock().map_err(poisoned)?.get(key).cloned();
        if let Some(value) = pending {
            return Ok(Some(value));
        }

        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(namespaced(&self.namespace, key)).await.map_err(backend)?;

        self.reads
            .lock()
            .map_err(poisoned)?
            .entry(key.to_string())
            .or_insert_with(|| value.clone());

        Ok(value)
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.writes.lock().map_err(poisoned)?.insert(key.to_string(), value);
        Ok(())
    }
}

fn namespaced(namespace: &str, key: &str) -> String {
    format!("{}:{}", namespace, key)
}

fn backend(e: redis::RedisError) -> StoreError {
    error!("Redis ledger error: {}", e);
    StoreError::Backend(e.to_string())
}

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Backend("transaction lock poisoned".to_string())
}
