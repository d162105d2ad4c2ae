use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Ledger backend failure: {0}")]
    Backend(String),
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
    #[error("Read conflict on key {key}: value changed after it was read")]
    ReadConflict { key: String },
}

/// Key-value view of the ledger, scoped to a single transaction.
///
/// Reads see the host's snapshot plus this transaction's own pending writes.
/// Writes become durable only if the host commits the transaction.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Returns `None` when the key holds no value
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;
}
