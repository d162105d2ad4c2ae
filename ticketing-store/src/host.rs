use async_trait::async_trait;
use tracing::{debug, warn};
use ticketing_core::{Invocation, LedgerStore, RegistryError, RegistryResult, StoreError, TicketRegistry};

/// A ledger that runs registry invocations inside transactions
#[async_trait]
pub trait TransactionalLedger: Send + Sync {
    type Transaction: LedgerStore + 'static;

    async fn begin(&self) -> Result<Self::Transaction, StoreError>;

    /// Apply the transaction's writes if nothing it read has changed.
    /// Returns the ledger height after the commit.
    async fn commit(&self, tx: Self::Transaction) -> Result<u64, StoreError>;
}

/// Plays the platform's role around the registry: one transaction per
/// invocation, committed on success and discarded on any error.
pub struct LedgerHost<L> {
    ledger: L,
    registry: TicketRegistry,
}

impl<L: TransactionalLedger> LedgerHost<L> {
    pub fn new(ledger: L, registry: TicketRegistry) -> Self {
        Self { ledger, registry }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn registry(&self) -> &TicketRegistry {
        &self.registry
    }

    /// Run a state-changing invocation and commit its writes
    pub async fn submit(&self, invocation: Invocation) -> RegistryResult<Vec<u8>> {
        let function = invocation.function_name();
        let tx = self.ledger.begin().await?;

        // Dropping the transaction discards its pending writes
        let payload = self.registry.invoke(&tx, invocation).await?;

        let height = self.ledger.commit(tx).await.map_err(|e| {
            warn!("{} aborted at commit: {}", function, e);
            RegistryError::Store(e)
        })?;

        debug!("{} committed at height {}", function, height);
        Ok(payload)
    }

    /// Run a query against the current ledger state without committing
    pub async fn evaluate(&self, invocation: Invocation) -> RegistryResult<Vec<u8>> {
        if !invocation.is_read_only() {
            return Err(RegistryError::InvalidArgument(format!(
                "{} changes ledger state and must be submitted",
                invocation.function_name()
            )));
        }

        let tx = self.ledger.begin().await?;
        self.registry.invoke(&tx, invocation).await
    }

    /// Dispatch by function name the way the platform does
    pub async fn call(&self, function: &str, args: &[String]) -> RegistryResult<Vec<u8>> {
        let invocation = Invocation::parse(function, args)?;
        if invocation.is_read_only() {
            self.evaluate(invocation).await
        } else {
            self.submit(invocation).await
        }
    }
}
