use async_trait::async_trait;

use crate::{CreditAccount, CreditError, DecrementOutcome};

/// Persistent home of credit accounts
///
/// `decrement` must be a single conditional read-modify-write: two callers
/// racing on the same account can never both succeed past the balance.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up the account owned by `identity`
    async fn find_by_identity(&self, identity: &str) -> Result<Option<CreditAccount>, CreditError>;

    /// Subtract `cost` from the account if its balance covers it
    async fn decrement(&self, account_id: &str, cost: u64) -> Result<DecrementOutcome, CreditError>;

    /// Check that the store is reachable
    async fn health(&self) -> Result<(), CreditError> {
        Ok(())
    }

    /// Store name for logs
    fn name(&self) -> &str;
}
