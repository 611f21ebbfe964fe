use std::sync::Arc;

use voicecast_config::{CreditStoreType, CreditsConfig};

use crate::{AccountStore, AetherStore, CreditAccount, CreditError, DecrementOutcome, MemoryStore};

/// Gate in front of the paid synthesis call
///
/// `check` runs before the provider is contacted, `settle` after the audio
/// has been produced. Only `settle` mutates the balance, and it does so with
/// the store's conditional decrement, so a caller that passed `check`
/// concurrently with another can still be refused here.
#[derive(Clone)]
pub struct CreditGuard {
    store: Arc<dyn AccountStore>,
    cost: u64,
}

impl CreditGuard {
    pub fn new(store: Arc<dyn AccountStore>, cost: u64) -> Self {
        Self { store, cost }
    }

    /// Build the guard and its store from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the remote store is selected but not configured,
    /// or its HTTP client cannot be built
    pub fn from_config(config: &CreditsConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn AccountStore> = match config.store {
            CreditStoreType::Memory => {
                tracing::debug!("Seeding in-memory credit store with {} account(s)", config.accounts.len());
                Arc::new(MemoryStore::seeded(&config.accounts))
            }
            CreditStoreType::Aether => {
                let aether = config
                    .aether
                    .as_ref()
                    .ok_or_else(|| anyhow::anyhow!("credits.aether must be configured for the aether store"))?;

                Arc::new(AetherStore::new(
                    aether.url.clone(),
                    aether.app_id.clone(),
                    aether.entity_type.clone(),
                    aether.service_api_key.clone(),
                )?)
            }
        };

        Ok(Self::new(store, config.cost))
    }

    /// Credits charged per synthesis
    pub const fn cost(&self) -> u64 {
        self.cost
    }

    /// Name of the backing store
    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Check that the backing store is reachable
    ///
    /// # Errors
    ///
    /// Returns the store's error if it cannot be reached
    pub async fn health(&self) -> Result<(), CreditError> {
        self.store.health().await
    }

    /// Whether `identity` can currently afford one synthesis
    ///
    /// Side-effect free. An identity without an account, or a store that
    /// cannot be reached, is denied.
    pub async fn authorize(&self, identity: &str) -> bool {
        match self.check(identity).await {
            Ok(_) => true,
            Err(CreditError::AccountNotFound(_) | CreditError::InsufficientCredits { .. }) => false,
            Err(e) => {
                tracing::warn!(identity, error = %e, "credit authorization failed, denying");
                false
            }
        }
    }

    /// Resolve the account for `identity` and confirm it covers the cost
    ///
    /// # Errors
    ///
    /// `AccountNotFound` when the identity has no account,
    /// `InsufficientCredits` when the balance is below the cost, or a store
    /// error
    pub async fn check(&self, identity: &str) -> Result<CreditAccount, CreditError> {
        let account = self
            .store
            .find_by_identity(identity)
            .await?
            .ok_or_else(|| CreditError::AccountNotFound(identity.to_owned()))?;

        if account.balance < self.cost {
            return Err(CreditError::InsufficientCredits {
                balance: account.balance,
                cost: self.cost,
            });
        }

        Ok(account)
    }

    /// Conditionally subtract `cost` from the account owned by `identity`
    ///
    /// Returns `false` when the identity has no account or the balance does
    /// not cover the cost; the balance is unchanged in both cases.
    ///
    /// # Errors
    ///
    /// Returns a store error if the store cannot be reached
    pub async fn decrement(&self, identity: &str, cost: u64) -> Result<bool, CreditError> {
        let Some(account) = self.store.find_by_identity(identity).await? else {
            return Ok(false);
        };

        match self.store.decrement(&account.id, cost).await {
            Ok(DecrementOutcome::Applied { .. }) => Ok(true),
            Ok(DecrementOutcome::Refused) | Err(CreditError::AccountNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Charge the configured cost to an account that passed `check`
    ///
    /// # Errors
    ///
    /// `SettlementRefused` if the balance no longer covers the cost, or a
    /// store error
    pub async fn settle(&self, account: &CreditAccount) -> Result<u64, CreditError> {
        match self.store.decrement(&account.id, self.cost).await? {
            DecrementOutcome::Applied { balance } => {
                tracing::debug!(account_id = %account.id, balance, "settled synthesis charge");
                Ok(balance)
            }
            DecrementOutcome::Refused => Err(CreditError::SettlementRefused {
                account_id: account.id.clone(),
            }),
        }
    }

    /// Current balance for `identity`, zero when it has no account
    ///
    /// # Errors
    ///
    /// Returns a store error if the store cannot be reached
    pub async fn balance(&self, identity: &str) -> Result<u64, CreditError> {
        Ok(self
            .store
            .find_by_identity(identity)
            .await?
            .map_or(0, |account| account.balance))
    }
}

impl std::fmt::Debug for CreditGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreditGuard")
            .field("store", &self.store.name())
            .field("cost", &self.cost)
            .finish()
    }
}
