use async_trait::async_trait;
use dashmap::DashMap;
use voicecast_config::SeedAccountConfig;

use crate::{AccountStore, CreditAccount, CreditError, DecrementOutcome};

/// Process-local account store
///
/// Balances live in a `DashMap`; `decrement` checks and subtracts while
/// holding the entry's shard write lock, which makes it atomic with respect to
/// every other access to the same account.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Account id to account
    accounts: DashMap<String, CreditAccount>,
    /// Identity to account id
    by_identity: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding the configured seed accounts
    ///
    /// The first seed for an account id wins; later ones never replace it.
    pub fn seeded(accounts: &[SeedAccountConfig]) -> Self {
        let store = Self::new();

        for seed in accounts {
            let id = seed.account_id().to_owned();

            if store.accounts.contains_key(&id) {
                tracing::warn!(account_id = %id, identity = %seed.identity, "ignoring duplicate seed account");
                continue;
            }

            store.by_identity.insert(seed.identity.clone(), id.clone());
            store.accounts.insert(
                id.clone(),
                CreditAccount {
                    id,
                    identity: seed.identity.clone(),
                    balance: seed.balance,
                },
            );
        }

        store
    }

    /// Current balance of the account owned by `identity`
    pub fn balance_of(&self, identity: &str) -> Option<u64> {
        let id = self.by_identity.get(identity)?;
        self.accounts.get(id.value()).map(|account| account.balance)
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_by_identity(&self, identity: &str) -> Result<Option<CreditAccount>, CreditError> {
        let Some(id) = self.by_identity.get(identity).map(|id| id.value().clone()) else {
            return Ok(None);
        };

        Ok(self.accounts.get(&id).map(|account| account.clone()))
    }

    async fn decrement(&self, account_id: &str, cost: u64) -> Result<DecrementOutcome, CreditError> {
        let mut account = self
            .accounts
            .get_mut(account_id)
            .ok_or_else(|| CreditError::AccountNotFound(account_id.to_owned()))?;

        match account.balance.checked_sub(cost) {
            Some(balance) => {
                account.balance = balance;
                Ok(DecrementOutcome::Applied { balance })
            }
            None => Ok(DecrementOutcome::Refused),
        }
    }

    fn name(&self) -> &str {
        "memory"
    }
}
