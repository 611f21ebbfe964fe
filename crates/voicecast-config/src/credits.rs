use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Credit accounting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreditsConfig {
    /// Credits charged per successful synthesis
    #[serde(default = "default_cost")]
    pub cost: u64,
    /// Backing store for credit accounts
    #[serde(default)]
    pub store: CreditStoreType,
    /// Seed accounts for the in-memory store
    #[serde(default)]
    pub accounts: Vec<SeedAccountConfig>,
    /// Remote billing service, required when `store = "aether"`
    #[serde(default)]
    pub aether: Option<AetherConfig>,
}

impl Default for CreditsConfig {
    fn default() -> Self {
        Self {
            cost: default_cost(),
            store: CreditStoreType::default(),
            accounts: Vec::new(),
            aether: None,
        }
    }
}

/// Supported account stores
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CreditStoreType {
    /// Process-local accounts seeded from configuration
    #[default]
    Memory,
    /// Aether billing service
    Aether,
}

/// Account created at startup in the in-memory store
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedAccountConfig {
    /// User reference the account belongs to
    pub identity: String,
    /// Account id, defaults to the identity
    #[serde(default)]
    pub id: Option<String>,
    /// Starting balance
    #[serde(default)]
    pub balance: u64,
}

impl SeedAccountConfig {
    /// Explicit account id, or the identity when none is set
    pub fn account_id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.identity)
    }
}

/// Aether billing service connection
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AetherConfig {
    /// Base URL for the Aether billing API
    pub url: Url,
    /// Service API key for authenticating with Aether
    pub service_api_key: SecretString,
    /// Aether application identifier
    pub app_id: String,
    /// Entity type accounts are registered under
    #[serde(default = "default_entity_type")]
    pub entity_type: String,
}

const fn default_cost() -> u64 {
    1
}

fn default_entity_type() -> String {
    "user".to_owned()
}
