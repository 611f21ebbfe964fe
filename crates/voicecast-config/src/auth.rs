use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Caller authentication configuration
///
/// Identity sources are tried in order: static API keys, then the remote key
/// resolver, then the trusted upstream header. A request that matches none of
/// them reaches the handlers without an identity.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// API keys accepted as `Authorization: Bearer <key>`
    #[serde(default)]
    pub api_keys: Vec<StaticKeyConfig>,

    /// Remote API key resolution service
    #[serde(default)]
    pub remote: Option<RemoteAuthConfig>,

    /// Header carrying a user id set by a trusted reverse proxy
    #[serde(default)]
    pub trusted_header: Option<String>,

    /// Paths that skip authentication entirely
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            remote: None,
            trusted_header: None,
            public_paths: default_public_paths(),
        }
    }
}

/// A single locally configured API key
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticKeyConfig {
    /// The raw key presented by clients
    pub key: SecretString,
    /// User the key authenticates as
    pub user_id: String,
}

/// Remote API key resolver configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteAuthConfig {
    /// Base URL of the key resolution service
    pub api_url: Url,

    /// Shared secret sent with every resolution call
    pub gateway_secret: SecretString,

    /// Only bearer tokens with this prefix are sent to the resolver
    #[serde(default)]
    pub key_prefix: Option<String>,

    /// Cache TTL in seconds for resolved keys
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,

    /// Maximum number of cached key resolutions
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
}

const fn default_cache_ttl() -> u64 {
    30
}

const fn default_cache_capacity() -> u64 {
    10_000
}

fn default_public_paths() -> Vec<String> {
    vec!["/health".to_owned()]
}
