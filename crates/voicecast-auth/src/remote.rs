use std::sync::Arc;
use std::time::Duration;

use mini_moka::sync::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::{AuthError, sha256_hex};

/// Key owner as reported by the key service
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedKey {
    /// User that owns the key
    pub user_id: String,
    /// Key record id, for audit logs
    #[serde(default)]
    pub api_key_id: Option<String>,
}

/// Resolves API keys through the remote key service, with a TTL cache
#[derive(Clone)]
pub struct ApiKeyResolver {
    http: reqwest::Client,
    api_url: url::Url,
    gateway_secret: SecretString,
    cache: Cache<String, Arc<ResolvedKey>>,
}

impl ApiKeyResolver {
    /// Create a new resolver
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(
        api_url: url::Url,
        gateway_secret: SecretString,
        cache_ttl: Duration,
        cache_capacity: u64,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(Duration::from_secs(5)).build()?;

        let cache = Cache::builder()
            .time_to_live(cache_ttl)
            .max_capacity(cache_capacity)
            .build();

        Ok(Self {
            http,
            api_url,
            gateway_secret,
            cache,
        })
    }

    /// Resolve an API key to its owner
    ///
    /// Successful resolutions are cached for the configured TTL; failures
    /// are not cached.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the key is unknown, expired, or the service is
    /// unreachable
    pub async fn resolve(&self, raw_key: &str) -> Result<Arc<ResolvedKey>, AuthError> {
        let cache_key = sha256_hex(raw_key);

        if let Some(cached) = self.cache.get(&cache_key) {
            return Ok(cached);
        }

        let url = self
            .api_url
            .join("internal/resolve-key")
            .map_err(|e| AuthError::ApiError {
                status: 0,
                message: e.to_string(),
            })?;

        let response = self
            .http
            .post(url)
            .header("X-Gateway-Secret", self.gateway_secret.expose_secret())
            .json(&serde_json::json!({ "key": raw_key }))
            .send()
            .await?;

        let status = response.status();

        match status.as_u16() {
            404 => return Err(AuthError::InvalidKey),
            410 => return Err(AuthError::ExpiredKey),
            _ if !status.is_success() => {
                let message = response.text().await.unwrap_or_default();
                return Err(AuthError::ApiError {
                    status: status.as_u16(),
                    message,
                });
            }
            _ => {}
        }

        let resolved: ResolvedKey = response.json().await.map_err(|e| AuthError::ApiError {
            status: 0,
            message: format!("failed to parse response: {e}"),
        })?;

        tracing::debug!(user_id = %resolved.user_id, "resolved remote API key");

        let resolved = Arc::new(resolved);
        self.cache.insert(cache_key, Arc::clone(&resolved));

        Ok(resolved)
    }

    /// Drop a cached resolution, e.g. after the key was revoked
    pub fn invalidate(&self, raw_key: &str) {
        self.cache.invalidate(&sha256_hex(raw_key));
    }
}

impl std::fmt::Debug for ApiKeyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyResolver")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}
