use std::time::Duration;

use http::{HeaderMap, HeaderName};
use voicecast_config::AuthConfig;
use voicecast_core::{Identity, IdentitySource};

use crate::{ApiKeyResolver, AuthError, StaticKeys};

/// Establishes the caller identity for a request
///
/// A bearer token is checked against the static key table first, then the
/// remote resolver. Without a bearer token the trusted proxy header is
/// consulted. No credentials at all yields `Ok(None)`, leaving the decision
/// to the handler.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    static_keys: StaticKeys,
    remote: Option<RemoteKeys>,
    trusted_header: Option<HeaderName>,
}

#[derive(Debug, Clone)]
struct RemoteKeys {
    resolver: ApiKeyResolver,
    key_prefix: Option<String>,
}

impl IdentityResolver {
    /// Build the resolver from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the trusted header name is invalid or the remote
    /// resolver's HTTP client cannot be built
    pub fn from_config(config: &AuthConfig) -> anyhow::Result<Self> {
        let remote = match config.remote {
            Some(ref remote) => Some(RemoteKeys {
                resolver: ApiKeyResolver::new(
                    remote.api_url.clone(),
                    remote.gateway_secret.clone(),
                    Duration::from_secs(remote.cache_ttl_seconds),
                    remote.cache_capacity,
                )?,
                key_prefix: remote.key_prefix.clone(),
            }),
            None => None,
        };

        let trusted_header = config
            .trusted_header
            .as_deref()
            .map(|name| {
                HeaderName::try_from(name.to_ascii_lowercase())
                    .map_err(|e| anyhow::anyhow!("invalid auth.trusted_header '{name}': {e}"))
            })
            .transpose()?;

        Ok(Self {
            static_keys: StaticKeys::new(&config.api_keys),
            remote,
            trusted_header,
        })
    }

    /// Whether any identity source is configured
    pub fn is_configured(&self) -> bool {
        !self.static_keys.is_empty() || self.remote.is_some() || self.trusted_header.is_some()
    }

    /// Identify the caller from request headers
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidKey` for a bearer token no source accepts,
    /// or the remote resolver's error
    pub async fn identify(&self, headers: &HeaderMap) -> Result<Option<Identity>, AuthError> {
        if let Some(token) = bearer_token(headers) {
            return self.identify_token(token).await.map(Some);
        }

        let forwarded = self
            .trusted_header
            .as_ref()
            .and_then(|name| headers.get(name))
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        Ok(forwarded.map(|user_id| Identity::new(user_id, IdentitySource::TrustedHeader)))
    }

    async fn identify_token(&self, token: &str) -> Result<Identity, AuthError> {
        if let Some(user_id) = self.static_keys.lookup(token) {
            return Ok(Identity::new(user_id, IdentitySource::StaticKey));
        }

        let Some(ref remote) = self.remote else {
            return Err(AuthError::InvalidKey);
        };

        if let Some(ref prefix) = remote.key_prefix
            && !token.starts_with(prefix.as_str())
        {
            return Err(AuthError::InvalidKey);
        }

        let resolved = remote.resolver.resolve(token).await?;

        Ok(Identity::new(resolved.user_id.clone(), IdentitySource::RemoteKey))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
