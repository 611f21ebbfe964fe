use std::path::Path;

use secrecy::ExposeSecret;

use crate::{Config, CreditStoreType};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if no TTS provider is usable, the credit store is
    /// incomplete, or auth and podcast settings are malformed
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_tts_config()?;
        self.validate_credits_config()?;
        self.validate_auth_config()?;
        self.validate_podcast_config()?;
        Ok(())
    }

    /// Ensure at least one provider exists and every provider has a key
    fn validate_tts_config(&self) -> anyhow::Result<()> {
        if self.tts.providers.is_empty() {
            anyhow::bail!("at least one TTS provider must be configured");
        }

        for (name, provider) in &self.tts.providers {
            let has_key = provider
                .api_key
                .as_ref()
                .is_some_and(|key| !key.expose_secret().is_empty());

            if !has_key {
                anyhow::bail!("TTS provider '{name}' has no api_key configured");
            }
        }

        Ok(())
    }

    fn validate_credits_config(&self) -> anyhow::Result<()> {
        if self.credits.cost == 0 {
            anyhow::bail!("credits.cost must be greater than 0");
        }

        match self.credits.store {
            CreditStoreType::Memory => {
                let mut identities = std::collections::HashSet::new();
                let mut ids = std::collections::HashSet::new();
                for account in &self.credits.accounts {
                    if !identities.insert(account.identity.as_str()) {
                        anyhow::bail!("duplicate credit account for identity '{}'", account.identity);
                    }

                    if !ids.insert(account.account_id()) {
                        anyhow::bail!("duplicate credit account id '{}'", account.account_id());
                    }
                }
            }
            CreditStoreType::Aether => {
                let Some(ref aether) = self.credits.aether else {
                    anyhow::bail!("credits.store = \"aether\" requires a [credits.aether] section");
                };

                if aether.service_api_key.expose_secret().is_empty() {
                    anyhow::bail!("credits.aether.service_api_key must not be empty");
                }

                if !self.credits.accounts.is_empty() {
                    anyhow::bail!("credits.accounts only applies to the memory store");
                }
            }
        }

        Ok(())
    }

    fn validate_auth_config(&self) -> anyhow::Result<()> {
        for key in &self.auth.api_keys {
            if key.key.expose_secret().is_empty() {
                anyhow::bail!("auth.api_keys entry for '{}' has an empty key", key.user_id);
            }
        }

        if let Some(ref remote) = self.auth.remote {
            if remote.gateway_secret.expose_secret().is_empty() {
                anyhow::bail!("auth.remote.gateway_secret must not be empty");
            }

            if remote.cache_ttl_seconds == 0 {
                anyhow::bail!("auth.remote.cache_ttl_seconds must be greater than 0");
            }

            if remote.cache_capacity > 1_000_000 {
                anyhow::bail!("auth.remote.cache_capacity exceeds maximum of 1,000,000");
            }
        }

        if let Some(ref header) = self.auth.trusted_header
            && header.trim().is_empty()
        {
            anyhow::bail!("auth.trusted_header must not be empty");
        }

        Ok(())
    }

    fn validate_podcast_config(&self) -> anyhow::Result<()> {
        let podcast = &self.podcast;

        for (field, path) in [("path", &podcast.path), ("credits_path", &podcast.credits_path)] {
            if !path.starts_with('/') {
                anyhow::bail!("podcast.{field} must start with '/'");
            }
        }

        if podcast.path == podcast.credits_path {
            anyhow::bail!("podcast.path and podcast.credits_path must differ");
        }

        let timeout = duration_str::parse(&podcast.synthesis_timeout)
            .map_err(|e| anyhow::anyhow!("invalid podcast.synthesis_timeout '{}': {e}", podcast.synthesis_timeout))?;

        if timeout.is_zero() {
            anyhow::bail!("podcast.synthesis_timeout must be greater than 0");
        }

        Ok(())
    }
}
