//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use secrecy::SecretString;
use voicecast_config::{
    AetherConfig, Config, CorsConfig, CreditStoreType, HealthConfig, SeedAccountConfig, ServerConfig,
    SettlementPolicy, StaticKeyConfig, TtsProviderConfig, TtsProviderType,
};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig {
                        enabled: true,
                        ..HealthConfig::default()
                    },
                    ..ServerConfig::default()
                },
                ..Config::default()
            },
        }
    }

    /// Add an OpenAI-compatible speech provider pointed at a mock backend
    pub fn with_tts_provider(mut self, name: &str, base_url: &str) -> Self {
        self.config.tts.providers.insert(
            name.to_owned(),
            TtsProviderConfig {
                provider_type: TtsProviderType::OpenaiTts,
                api_key: Some(SecretString::from("test-key")),
                base_url: Some(base_url.to_owned()),
                user_agent: Some("Creative AI Studio".to_owned()),
            },
        );
        self
    }

    /// Accept `key` as a bearer token for `user_id`
    pub fn with_api_key(mut self, key: &str, user_id: &str) -> Self {
        self.config.auth.api_keys.push(StaticKeyConfig {
            key: SecretString::from(key.to_owned()),
            user_id: user_id.to_owned(),
        });
        self
    }

    /// Seed an in-memory credit account
    pub fn with_account(mut self, identity: &str, balance: u64) -> Self {
        self.config.credits.accounts.push(SeedAccountConfig {
            identity: identity.to_owned(),
            id: None,
            balance,
        });
        self
    }

    /// Use the Aether billing service as the credit store
    pub fn with_aether_store(mut self, url: &str) -> Self {
        self.config.credits.store = CreditStoreType::Aether;
        self.config.credits.aether = Some(AetherConfig {
            url: url.parse().expect("valid URL"),
            service_api_key: SecretString::from("svc-test"),
            app_id: "studio".to_owned(),
            entity_type: "user".to_owned(),
        });
        self
    }

    /// Accept identities forwarded in `header` by a trusted proxy
    pub fn with_trusted_header(mut self, header: &str) -> Self {
        self.config.auth.trusted_header = Some(header.to_owned());
        self
    }

    pub fn with_settlement_policy(mut self, policy: SettlementPolicy) -> Self {
        self.config.podcast.on_settlement_failure = policy;
        self
    }

    pub fn with_synthesis_timeout(mut self, timeout: &str) -> Self {
        self.config.podcast.synthesis_timeout = timeout.to_owned();
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config.validate().expect("test config is valid");
        self.config
    }
}
