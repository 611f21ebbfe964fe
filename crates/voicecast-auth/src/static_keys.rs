use std::collections::HashMap;

use secrecy::ExposeSecret;
use voicecast_config::StaticKeyConfig;

use crate::sha256_hex;

/// API keys declared in the configuration file
#[derive(Debug, Clone, Default)]
pub struct StaticKeys {
    /// SHA-256 of the key mapped to the owning user id
    by_digest: HashMap<String, String>,
}

impl StaticKeys {
    pub fn new(keys: &[StaticKeyConfig]) -> Self {
        let by_digest = keys
            .iter()
            .map(|entry| (sha256_hex(entry.key.expose_secret()), entry.user_id.clone()))
            .collect();

        Self { by_digest }
    }

    /// User id owning `token`, if it is a configured key
    pub fn lookup(&self, token: &str) -> Option<&str> {
        self.by_digest.get(&sha256_hex(token)).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.by_digest.is_empty()
    }
}
