use secrecy::{ExposeSecret, SecretString};
use voicecast_config::{TtsConfig, TtsProviderConfig, TtsProviderType};
use voicecast_core::RequestContext;

use crate::{
    error::TtsError,
    provider::{TtsProvider, openai_tts::OpenAiTtsProvider},
    types::{SpeechRequest, SpeechResponse},
};

/// TTS server that routes requests to the appropriate provider
pub struct Server {
    providers: Vec<Box<dyn TtsProvider>>,
}

impl Server {
    /// Create a server over already constructed providers
    pub fn new(providers: Vec<Box<dyn TtsProvider>>) -> Self {
        Self { providers }
    }

    /// Names of the configured providers, in routing order
    pub fn provider_names(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|p| p.name())
    }

    /// Synthesize text to speech using the appropriate provider
    ///
    /// Model format: "provider/model" (e.g. "openai/tts-1"). The prefix
    /// selects the provider and is stripped before the call. Without a
    /// prefix the first configured provider is used.
    pub async fn synthesize(
        &self,
        mut request: SpeechRequest,
        context: &RequestContext,
    ) -> crate::error::Result<SpeechResponse> {
        let provider = match request.model.split_once('/') {
            Some((provider_name, model_name)) => {
                let provider = self
                    .providers
                    .iter()
                    .find(|p| p.name() == provider_name)
                    .ok_or_else(|| TtsError::ProviderNotFound(provider_name.to_owned()))?;

                request.model = model_name.to_owned();
                provider
            }
            None => self
                .providers
                .first()
                .ok_or_else(|| TtsError::ProviderNotFound("No TTS providers configured".to_owned()))?,
        };

        provider.synthesize(request, context).await
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("providers", &self.provider_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for constructing the TTS server from configuration
pub struct TtsServerBuilder<'a> {
    config: &'a TtsConfig,
}

impl<'a> TtsServerBuilder<'a> {
    pub const fn new(config: &'a TtsConfig) -> Self {
        Self { config }
    }

    pub fn build(self) -> crate::error::Result<Server> {
        let mut providers: Vec<Box<dyn TtsProvider>> = Vec::new();

        for (name, provider_config) in &self.config.providers {
            tracing::debug!("Initializing TTS provider: {name}");

            let provider: Box<dyn TtsProvider> = match provider_config.provider_type {
                TtsProviderType::OpenaiTts => {
                    let api_key = resolve_api_key(name, provider_config)?;

                    Box::new(OpenAiTtsProvider::new(
                        name.clone(),
                        api_key,
                        provider_config.base_url.clone(),
                        provider_config.user_agent.as_deref(),
                    )?)
                }
            };

            providers.push(provider);
        }

        if providers.is_empty() {
            tracing::debug!("No TTS providers configured");
        } else {
            tracing::debug!("TTS server initialized with {} provider(s)", providers.len());
        }

        Ok(Server::new(providers))
    }
}

fn resolve_api_key(name: &str, config: &TtsProviderConfig) -> crate::error::Result<SecretString> {
    config
        .api_key
        .clone()
        .filter(|key| !key.expose_secret().trim().is_empty())
        .ok_or_else(|| TtsError::ConfigError(format!("API key required for TTS provider '{name}'")))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use indexmap::IndexMap;
    use voicecast_config::AudioFormat;

    use super::*;
    use crate::Voice;

    struct Recording {
        name: &'static str,
        models: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl TtsProvider for Recording {
        async fn synthesize(
            &self,
            request: SpeechRequest,
            _context: &RequestContext,
        ) -> crate::error::Result<SpeechResponse> {
            self.models.lock().unwrap().push(format!("{}:{}", self.name, request.model));

            Ok(SpeechResponse {
                audio: vec![1],
                content_type: "audio/mpeg".to_owned(),
            })
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    fn request(model: &str) -> SpeechRequest {
        SpeechRequest {
            model: model.to_owned(),
            input: "Hello world, this is a test.".to_owned(),
            voice: Voice::Alloy,
            response_format: AudioFormat::Mp3,
            speed: None,
        }
    }

    fn server(models: &Arc<Mutex<Vec<String>>>) -> Server {
        Server::new(vec![
            Box::new(Recording {
                name: "primary",
                models: Arc::clone(models),
            }),
            Box::new(Recording {
                name: "backup",
                models: Arc::clone(models),
            }),
        ])
    }

    #[tokio::test]
    async fn unprefixed_model_uses_first_provider() {
        let models = Arc::new(Mutex::new(Vec::new()));

        server(&models)
            .synthesize(request("tts-1"), &RequestContext::empty())
            .await
            .unwrap();

        assert_eq!(*models.lock().unwrap(), vec!["primary:tts-1"]);
    }

    #[tokio::test]
    async fn prefix_selects_provider_and_is_stripped() {
        let models = Arc::new(Mutex::new(Vec::new()));

        server(&models)
            .synthesize(request("backup/tts-1-hd"), &RequestContext::empty())
            .await
            .unwrap();

        assert_eq!(*models.lock().unwrap(), vec!["backup:tts-1-hd"]);
    }

    #[tokio::test]
    async fn unknown_prefix_is_not_found() {
        let models = Arc::new(Mutex::new(Vec::new()));

        let err = server(&models)
            .synthesize(request("nope/tts-1"), &RequestContext::empty())
            .await
            .unwrap_err();

        assert!(matches!(err, TtsError::ProviderNotFound(name) if name == "nope"));
        assert!(models.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_server_reports_missing_provider() {
        let err = Server::new(Vec::new())
            .synthesize(request("tts-1"), &RequestContext::empty())
            .await
            .unwrap_err();

        assert!(matches!(err, TtsError::ProviderNotFound(_)));
    }

    #[test]
    fn builder_requires_api_key() {
        let mut providers = IndexMap::new();
        providers.insert(
            "openai".to_owned(),
            TtsProviderConfig {
                provider_type: TtsProviderType::OpenaiTts,
                api_key: Some(SecretString::from("  ")),
                base_url: None,
                user_agent: None,
            },
        );

        let err = TtsServerBuilder::new(&TtsConfig { providers }).build().unwrap_err();

        assert!(matches!(err, TtsError::ConfigError(_)));
    }

    #[test]
    fn builder_registers_providers_in_order() {
        let mut providers = IndexMap::new();
        for name in ["openai", "compat"] {
            providers.insert(
                name.to_owned(),
                TtsProviderConfig {
                    provider_type: TtsProviderType::OpenaiTts,
                    api_key: Some(SecretString::from("sk-test")),
                    base_url: Some("http://localhost:9/v1".to_owned()),
                    user_agent: Some("Creative AI Studio".to_owned()),
                },
            );
        }

        let server = TtsServerBuilder::new(&TtsConfig { providers }).build().unwrap();

        assert_eq!(server.provider_names().collect::<Vec<_>>(), vec!["openai", "compat"]);
    }
}
