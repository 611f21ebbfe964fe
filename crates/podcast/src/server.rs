use std::sync::Arc;
use std::time::Duration;

use tts::{SpeechRequest, TtsError};
use voicecast_config::{AudioFormat, PodcastConfig, SettlementPolicy};
use voicecast_core::RequestContext;
use voicecast_credits::{CreditError, CreditGuard};

use crate::{
    encode::encode_data_uri,
    error::{PodcastError, Result},
    types::{SynthesisForm, SynthesisResult},
    validate::validate,
};

/// Podcast synthesis workflow
///
/// Each submission moves through identity, validation, credit check,
/// synthesis, encoding and settlement, stopping at the first failure. The
/// balance is only touched in the last step.
pub struct Server {
    tts: Arc<tts::Server>,
    guard: CreditGuard,
    model: String,
    response_format: AudioFormat,
    synthesis_timeout: Duration,
    settlement_policy: SettlementPolicy,
}

impl Server {
    /// Assemble the workflow from its collaborators
    ///
    /// # Errors
    ///
    /// Returns an error if `synthesis_timeout` is not a valid duration
    pub fn new(tts: Arc<tts::Server>, guard: CreditGuard, config: &PodcastConfig) -> anyhow::Result<Self> {
        let synthesis_timeout = duration_str::parse(&config.synthesis_timeout)
            .map_err(|e| anyhow::anyhow!("invalid podcast.synthesis_timeout: {e}"))?;

        Ok(Self {
            tts,
            guard,
            model: config.model.clone(),
            response_format: config.response_format,
            synthesis_timeout,
            settlement_policy: config.on_settlement_failure,
        })
    }

    /// Run one submission through the workflow
    pub async fn synthesize(&self, form: SynthesisForm, context: &RequestContext) -> Result<SynthesisResult> {
        let identity = context.identity().ok_or(PodcastError::Unauthenticated)?;

        let request = validate(form).map_err(PodcastError::Validation)?;

        let account = self.guard.check(&identity.user_id).await.map_err(|e| {
            if e.is_store_failure() {
                tracing::warn!(user_id = %identity.user_id, error = %e, "credit check failed");
            } else {
                tracing::debug!(user_id = %identity.user_id, error = %e, "credit check denied");
            }
            PodcastError::from(e)
        })?;

        tracing::debug!(
            user_id = %identity.user_id,
            account_id = %account.id,
            title = %request.title,
            voice = %request.voice,
            "synthesizing podcast"
        );

        let speech = SpeechRequest {
            model: self.model.clone(),
            input: request.prompt,
            voice: request.voice,
            response_format: self.response_format,
            speed: None,
        };

        let audio = tokio::time::timeout(self.synthesis_timeout, self.tts.synthesize(speech, context))
            .await
            .map_err(|_| TtsError::Timeout(self.synthesis_timeout))
            .and_then(|result| result)
            .map_err(PodcastError::Synthesis)?;

        let audio_url = encode_data_uri(&audio.audio, &audio.content_type)?;

        let credits_remaining = match self.guard.settle(&account).await {
            Ok(balance) => Some(balance),
            Err(CreditError::SettlementRefused { account_id }) => match self.settlement_policy {
                SettlementPolicy::Deliver => {
                    tracing::warn!(
                        user_id = %identity.user_id,
                        %account_id,
                        "settlement refused after synthesis, delivering without charge"
                    );
                    None
                }
                SettlementPolicy::Reject => {
                    tracing::warn!(
                        user_id = %identity.user_id,
                        %account_id,
                        "settlement refused after synthesis, withholding audio"
                    );
                    return Err(PodcastError::Settlement { account_id });
                }
            },
            Err(e) => return Err(e.into()),
        };

        Ok(SynthesisResult {
            audio_url,
            credits_remaining,
        })
    }

    /// Credit balance of the caller, zero without an account
    pub async fn credits(&self, context: &RequestContext) -> Result<u64> {
        let identity = context.identity().ok_or(PodcastError::Unauthenticated)?;

        Ok(self.guard.balance(&identity.user_id).await?)
    }
}
