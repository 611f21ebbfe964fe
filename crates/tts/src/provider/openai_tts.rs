use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use voicecast_core::RequestContext;

use crate::{
    error::TtsError,
    http_client::http_client,
    types::{SpeechRequest, SpeechResponse},
};

use super::TtsProvider;

const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// `OpenAI` TTS provider, also used for compatible `/audio/speech` endpoints
pub(crate) struct OpenAiTtsProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
    name: String,
}

impl OpenAiTtsProvider {
    pub fn new(
        name: String,
        api_key: SecretString,
        base_url: Option<String>,
        user_agent: Option<&str>,
    ) -> crate::error::Result<Self> {
        let client = http_client(user_agent)?;
        let base_url = base_url
            .map(|url| url.trim_end_matches('/').to_owned())
            .unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_owned());

        Ok(Self {
            client,
            base_url,
            api_key,
            name,
        })
    }
}

#[derive(serde::Serialize)]
struct OpenAiTtsRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed: Option<f64>,
}

#[derive(Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetails,
}

#[derive(Deserialize)]
struct OpenAiErrorDetails {
    message: String,
}

/// Pull the human-readable message out of an `OpenAI` error body
fn error_message(body: String) -> String {
    serde_json::from_str::<OpenAiErrorResponse>(&body).map_or(body, |parsed| parsed.error.message)
}

#[async_trait]
impl TtsProvider for OpenAiTtsProvider {
    async fn synthesize(
        &self,
        request: SpeechRequest,
        _context: &RequestContext,
    ) -> crate::error::Result<SpeechResponse> {
        let url = format!("{}/audio/speech", self.base_url);

        tracing::debug!(
            provider = %self.name,
            model = %request.model,
            voice = %request.voice,
            input_chars = request.input.chars().count(),
            "OpenAI TTS request"
        );

        let body = OpenAiTtsRequest {
            model: &request.model,
            input: &request.input,
            voice: request.voice.as_ref(),
            response_format: request.response_format.as_str(),
            speed: request.speed,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("OpenAI TTS request failed: {e}");
                TtsError::ConnectionError(format!("Failed to send request to OpenAI TTS: {e}"))
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .map_or_else(|_| "Unknown error".to_owned(), error_message);

            tracing::error!("OpenAI TTS API error ({status}): {error_text}");

            return Err(match status.as_u16() {
                401 => TtsError::AuthenticationFailed(error_text),
                400 => TtsError::InvalidRequest(error_text),
                _ => TtsError::ProviderApiError {
                    status: status.as_u16(),
                    message: error_text,
                },
            });
        }

        let content_type = response
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or_else(
                || request.response_format.mime_type().to_owned(),
                |v| v.split(';').next().unwrap_or(v).trim().to_owned(),
            );

        let audio = response.bytes().await.map_err(|e| {
            tracing::error!("Failed to read OpenAI TTS response body: {e}");
            TtsError::InternalError(None)
        })?;

        tracing::debug!("OpenAI TTS synthesis complete, {} bytes", audio.len());

        Ok(SpeechResponse {
            audio: audio.to_vec(),
            content_type,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
