use serde::{Deserialize, Serialize};
use tts::Voice;

/// Raw synthesis submission as sent by the client
///
/// Absent fields deserialize to empty strings so that they surface as
/// validation errors rather than parse failures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SynthesisForm {
    pub title: String,
    pub description: String,
    pub voice_type: String,
    pub prompt: String,
}

/// A submission that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub title: String,
    pub description: String,
    pub voice: Voice,
    pub prompt: String,
}

/// Outcome of a completed synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisResult {
    /// `data:<mime>;base64,<payload>`
    pub audio_url: String,
    /// Balance after the charge; `None` when settlement was skipped
    pub credits_remaining: Option<u64>,
}

/// Success body for `POST /synthesize`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisResponse {
    pub success: bool,
    pub audio_url: String,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_remaining: Option<u64>,
}

impl From<SynthesisResult> for SynthesisResponse {
    fn from(result: SynthesisResult) -> Self {
        Self {
            success: true,
            audio_url: result.audio_url,
            message: "Podcast generated successfully",
            credits_remaining: result.credits_remaining,
        }
    }
}

/// Body for `GET /credits`
#[derive(Debug, Serialize)]
pub struct CreditsResponse {
    pub credits: u64,
}
