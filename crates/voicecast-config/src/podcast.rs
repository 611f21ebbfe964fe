use serde::Deserialize;

/// Podcast synthesis endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PodcastConfig {
    /// Route for synthesis submissions
    #[serde(default = "default_path")]
    pub path: String,
    /// Route reporting the caller's credit balance
    #[serde(default = "default_credits_path")]
    pub credits_path: String,
    /// Provider model, optionally prefixed with the provider name (`openai/tts-1`)
    #[serde(default = "default_model")]
    pub model: String,
    /// Audio container requested from the provider
    #[serde(default)]
    pub response_format: AudioFormat,
    /// Upper bound on a single provider call, e.g. `"60s"`
    #[serde(default = "default_synthesis_timeout")]
    pub synthesis_timeout: String,
    /// What to do when the charge cannot be settled after synthesis
    #[serde(default)]
    pub on_settlement_failure: SettlementPolicy,
}

impl Default for PodcastConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            credits_path: default_credits_path(),
            model: default_model(),
            response_format: AudioFormat::default(),
            synthesis_timeout: default_synthesis_timeout(),
            on_settlement_failure: SettlementPolicy::default(),
        }
    }
}

/// Audio containers the speech API can return
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Opus,
    Aac,
    Flac,
    Wav,
}

impl AudioFormat {
    /// Name the provider expects in `response_format`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Opus => "opus",
            Self::Aac => "aac",
            Self::Flac => "flac",
            Self::Wav => "wav",
        }
    }

    /// MIME type used in the returned data URI
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Opus => "audio/opus",
            Self::Aac => "audio/aac",
            Self::Flac => "audio/flac",
            Self::Wav => "audio/wav",
        }
    }
}

/// Outcome when the credit decrement is refused after audio was produced
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SettlementPolicy {
    /// Return the audio without a remaining balance and log the miss
    #[default]
    Deliver,
    /// Withhold the audio and answer with a settlement error
    Reject,
}

fn default_path() -> String {
    "/synthesize".to_owned()
}

fn default_credits_path() -> String {
    "/credits".to_owned()
}

fn default_model() -> String {
    "tts-1".to_owned()
}

fn default_synthesis_timeout() -> String {
    "60s".to_owned()
}
