use voicecast_config::AudioFormat;

use crate::Voice;

/// Speech synthesis request following the `OpenAI` TTS API shape
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    /// Model identifier, optionally prefixed with a provider name (`openai/tts-1`)
    pub model: String,
    /// Text to synthesize into speech
    pub input: String,
    pub voice: Voice,
    /// Output audio container
    pub response_format: AudioFormat,
    /// Speech speed multiplier (0.25 to 4.0)
    pub speed: Option<f64>,
}

/// Raw audio response from a TTS provider
#[derive(Debug, Clone)]
pub struct SpeechResponse {
    /// Raw audio bytes
    pub audio: Vec<u8>,
    /// Content type of the audio (e.g. "audio/mpeg")
    pub content_type: String,
}
