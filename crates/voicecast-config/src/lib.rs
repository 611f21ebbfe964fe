#![allow(clippy::must_use_candidate)]

pub mod auth;
pub mod cors;
pub mod credits;
mod env;
pub mod health;
mod loader;
pub mod podcast;
pub mod server;
pub mod telemetry;
pub mod tts;

use serde::Deserialize;

pub use auth::*;
pub use cors::*;
pub use credits::*;
pub use health::*;
pub use podcast::*;
pub use server::*;
pub use telemetry::*;
pub use tts::*;

/// Top-level voicecast configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Caller authentication
    #[serde(default)]
    pub auth: AuthConfig,
    /// Credit accounting
    #[serde(default)]
    pub credits: CreditsConfig,
    /// TTS provider configuration
    #[serde(default)]
    pub tts: TtsConfig,
    /// Podcast synthesis endpoint configuration
    #[serde(default)]
    pub podcast: PodcastConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
