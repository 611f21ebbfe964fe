#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod http_client;
mod provider;
mod server;
mod types;
mod voice;

use std::sync::Arc;

pub use error::{Result, TtsError};
pub use provider::TtsProvider;
pub use server::{Server, TtsServerBuilder};
pub use types::{SpeechRequest, SpeechResponse};
pub use voice::Voice;

/// Build the TTS server from configuration
pub fn build_server(config: &voicecast_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        TtsServerBuilder::new(&config.tts)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize TTS server: {e}"))?,
    );
    Ok(server)
}
