use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Credit-gated podcast synthesis service
#[derive(Debug, Parser)]
#[command(name = "voicecast", about = "Turn text prompts into podcast audio, one credit at a time")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "voicecast.toml", env = "VOICECAST_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "VOICECAST_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Log filter used when neither `RUST_LOG` nor `telemetry.log_filter` is set
    #[arg(long, default_value = "info", env = "VOICECAST_LOG")]
    pub log_filter: String,
}
