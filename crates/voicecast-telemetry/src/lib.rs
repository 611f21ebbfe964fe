//! Logging for voicecast
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a `fmt`
//! layer in the configured format

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};
use voicecast_config::{LogFormat, TelemetryConfig};

/// Pick the filter directive: `RUST_LOG`, then the configured filter, then `fallback`
fn build_filter(config: &TelemetryConfig, fallback: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let directive = config.log_filter.as_deref().unwrap_or(fallback);

    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging from configuration
///
/// `fallback` is used when neither `RUST_LOG` nor `telemetry.log_filter` is
/// set, typically the `--log-filter` flag.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(config: &TelemetryConfig, fallback: &str) -> anyhow::Result<()> {
    let filter = build_filter(config, fallback);

    let fmt_layer = match config.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer().compact().with_target(false).boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}
