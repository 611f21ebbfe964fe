use std::time::Duration;

use http::StatusCode;
use thiserror::Error;
use voicecast_core::HttpError;

pub type Result<T> = std::result::Result<T, TtsError>;

/// Speech synthesis errors
#[derive(Debug, Error)]
pub enum TtsError {
    /// Provider rejected the request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Provider rejected our credentials
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Provider not found in configuration
    #[error("Provider '{0}' not found")]
    ProviderNotFound(String),

    /// Provider API returned an error
    #[error("Provider API error ({status}): {message}")]
    ProviderApiError { status: u16, message: String },

    /// Network or connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Provider did not answer in time
    #[error("Speech synthesis timed out after {0:?}")]
    Timeout(Duration),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal server error
    /// If Some(message), it came from a provider and can be shown
    /// If None, it's an internal error and should not leak details
    #[error("Internal server error")]
    InternalError(Option<String>),
}

impl HttpError for TtsError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ProviderNotFound(_) => StatusCode::NOT_FOUND,
            Self::ConnectionError(_) | Self::ProviderApiError { .. } => StatusCode::BAD_GATEWAY,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::InvalidRequest(_)
            | Self::AuthenticationFailed(_)
            | Self::ConfigError(_)
            | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::ProviderNotFound(_) => "not_found_error",
            Self::ConnectionError(_) | Self::ProviderApiError { .. } | Self::Timeout(_) => "api_error",
            Self::InvalidRequest(_)
            | Self::AuthenticationFailed(_)
            | Self::ConfigError(_)
            | Self::InternalError(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            // The caller cannot fix our provider credentials or config
            Self::AuthenticationFailed(_) | Self::ConfigError(_) => "Server configuration error".to_owned(),
            Self::InternalError(Some(provider_msg)) => provider_msg.clone(),
            Self::InternalError(None) => "Internal server error".to_owned(),
            _ => self.to_string(),
        }
    }
}
