use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tts::TtsError;
use voicecast_core::HttpError;
use voicecast_credits::CreditError;

pub type Result<T> = std::result::Result<T, PodcastError>;

/// Terminal outcomes of the synthesis workflow
#[derive(Debug, Error)]
pub enum PodcastError {
    #[error("Unauthorized")]
    Unauthenticated,

    /// One or more form fields failed validation
    #[error("{0}")]
    Validation(String),

    /// Body could not be read as a synthesis form
    #[error("{0}")]
    MalformedBody(String),

    #[error("Unsupported Content-Type, expected: 'Content-Type: application/json'")]
    UnsupportedMediaType,

    #[error("Request body is too large, limit is {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Insufficient credits")]
    InsufficientCredits { balance: u64, cost: u64 },

    #[error("User not found")]
    AccountNotFound,

    #[error("Failed to generate podcast: {0}")]
    Synthesis(#[source] TtsError),

    /// Provider output could not be turned into a playable payload
    #[error("Failed to encode audio: {0}")]
    Encoding(String),

    /// The charge was refused after the audio was produced
    #[error("Credits could not be settled")]
    Settlement { account_id: String },

    #[error("Credit store unavailable")]
    StoreUnavailable(#[source] CreditError),

    /// Internal server error, details are logged but never returned
    #[error("Internal server error")]
    Internal(String),
}

impl From<CreditError> for PodcastError {
    fn from(err: CreditError) -> Self {
        match err {
            CreditError::AccountNotFound(_) => Self::AccountNotFound,
            CreditError::InsufficientCredits { balance, cost } => Self::InsufficientCredits { balance, cost },
            CreditError::SettlementRefused { account_id } => Self::Settlement { account_id },
            err if err.is_store_failure() => Self::StoreUnavailable(err),
            err => Self::Internal(err.to_string()),
        }
    }
}

impl HttpError for PodcastError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Validation(_) | Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::InsufficientCredits { .. } => StatusCode::FORBIDDEN,
            Self::AccountNotFound => StatusCode::NOT_FOUND,
            Self::Settlement { .. } => StatusCode::CONFLICT,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Synthesis(_) | Self::Encoding(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Unauthenticated => "authentication_error",
            Self::Validation(_) => "validation_error",
            Self::MalformedBody(_) | Self::UnsupportedMediaType | Self::PayloadTooLarge(_) => {
                "invalid_request_error"
            }
            Self::InsufficientCredits { .. } => "insufficient_credits",
            Self::AccountNotFound => "not_found_error",
            Self::Settlement { .. } => "settlement_error",
            Self::StoreUnavailable(_) => "service_unavailable",
            Self::Synthesis(_) => "synthesis_error",
            Self::Encoding(_) => "encoding_error",
            Self::Internal(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Synthesis(err) => format!("Failed to generate podcast: {}", err.client_message()),
            Self::Encoding(_) => "Failed to generate podcast".to_owned(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for PodcastError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "podcast request failed");
        }

        (status, Json(self.error_body())).into_response()
    }
}
