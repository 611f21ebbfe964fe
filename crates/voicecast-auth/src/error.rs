use http::StatusCode;
use voicecast_core::HttpError;

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Bearer token did not match any known key
    #[error("invalid API key")]
    InvalidKey,

    /// API key has expired or was revoked
    #[error("expired API key")]
    ExpiredKey,

    /// HTTP request to the key service failed
    #[error("key resolution failed: {0}")]
    ResolutionFailed(#[from] reqwest::Error),

    /// Key service returned a non-success response
    #[error("key service error ({status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the service
        message: String,
    },
}

impl AuthError {
    /// Whether the caller presented bad credentials, as opposed to the
    /// key service being unavailable
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::InvalidKey | Self::ExpiredKey)
    }
}

impl HttpError for AuthError {
    fn status_code(&self) -> StatusCode {
        if self.is_rejection() {
            StatusCode::UNAUTHORIZED
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }

    fn error_type(&self) -> &str {
        if self.is_rejection() {
            "authentication_error"
        } else {
            "service_unavailable"
        }
    }

    fn client_message(&self) -> String {
        if self.is_rejection() {
            self.to_string()
        } else {
            "authentication service unavailable".to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_are_unauthorized() {
        assert_eq!(AuthError::InvalidKey.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::ExpiredKey.client_message(), "expired API key");
    }

    #[test]
    fn service_failures_hide_detail() {
        let err = AuthError::ApiError {
            status: 500,
            message: "stack trace".to_owned(),
        };

        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.client_message(), "authentication service unavailable");
    }
}
