use http::StatusCode;
use serde::Serialize;

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each feature crate's error type. The feature crates render
/// the response themselves, keeping this crate free of axum.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error type (e.g. `validation_error`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;

    /// JSON body describing this error
    fn error_body(&self) -> ErrorBody {
        ErrorBody {
            error: ErrorDetails {
                message: self.client_message(),
                r#type: self.error_type().to_owned(),
                code: self.status_code().as_u16(),
            },
        }
    }
}

/// Error response envelope
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub message: String,
    pub r#type: String,
    pub code: u16,
}
