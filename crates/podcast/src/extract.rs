use axum::body::Body;
use axum::extract::{FromRequest, FromRequestParts};
use serde::de::DeserializeOwned;
use voicecast_core::{Identity, RequestContext};

use crate::error::PodcastError;

/// Body limit for synthesis requests (1 MiB)
pub const BODY_LIMIT_BYTES: usize = 1 << 20;

const APPLICATION_JSON: &str = "application/json";

/// Take the context built by the server middleware, or build one from the parts
fn context_from_parts(parts: &http::request::Parts) -> RequestContext {
    parts.extensions.get::<RequestContext>().cloned().unwrap_or_else(|| RequestContext {
        parts: parts.clone(),
        identity: parts.extensions.get::<Identity>().cloned(),
    })
}

/// Extractor for the request context alone
pub struct ExtractContext(pub RequestContext);

impl<S> FromRequestParts<S> for ExtractContext
where
    S: Send + Sync,
{
    type Rejection = PodcastError;

    async fn from_request_parts(parts: &mut http::request::Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(context_from_parts(parts)))
    }
}

/// Extractor for JSON request bodies of authenticated callers
///
/// Anonymous requests are turned away before the body is read.
pub struct ExtractPayload<T>(pub RequestContext, pub T);

impl<S, T: DeserializeOwned> FromRequest<S> for ExtractPayload<T>
where
    S: Send + Sync,
{
    type Rejection = PodcastError;

    async fn from_request(request: http::Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = request.into_parts();
        let ctx = context_from_parts(&parts);

        if ctx.identity().is_none() {
            return Err(PodcastError::Unauthenticated);
        }

        let is_json = parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(APPLICATION_JSON));

        if !is_json {
            return Err(PodcastError::UnsupportedMediaType);
        }

        let bytes = axum::body::to_bytes(body, BODY_LIMIT_BYTES).await.map_err(|err| {
            if std::error::Error::source(&err)
                .is_some_and(|source| source.is::<http_body_util::LengthLimitError>())
            {
                PodcastError::PayloadTooLarge(BODY_LIMIT_BYTES)
            } else {
                PodcastError::MalformedBody(format!("Failed to read request body: {err}"))
            }
        })?;

        let body = serde_json::from_slice::<T>(&bytes)
            .map_err(|e| PodcastError::MalformedBody(format!("Failed to parse request body: {e}")))?;

        Ok(Self(ctx, body))
    }
}
