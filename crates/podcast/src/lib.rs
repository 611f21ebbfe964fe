#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod encode;
mod error;
mod extract;
mod server;
mod types;
mod validate;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use voicecast_config::PodcastConfig;
use voicecast_credits::CreditGuard;

pub use encode::{decode_data_uri, encode_data_uri};
pub use error::{PodcastError, Result};
pub use extract::BODY_LIMIT_BYTES;
pub use server::Server;
pub use types::{CreditsResponse, SynthesisForm, SynthesisRequest, SynthesisResponse, SynthesisResult};
pub use validate::{MAX_PROMPT_CHARS, MIN_TEXT_CHARS, validate};

use extract::{ExtractContext, ExtractPayload};

/// Build the podcast server from configuration
///
/// # Errors
///
/// Returns an error if the TTS providers or the synthesis timeout cannot be
/// set up
pub fn build_server(config: &voicecast_config::Config, guard: CreditGuard) -> anyhow::Result<Arc<Server>> {
    let tts = tts::build_server(config)?;
    let server = Server::new(tts, guard, &config.podcast)
        .map_err(|e| anyhow::anyhow!("Failed to initialize podcast server: {e}"))?;

    Ok(Arc::new(server))
}

/// Create the endpoint router for podcast synthesis and credit lookups
pub fn endpoint_router(config: &PodcastConfig) -> Router<Arc<Server>> {
    Router::new()
        .route(&config.path, post(synthesize))
        .route(&config.credits_path, get(credits))
}

/// Handle podcast synthesis submissions
async fn synthesize(
    State(server): State<Arc<Server>>,
    ExtractPayload(context, form): ExtractPayload<SynthesisForm>,
) -> Result<Json<SynthesisResponse>> {
    tracing::debug!("Podcast synthesis handler called");

    let result = server.synthesize(form, &context).await?;

    tracing::debug!(credits_remaining = ?result.credits_remaining, "Podcast synthesis complete");

    Ok(Json(result.into()))
}

/// Report the caller's credit balance
async fn credits(
    State(server): State<Arc<Server>>,
    ExtractContext(context): ExtractContext,
) -> Result<Json<CreditsResponse>> {
    let credits = server.credits(&context).await?;

    Ok(Json(CreditsResponse { credits }))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use axum::body::Body;
    use http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use tts::{SpeechRequest, SpeechResponse, TtsProvider};
    use voicecast_config::SeedAccountConfig;
    use voicecast_core::{Identity, IdentitySource, RequestContext};
    use voicecast_credits::MemoryStore;

    use super::*;

    struct Beep(Arc<AtomicU32>);

    #[async_trait]
    impl TtsProvider for Beep {
        async fn synthesize(&self, _request: SpeechRequest, _context: &RequestContext) -> tts::Result<SpeechResponse> {
            self.0.fetch_add(1, Ordering::SeqCst);

            Ok(SpeechResponse {
                audio: b"beep".to_vec(),
                content_type: "audio/mpeg".to_owned(),
            })
        }

        fn name(&self) -> &str {
            "beep"
        }
    }

    fn app(balance: u64) -> (Router, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let tts = Arc::new(tts::Server::new(vec![Box::new(Beep(Arc::clone(&calls)))]));
        let store = Arc::new(MemoryStore::seeded(&[SeedAccountConfig {
            identity: "user_1".to_owned(),
            id: None,
            balance,
        }]));
        let config = PodcastConfig::default();
        let server = Server::new(tts, CreditGuard::new(store, 1), &config).unwrap();

        (endpoint_router(&config).with_state(Arc::new(server)), calls)
    }

    fn post(body: &str, identity: bool) -> Request<Body> {
        let mut request = Request::post("/synthesize")
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap();

        if identity {
            request
                .extensions_mut()
                .insert(Identity::new("user_1", IdentitySource::StaticKey));
        }

        request
    }

    async fn json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    const VALID: &str = r#"{"title":"Ep1","description":"A short test episode","voiceType":"nova","prompt":"Hello world, this is a test."}"#;

    #[tokio::test]
    async fn synthesize_returns_data_uri() {
        let (app, calls) = app(1);

        let response = app.oneshot(post(VALID, true)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["audioUrl"], "data:audio/mpeg;base64,YmVlcA==");
        assert_eq!(body["message"], "Podcast generated successfully");
        assert_eq!(body["creditsRemaining"], 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn anonymous_request_is_unauthorized() {
        let (app, calls) = app(1);

        let response = app.oneshot(post("not json", false)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json(response).await["error"]["type"], "authentication_error");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn wrong_content_type_is_unsupported() {
        let (app, _) = app(1);
        let mut request = post(VALID, true);
        request
            .headers_mut()
            .insert("content-type", http::HeaderValue::from_static("text/plain"));

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let (app, calls) = app(1);
        let body = format!(r#"{{"prompt":"{}"}}"#, "a".repeat(BODY_LIMIT_BYTES));

        let response = app.oneshot(post(&body, true)).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_fields_are_bad_request() {
        let (app, _) = app(1);

        let response = app.oneshot(post(r#"{"title":"Ep1"}"#, true)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json(response).await;
        assert_eq!(body["error"]["type"], "validation_error");
        assert_eq!(body["error"]["code"], 400);
    }

    #[tokio::test]
    async fn empty_balance_is_forbidden() {
        let (app, calls) = app(0);

        let response = app.oneshot(post(VALID, true)).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(json(response).await["error"]["message"], "Insufficient credits");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn credits_route_reports_balance() {
        let (app, _) = app(5);
        let mut request = Request::get("/credits").body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(Identity::new("user_1", IdentitySource::StaticKey));

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await, serde_json::json!({ "credits": 5 }));
    }

    #[tokio::test]
    async fn credits_route_requires_identity() {
        let (app, _) = app(5);

        let response = app
            .oneshot(Request::get("/credits").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
