//! Mock speech backend for integration tests
//!
//! Implements the OpenAI `/v1/audio/speech` endpoint and returns canned audio

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use tokio_util::sync::CancellationToken;

/// Bytes every successful synthesis returns
pub const MOCK_AUDIO: &[u8] = b"ID3\x04\x00mock-mp3-frames";

/// Mock TTS backend that returns predictable audio
pub struct MockTts {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockTtsState>,
}

struct MockTtsState {
    request_count: AtomicU32,
    /// Number of requests to fail before succeeding (0 = never fail)
    fail_count: AtomicU32,
    /// Content type returned with the audio
    content_type: &'static str,
    /// Delay before answering
    delay: Duration,
    last_request: Mutex<Option<serde_json::Value>>,
    last_user_agent: Mutex<Option<String>>,
}

impl MockTts {
    /// Start the mock server, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(0, "audio/mpeg", Duration::ZERO).await
    }

    /// Start a mock server that fails the first `n` requests with 500
    pub async fn start_failing(n: u32) -> anyhow::Result<Self> {
        Self::start_inner(n, "audio/mpeg", Duration::ZERO).await
    }

    /// Start a mock server that answers with a non-audio content type
    pub async fn start_with_content_type(content_type: &'static str) -> anyhow::Result<Self> {
        Self::start_inner(0, content_type, Duration::ZERO).await
    }

    /// Start a mock server that waits `delay` before answering
    pub async fn start_slow(delay: Duration) -> anyhow::Result<Self> {
        Self::start_inner(0, "audio/mpeg", delay).await
    }

    async fn start_inner(fail_count: u32, content_type: &'static str, delay: Duration) -> anyhow::Result<Self> {
        let state = Arc::new(MockTtsState {
            request_count: AtomicU32::new(0),
            fail_count: AtomicU32::new(fail_count),
            content_type,
            delay,
            last_request: Mutex::new(None),
            last_user_agent: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/audio/speech", routing::post(handle_speech))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as a provider
    ///
    /// Includes `/v1` since the OpenAI provider appends `/audio/speech`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of speech requests received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    /// JSON body of the most recent speech request
    pub fn last_request(&self) -> Option<serde_json::Value> {
        self.state.last_request.lock().unwrap().clone()
    }

    /// `User-Agent` of the most recent speech request
    pub fn last_user_agent(&self) -> Option<String> {
        self.state.last_user_agent.lock().unwrap().clone()
    }
}

impl Drop for MockTts {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_speech(
    State(state): State<Arc<MockTtsState>>,
    headers: HeaderMap,
    Json(req): Json<serde_json::Value>,
) -> impl IntoResponse {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    *state.last_request.lock().unwrap() = Some(req);
    *state.last_user_agent.lock().unwrap() = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    let remaining = state.fail_count.load(Ordering::Relaxed);
    if remaining > 0 {
        state.fail_count.fetch_sub(1, Ordering::Relaxed);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": {
                    "message": "mock server intentional failure",
                    "type": "server_error"
                }
            })),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, state.content_type)],
        MOCK_AUDIO,
    )
        .into_response()
}
