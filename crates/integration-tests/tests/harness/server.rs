//! Test server wrapper that starts voicecast on a random port

use std::net::SocketAddr;

use tokio_util::sync::CancellationToken;
use voicecast_config::Config;
use voicecast_server::Server;

/// A running test server instance
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    client: reqwest::Client,
}

impl TestServer {
    /// Start a test server with the given configuration
    ///
    /// Binds to port 0 for automatic port assignment
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        let server = Server::new(config).await?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        // Bind the listener here so we know the actual port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, server.into_router())
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        let client = reqwest::Client::new();

        Ok(Self { addr, shutdown, client })
    }

    /// Full URL for `path` on the running test server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Submit a synthesis form authenticated with `api_key`
    pub async fn synthesize(&self, api_key: &str, form: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url("/synthesize"))
            .bearer_auth(api_key)
            .json(form)
            .send()
            .await
            .expect("synthesize request failed")
    }

    /// Read the caller's balance through `GET /credits`
    pub async fn credits(&self, api_key: &str) -> u64 {
        let body: serde_json::Value = self
            .client
            .get(self.url("/credits"))
            .bearer_auth(api_key)
            .send()
            .await
            .expect("credits request failed")
            .json()
            .await
            .expect("credits body is JSON");

        body["credits"].as_u64().expect("credits is an integer")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// The canonical valid submission
pub fn episode_form() -> serde_json::Value {
    serde_json::json!({
        "title": "Ep1",
        "description": "A short test episode",
        "voiceType": "nova",
        "prompt": "Hello world, this is a test."
    })
}
