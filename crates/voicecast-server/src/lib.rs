mod auth;
mod cors;
mod health;
mod request_context;

use std::net::SocketAddr;

use axum::Router;
use tower_http::trace::TraceLayer;
use voicecast_auth::IdentityResolver;
use voicecast_config::Config;
use voicecast_credits::CreditGuard;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the identity resolver, credit store or TTS
    /// providers cannot be initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let guard = CreditGuard::from_config(&config.credits)?;
        tracing::info!(store = guard.store_name(), cost = guard.cost(), "credit guard ready");

        // Reachability only; a cold billing service should not block startup
        if let Err(e) = guard.health().await {
            tracing::warn!(store = guard.store_name(), error = %e, "credit store health check failed");
        }

        let podcast_state = podcast::build_server(&config, guard)?;

        let mut app = Router::new();

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        app = app.merge(podcast::endpoint_router(&config.podcast).with_state(podcast_state));

        // Apply middleware layers (innermost first)

        // Request context (innermost, runs just before handlers)
        app = app.layer(axum::middleware::from_fn(request_context::request_context_middleware));

        // Caller identity
        let resolver = IdentityResolver::from_config(&config.auth)?;
        if resolver.is_configured() {
            let public_paths = config.auth.public_paths.clone();
            app = app.layer(axum::middleware::from_fn(move |req, next| {
                let resolver = resolver.clone();
                let public_paths = public_paths.clone();
                async move { auth::auth_middleware(resolver, public_paths, req, next).await }
            }));
        } else {
            tracing::warn!("no identity source configured, every synthesis request will be rejected");
        }

        app = app.layer(TraceLayer::new_for_http());

        // CORS (outermost, so preflights never reach auth)
        if let Some(ref cors_config) = config.server.cors {
            app = app.layer(cors::cors_layer(cors_config));
        }

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Override the listen address, e.g. from the command line
    #[must_use]
    pub const fn with_listen_address(mut self, listen_address: SocketAddr) -> Self {
        self.listen_address = listen_address;
        self
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
