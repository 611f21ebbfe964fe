use axum::Json;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use voicecast_auth::IdentityResolver;
use voicecast_core::HttpError;

/// Attach the caller identity to the request
///
/// Public paths pass straight through. A request without credentials also
/// passes, identity-less, and the handlers decide. Presented credentials that
/// no source accepts are answered with 401 here; a key service outage with
/// 503.
pub async fn auth_middleware(
    resolver: IdentityResolver,
    public_paths: Vec<String>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();

    if public_paths.iter().any(|p| path.starts_with(p.as_str())) {
        return next.run(request).await;
    }

    match resolver.identify(request.headers()).await {
        Ok(Some(identity)) => {
            tracing::debug!(user_id = %identity.user_id, source = ?identity.source, "caller identified");
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Ok(None) => next.run(request).await,
        Err(e) => {
            if e.is_rejection() {
                tracing::warn!(error = %e, "API key authentication failed");
            } else {
                tracing::error!(error = %e, "identity resolution unavailable");
            }

            (e.status_code(), Json(e.error_body())).into_response()
        }
    }
}
