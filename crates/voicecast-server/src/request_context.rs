use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use voicecast_core::{Identity, RequestContext};

/// Middleware that constructs a `RequestContext` from the incoming request
///
/// Runs after authentication, so the identity attached by the auth layer (if
/// any) is carried into the context handlers receive
pub async fn request_context_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();

    let context = RequestContext {
        identity: parts.extensions.get::<Identity>().cloned(),
        parts: parts.clone(),
    };

    let mut request = Request::from_parts(parts, body);
    request.extensions_mut().insert(context);

    next.run(request).await
}
