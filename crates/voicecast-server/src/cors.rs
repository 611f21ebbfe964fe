use std::str::FromStr;

use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use voicecast_config::{AllowList, CorsConfig};

/// Build the CORS layer for the studio front end
///
/// `CorsLayer` panics when credentials are combined with a wildcard, so with
/// credentials enabled a wildcard mirrors the request instead.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let mirror = config.credentials;

    let origins = match &config.origins {
        AllowList::Any if mirror => AllowOrigin::mirror_request(),
        AllowList::Any => AllowOrigin::any(),
        AllowList::Only(origins) => AllowOrigin::list(parse_all("origin", origins)),
    };

    let methods = match &config.methods {
        AllowList::Any if mirror => AllowMethods::mirror_request(),
        AllowList::Any => AllowMethods::any(),
        AllowList::Only(methods) => AllowMethods::list(parse_all::<http::Method>("method", methods)),
    };

    let headers = match &config.headers {
        AllowList::Any if mirror => AllowHeaders::mirror_request(),
        AllowList::Any => AllowHeaders::any(),
        AllowList::Only(headers) => AllowHeaders::list(parse_all::<http::HeaderName>("header", headers)),
    };

    let mut layer = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(config.credentials);

    if let Some(max_age) = config.max_age_duration() {
        layer = layer.max_age(max_age);
    }

    layer
}

fn parse_all<T: FromStr>(kind: &str, values: &[String]) -> Vec<T> {
    values
        .iter()
        .filter_map(|value| {
            let parsed = value.parse().ok();
            if parsed.is_none() {
                tracing::warn!(kind, value, "ignoring invalid CORS entry");
            }
            parsed
        })
        .collect()
}
