use axum::http::{HeaderValue, Method, header, request::Parts};
use tower_http::cors::{AllowOrigin, CorsLayer};

fn normalize(origin: &str) -> &str {
    origin.trim_end_matches('/')
}

/// Whether `origin` is in `allowed`, ignoring trailing slashes on either side.
pub fn origin_allowed(allowed: &[String], origin: &str) -> bool {
    let origin = normalize(origin);
    allowed.iter().any(|candidate| normalize(candidate) == origin)
}

/// CORS policy for browser clients: explicit origin allow-list with
/// credentials. Requests without an `Origin` header are untouched.
pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    tracing::info!(origins = ?allowed_origins, "Allowed CORS origins");

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                let Ok(origin) = origin.to_str() else {
                    return false;
                };
                let allowed = origin_allowed(&allowed_origins, origin);
                if !allowed {
                    tracing::warn!(origin = %origin, "CORS: blocked origin");
                }
                allowed
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
