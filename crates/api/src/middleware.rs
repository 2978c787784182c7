use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

use crate::app::services::AppServices;

/// Resolve the caller and attach a `SecurityContext` to every gated request.
///
/// Never rejects: a missing or invalid token yields an anonymous context and
/// the route's rule decides.
pub async fn authentication_middleware(
    State(services): State<Arc<AppServices>>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let ctx = services
        .gate
        .authenticate(extract_bearer(req.headers()), Utc::now());

    req.extensions_mut().insert(ctx);
    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;

    let Ok(header) = header.to_str() else {
        debug!("authorization header is not valid ASCII; ignoring");
        return None;
    };

    let Some(token) = header.strip_prefix("Bearer ") else {
        debug!("authorization header is not a bearer token; ignoring");
        return None;
    };

    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    Some(token)
}
