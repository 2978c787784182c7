use axum::{routing::{get, post}, Router};

pub mod comments;
pub mod system;
pub mod tasks;
pub mod users;

/// Endpoints reachable without the authentication gate.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/v1/api/users/register", post(users::register))
        .route("/v1/api/users/authenticate", post(users::authenticate))
}

/// Endpoints behind the authentication gate; each handler applies its own rule.
pub fn gated_router() -> Router {
    Router::new()
        .route("/v1/api/whoami", get(system::whoami))
        .merge(users::router())
        .merge(tasks::router())
        .merge(comments::router())
}
