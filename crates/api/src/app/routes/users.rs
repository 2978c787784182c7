use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Path,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use tracing::info;

use tasktrack_auth::{CredentialStore, ProfileUpdate, Registration, Role, Rule, SecurityContext};
use tasktrack_core::UserId;
use tasktrack_tasks::TaskStore;

use crate::app::dto::{self, AuthenticateRequest, RegisterRequest, UpdateUserRequest, UserResponse};
use crate::app::errors::ApiError;
use crate::app::services::{blocking, AppServices};
use crate::authz;

pub fn router() -> Router {
    Router::new()
        .route("/v1/api/users/all", get(list_users))
        .route(
            "/v1/api/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let registration = Registration {
        email: body.email,
        password: body.password,
        role: body.role.unwrap_or_default(),
    };
    let credential = blocking(move || services.accounts.register(registration)).await??;

    Ok((StatusCode::CREATED, Json(UserResponse::from(credential))).into_response())
}

/// Exchange email and password for a bearer token, returned as a JSON string.
pub async fn authenticate(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<AuthenticateRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let issued =
        blocking(move || services.accounts.login(&body.email, &body.password, Utc::now()))
            .await??;

    Ok((StatusCode::OK, Json(issued.token)).into_response())
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
) -> Result<Response, ApiError> {
    authz::require(&ctx, Rule::admin(), &services.tasks)?;

    let users = services
        .credentials
        .list()
        .into_iter()
        .map(UserResponse::from)
        .collect::<Vec<_>>();
    Ok(dto::list_response(users))
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    id: Result<Path<UserId>, PathRejection>,
) -> Result<Response, ApiError> {
    authz::require(&ctx, Rule::Authenticated, &services.tasks)?;
    let Path(id) = id?;
    authz::require(&ctx, Rule::self_or_admin(id), &services.tasks)?;

    let credential = services
        .credentials
        .find_by_id(id)
        .ok_or_else(|| ApiError::not_found(format!("user {id}")))?;
    Ok(Json(UserResponse::from(credential)).into_response())
}

/// Self or admin may edit; only an admin may change a role.
pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    id: Result<Path<UserId>, PathRejection>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    authz::require(&ctx, Rule::Authenticated, &services.tasks)?;
    let Path(id) = id?;
    authz::require(&ctx, Rule::self_or_admin(id), &services.tasks)?;
    let Json(body) = body?;
    if body.role.is_some() {
        authz::require(&ctx, Rule::role(Role::Admin), &services.tasks)?;
    }

    let update = ProfileUpdate {
        email: body.email,
        password: body.password,
        role: body.role,
    };
    let credential = blocking(move || services.accounts.update_profile(id, update)).await??;

    Ok(Json(UserResponse::from(credential)).into_response())
}

/// Remove the account and unassign it from every task.
pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    id: Result<Path<UserId>, PathRejection>,
) -> Result<Response, ApiError> {
    authz::require(&ctx, Rule::admin(), &services.tasks)?;
    let Path(id) = id?;

    services.accounts.delete(id)?;
    let unassigned = services.tasks.forget_user(id);
    info!(user_id = %id, unassigned, "user removed");

    Ok(StatusCode::NO_CONTENT.into_response())
}
