use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use tasktrack_auth::SecurityContext;

use crate::app::errors::ApiError;
use crate::authz;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(
    Extension(ctx): Extension<SecurityContext>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = authz::caller(&ctx)?;
    Ok(Json(principal.clone()))
}
