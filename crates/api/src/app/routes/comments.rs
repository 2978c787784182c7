use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Path,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;

use tasktrack_auth::{Rule, SecurityContext};
use tasktrack_core::{CommentId, TaskId};
use tasktrack_tasks::{CommentStore, NewComment, TaskStore};

use crate::app::dto::{self, CommentRequest};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz;

/// One path for all three verbs: the id is a task id for POST/GET and a
/// comment id for DELETE.
pub fn router() -> Router {
    Router::new().route(
        "/v1/api/comments/:id",
        post(add_comment).get(list_comments).delete(delete_comment),
    )
}

pub async fn add_comment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    task_id: Result<Path<TaskId>, PathRejection>,
    body: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    authz::require(&ctx, Rule::Authenticated, &services.tasks)?;
    let Path(task_id) = task_id?;
    authz::require(&ctx, Rule::executor_or_admin(task_id), &services.tasks)?;
    let caller = authz::caller(&ctx)?;
    let Json(body) = body?;

    let comment = services.comments.add(NewComment {
        task_id,
        author_id: caller.id,
        text: body.text,
        created_at: Utc::now(),
    })?;

    Ok((StatusCode::CREATED, Json(comment)).into_response())
}

pub async fn list_comments(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    task_id: Result<Path<TaskId>, PathRejection>,
) -> Result<Response, ApiError> {
    authz::require(&ctx, Rule::Authenticated, &services.tasks)?;
    let Path(task_id) = task_id?;

    if services.tasks.get(task_id).is_none() {
        return Err(ApiError::not_found(format!("task {task_id}")));
    }
    Ok(dto::list_response(services.comments.list_by_task(task_id)))
}

pub async fn delete_comment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    comment_id: Result<Path<CommentId>, PathRejection>,
) -> Result<Response, ApiError> {
    authz::require(&ctx, Rule::admin(), &services.tasks)?;
    let Path(comment_id) = comment_id?;

    if !services.comments.delete(comment_id) {
        return Err(ApiError::not_found(format!("comment {comment_id}")));
    }
    Ok(StatusCode::NO_CONTENT.into_response())
}
