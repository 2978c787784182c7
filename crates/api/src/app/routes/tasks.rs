use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, put},
    Json, Router,
};
use tracing::info;

use tasktrack_auth::{Rule, SecurityContext};
use tasktrack_core::{TaskId, UserId};
use tasktrack_tasks::{CommentStore, NewTask, TaskStore};

use crate::app::dto::{self, CreateTaskRequest, PriorityQuery, StatusQuery};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz;

pub fn router() -> Router {
    Router::new()
        .route("/v1/api/tasks", get(list_tasks).post(create_task))
        .route("/v1/api/tasks/:id", get(get_task).delete(delete_task))
        .route("/v1/api/tasks/:id/status", put(update_status))
        .route("/v1/api/tasks/:id/priority", patch(update_priority))
        .route("/v1/api/tasks/executor/:id", get(tasks_by_executor))
        .route("/v1/api/tasks/author/:id", get(tasks_by_author))
}

pub async fn list_tasks(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
) -> Result<Response, ApiError> {
    authz::require(&ctx, Rule::Authenticated, &services.tasks)?;
    Ok(dto::list_response(services.tasks.list()))
}

pub async fn get_task(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    id: Result<Path<TaskId>, PathRejection>,
) -> Result<Response, ApiError> {
    authz::require(&ctx, Rule::Authenticated, &services.tasks)?;
    let Path(id) = id?;

    let task = services
        .tasks
        .get(id)
        .ok_or_else(|| ApiError::not_found(format!("task {id}")))?;
    Ok(Json(task).into_response())
}

/// Author defaults to the caller; referenced users must exist.
pub async fn create_task(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    authz::require(&ctx, Rule::admin(), &services.tasks)?;
    let caller = authz::caller(&ctx)?;
    let Json(body) = body?;

    let author_id = body.author_id.unwrap_or(caller.id);
    services.ensure_user(author_id)?;
    if let Some(executor) = body.executor_id {
        services.ensure_user(executor)?;
    }

    let task = services.tasks.create(NewTask {
        title: body.title,
        description: body.description,
        author_id: Some(author_id),
        executor_id: body.executor_id,
        status: body.status,
        priority: body.priority,
    })?;
    let task = services.drop_missing_users(task);
    info!(task_id = %task.id, author_id = ?task.author_id, "task created");

    Ok((StatusCode::CREATED, Json(task)).into_response())
}

pub async fn update_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    id: Result<Path<TaskId>, PathRejection>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    authz::require(&ctx, Rule::Authenticated, &services.tasks)?;
    let Path(id) = id?;
    authz::require(&ctx, Rule::executor_or_admin(id), &services.tasks)?;
    let Query(query) = query?;

    let task = services.tasks.update_status(id, query.status)?;
    info!(task_id = %id, status = %task.status, "task status updated");
    Ok(Json(task).into_response())
}

pub async fn update_priority(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    id: Result<Path<TaskId>, PathRejection>,
    query: Result<Query<PriorityQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    authz::require(&ctx, Rule::admin(), &services.tasks)?;
    let Path(id) = id?;
    let Query(query) = query?;

    let task = services.tasks.update_priority(id, query.priority)?;
    Ok(Json(task).into_response())
}

/// Deleting a task removes its comments too.
pub async fn delete_task(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    id: Result<Path<TaskId>, PathRejection>,
) -> Result<Response, ApiError> {
    authz::require(&ctx, Rule::admin(), &services.tasks)?;
    let Path(id) = id?;

    if !services.tasks.delete(id) {
        return Err(ApiError::not_found(format!("task {id}")));
    }
    let comments = services.comments.delete_by_task(id);
    info!(task_id = %id, comments, "task deleted");

    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn tasks_by_executor(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    user: Result<Path<UserId>, PathRejection>,
) -> Result<Response, ApiError> {
    authz::require(&ctx, Rule::admin(), &services.tasks)?;
    let Path(user) = user?;
    Ok(dto::list_response(services.tasks.by_executor(user)))
}

pub async fn tasks_by_author(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    user: Result<Path<UserId>, PathRejection>,
) -> Result<Response, ApiError> {
    authz::require(&ctx, Rule::Authenticated, &services.tasks)?;
    let Path(user) = user?;
    Ok(dto::list_response(services.tasks.by_author(user)))
}
