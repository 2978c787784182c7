use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use tasktrack_auth::{Credential, Role};
use tasktrack_core::UserId;
use tasktrack_tasks::{TaskPriority, TaskStatus};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Deserialize)]
pub struct AuthenticateRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub author_id: Option<UserId>,
    pub executor_id: Option<UserId>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: TaskStatus,
}

#[derive(Debug, Deserialize)]
pub struct PriorityQuery {
    pub priority: TaskPriority,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

// -------------------------
// Response DTOs
// -------------------------

/// Public view of an account; the password hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub role: Role,
}

impl From<Credential> for UserResponse {
    fn from(c: Credential) -> Self {
        Self {
            id: c.id,
            email: c.email,
            role: c.role,
        }
    }
}

/// 200 with the items, or 204 when there are none.
pub fn list_response<T: Serialize>(items: Vec<T>) -> Response {
    if items.is_empty() {
        StatusCode::NO_CONTENT.into_response()
    } else {
        (StatusCode::OK, Json(items)).into_response()
    }
}
