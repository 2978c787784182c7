use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use tasktrack_auth::CredentialError;
use tasktrack_core::DomainError;

/// Every failure a handler can surface, mapped to a status and a stable code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("access denied")]
    Forbidden,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    /// Logged in full, reported generically.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::InvalidCredentials => ApiError::InvalidCredentials,
            CredentialError::DuplicateEmail => ApiError::Conflict(err.to_string()),
            CredentialError::NotFound => ApiError::not_found("account"),
            CredentialError::Validation(msg) => ApiError::Validation(msg),
            CredentialError::Hashing(_) | CredentialError::Token(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => ApiError::Validation(msg),
            DomainError::NotFound(what) => ApiError::NotFound(what),
            DomainError::Conflict(msg) => ApiError::Conflict(msg),
        }
    }
}

// Extractor rejections are only surfaced after the route's rule has passed.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthenticated => {
                json_error(StatusCode::UNAUTHORIZED, "unauthenticated", self.to_string())
            }
            ApiError::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", self.to_string()),
            ApiError::InvalidCredentials => {
                json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", self.to_string())
            }
            ApiError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", self.to_string()),
            ApiError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
            ApiError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
            ApiError::Internal(detail) => {
                error!(%detail, "request failed");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error",
                )
            }
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_errors_map_to_statuses() {
        let cases = [
            (CredentialError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (CredentialError::DuplicateEmail, StatusCode::CONFLICT),
            (CredentialError::NotFound, StatusCode::NOT_FOUND),
            (CredentialError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (CredentialError::Hashing("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn domain_not_found_is_404() {
        let res = ApiError::from(DomainError::not_found("task 7")).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
