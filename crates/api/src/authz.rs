//! API-side authorization guard.
//!
//! Evaluates a `Rule` against the request's security context before a
//! handler touches any store, and maps the outcome to an HTTP error.

use tracing::debug;

use tasktrack_auth::{AuthenticatedPrincipal, AuthzError, Rule, SecurityContext, TaskOwnership, authorize};

use crate::app::errors::ApiError;

/// Denied anonymous callers get 401, denied principals 403, missing tasks 404.
pub fn require(
    ctx: &SecurityContext,
    rule: Rule,
    tasks: &dyn TaskOwnership,
) -> Result<(), ApiError> {
    match authorize(&rule, ctx, tasks) {
        Ok(()) => Ok(()),
        Err(AuthzError::ResourceNotFound) => Err(ApiError::not_found("task")),
        Err(AuthzError::Denied) => {
            debug!(?rule, authenticated = ctx.is_authenticated(), "request denied");
            if ctx.is_authenticated() {
                Err(ApiError::Forbidden)
            } else {
                Err(ApiError::Unauthenticated)
            }
        }
    }
}

/// The authenticated caller, or 401.
pub fn caller(ctx: &SecurityContext) -> Result<&AuthenticatedPrincipal, ApiError> {
    ctx.principal().ok_or(ApiError::Unauthenticated)
}
