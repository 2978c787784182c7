use serde::Serialize;

use tasktrack_core::UserId;

use crate::{Role, RoleSet};

/// Identity established for the current request.
///
/// Built by the authentication gate from a verified token plus a fresh
/// credential lookup; roles always come from the store, never from the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedPrincipal {
    pub id: UserId,
    pub email: String,
    pub roles: RoleSet,
}

impl AuthenticatedPrincipal {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

/// Request-scoped security context, passed explicitly to every check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SecurityContext {
    #[default]
    Anonymous,
    Authenticated(AuthenticatedPrincipal),
}

impl SecurityContext {
    pub fn authenticated(principal: AuthenticatedPrincipal) -> Self {
        Self::Authenticated(principal)
    }

    pub fn principal(&self) -> Option<&AuthenticatedPrincipal> {
        match self {
            SecurityContext::Anonymous => None,
            SecurityContext::Authenticated(p) => Some(p),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal().is_some()
    }
}
