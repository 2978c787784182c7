//! Per-request authentication: bearer token → security context.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::credential::CredentialStore;
use crate::principal::{AuthenticatedPrincipal, SecurityContext};
use crate::token::TokenService;
use crate::{RoleSet, TokenError};

/// Why a presented token did not yield a principal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateRejection {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("token subject has no account")]
    UnknownSubject,
}

/// Resolves the caller's identity. Never fails the request: any problem with
/// the token leaves the context anonymous and authorization decides.
pub struct AuthenticationGate<S> {
    tokens: Arc<TokenService>,
    credentials: S,
}

impl<S: CredentialStore> AuthenticationGate<S> {
    pub fn new(tokens: Arc<TokenService>, credentials: S) -> Self {
        Self {
            tokens,
            credentials,
        }
    }

    pub fn authenticate(&self, bearer: Option<&str>, now: DateTime<Utc>) -> SecurityContext {
        let Some(token) = bearer else {
            return SecurityContext::Anonymous;
        };

        match self.resolve(token, now) {
            Ok(principal) => SecurityContext::authenticated(principal),
            Err(reason) => {
                debug!(%reason, "bearer token rejected; continuing anonymously");
                SecurityContext::Anonymous
            }
        }
    }

    /// Verify the token and load the subject's current role from the store.
    pub fn resolve(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedPrincipal, GateRejection> {
        let claims = self.tokens.verify(token, now)?;
        let credential = self
            .credentials
            .find_by_email(claims.subject())
            .ok_or(GateRejection::UnknownSubject)?;

        Ok(AuthenticatedPrincipal {
            id: credential.id,
            email: credential.email,
            roles: RoleSet::from(credential.role),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::{NewCredential, PasswordHash};
    use crate::testing::MemoryCredentials;
    use crate::Role;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn setup() -> (Arc<TokenService>, Arc<MemoryCredentials>, AuthenticationGate<Arc<MemoryCredentials>>) {
        let tokens = Arc::new(TokenService::new(b"gate-test-secret"));
        let store = Arc::new(MemoryCredentials::default());
        store
            .insert(NewCredential {
                email: "alice@x.com".to_string(),
                password_hash: PasswordHash::from_stored("hash"),
                role: Role::User,
            })
            .unwrap();
        let gate = AuthenticationGate::new(tokens.clone(), store.clone());
        (tokens, store, gate)
    }

    #[test]
    fn missing_header_is_anonymous() {
        let (_, _, gate) = setup();
        assert_eq!(gate.authenticate(None, now()), SecurityContext::Anonymous);
    }

    #[test]
    fn valid_token_resolves_role_from_store() {
        let (tokens, store, gate) = setup();
        let token = tokens.issue("alice@x.com", now()).unwrap().token;

        let ctx = gate.authenticate(Some(&token), now());
        let principal = ctx.principal().unwrap();
        assert_eq!(principal.email, "alice@x.com");
        assert_eq!(principal.roles, RoleSet::from(Role::User));

        // Promote after issuance: the same token now carries the new role.
        let mut credential = store.find_by_email("alice@x.com").unwrap();
        credential.role = Role::Admin;
        store.update(credential).unwrap();

        let ctx = gate.authenticate(Some(&token), now());
        assert!(ctx.principal().unwrap().is_admin());
    }

    #[test]
    fn bad_tokens_fall_back_to_anonymous() {
        let (tokens, _, gate) = setup();
        let token = tokens.issue("alice@x.com", now()).unwrap().token;

        assert_eq!(gate.authenticate(Some("garbage"), now()), SecurityContext::Anonymous);
        assert_eq!(
            gate.authenticate(Some(&token), now() + Duration::hours(25)),
            SecurityContext::Anonymous
        );
        assert_eq!(
            gate.resolve(&token, now() + Duration::hours(25)),
            Err(GateRejection::Token(TokenError::Expired))
        );
    }

    #[test]
    fn deleted_account_fails_closed() {
        let (tokens, store, gate) = setup();
        let token = tokens.issue("alice@x.com", now()).unwrap().token;
        let id = store.find_by_email("alice@x.com").unwrap().id;
        store.delete_by_id(id);

        assert_eq!(gate.resolve(&token, now()), Err(GateRejection::UnknownSubject));
        assert_eq!(gate.authenticate(Some(&token), now()), SecurityContext::Anonymous);
    }
}
