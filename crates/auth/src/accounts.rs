//! Registration, login and profile updates.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use tasktrack_core::UserId;

use crate::credential::{
    Credential, CredentialError, CredentialStore, NewCredential, PasswordHash, normalize_email,
};
use crate::password::PasswordHasher;
use crate::token::{IssuedToken, TokenService};
use crate::Role;

// Verified against on unknown emails so both login failure paths pay for one bcrypt check.
const DECOY_PASSWORD: &str = "tasktrack-decoy-password";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Fields to change on an existing account; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

pub struct AccountService<S> {
    store: S,
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
    decoy: PasswordHash,
}

impl<S: CredentialStore> AccountService<S> {
    pub fn new(
        store: S,
        hasher: PasswordHasher,
        tokens: Arc<TokenService>,
    ) -> Result<Self, CredentialError> {
        let decoy = hasher.hash(DECOY_PASSWORD)?;
        Ok(Self {
            store,
            hasher,
            tokens,
            decoy,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn register(&self, registration: Registration) -> Result<Credential, CredentialError> {
        let email = normalize_email(&registration.email)?;
        let password_hash = self.hasher.hash(&registration.password)?;

        let credential = self.store.insert(NewCredential {
            email,
            password_hash,
            role: registration.role,
        })?;

        info!(user_id = %credential.id, role = %credential.role, "account registered");
        Ok(credential)
    }

    /// Verify the password and issue a token.
    ///
    /// Every failure is reported as `InvalidCredentials`.
    pub fn login(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, CredentialError> {
        let credential = normalize_email(email)
            .ok()
            .and_then(|email| self.store.find_by_email(&email));

        let verified = match &credential {
            Some(c) => self.hasher.verify(password, &c.password_hash),
            None => {
                let _ = self.hasher.verify(password, &self.decoy);
                false
            }
        };

        let Some(credential) = credential.filter(|_| verified) else {
            warn!(email = %email.trim(), "login rejected");
            return Err(CredentialError::InvalidCredentials);
        };

        let issued = self.tokens.issue(&credential.email, now)?;
        info!(user_id = %credential.id, "token issued");
        Ok(issued)
    }

    pub fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<Credential, CredentialError> {
        let mut credential = self.store.find_by_id(id).ok_or(CredentialError::NotFound)?;

        if let Some(email) = update.email {
            credential.email = normalize_email(&email)?;
        }
        if let Some(password) = update.password {
            credential.password_hash = self.hasher.hash(&password)?;
        }
        if let Some(role) = update.role {
            credential.role = role;
        }

        let credential = self.store.update(credential)?;
        info!(user_id = %credential.id, "account updated");
        Ok(credential)
    }

    pub fn delete(&self, id: UserId) -> Result<(), CredentialError> {
        if !self.store.delete_by_id(id) {
            return Err(CredentialError::NotFound);
        }
        info!(user_id = %id, "account deleted");
        Ok(())
    }

    /// Create the account unless the email is already registered.
    pub fn ensure_account(&self, registration: Registration) -> Result<Credential, CredentialError> {
        let email = normalize_email(&registration.email)?;
        if let Some(existing) = self.store.find_by_email(&email) {
            return Ok(existing);
        }
        self.register(registration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::MIN_COST;
    use crate::testing::MemoryCredentials;
    use chrono::TimeZone;

    fn service() -> AccountService<Arc<MemoryCredentials>> {
        let tokens = Arc::new(TokenService::new(b"accounts-test-secret"));
        AccountService::new(
            Arc::new(MemoryCredentials::default()),
            PasswordHasher::new(MIN_COST),
            tokens,
        )
        .unwrap()
    }

    fn alice() -> Registration {
        Registration {
            email: "Alice@X.com".to_string(),
            password: "pw1".to_string(),
            role: Role::User,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn register_hashes_and_normalizes() {
        let svc = service();
        let credential = svc.register(alice()).unwrap();

        assert_eq!(credential.email, "alice@x.com");
        assert_eq!(credential.role, Role::User);
        assert_ne!(credential.password_hash.as_str(), "pw1");
        assert_eq!(svc.store().find_by_email("alice@x.com"), Some(credential));
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let svc = service();
        svc.register(alice()).unwrap();

        let again = Registration {
            email: " ALICE@x.com".to_string(),
            ..alice()
        };
        assert_eq!(svc.register(again), Err(CredentialError::DuplicateEmail));
    }

    #[test]
    fn login_issues_token_for_subject() {
        let svc = service();
        svc.register(alice()).unwrap();

        let issued = svc.login("alice@x.com", "pw1", now()).unwrap();
        assert_eq!(issued.claims.sub, "alice@x.com");
        assert_eq!(issued.claims.issued_at, now());
    }

    #[test]
    fn login_failures_are_indistinguishable() {
        let svc = service();
        svc.register(alice()).unwrap();

        let wrong_password = svc.login("alice@x.com", "nope", now());
        let unknown_email = svc.login("bob@x.com", "pw1", now());
        let garbage_email = svc.login("not an email", "pw1", now());

        assert_eq!(wrong_password, Err(CredentialError::InvalidCredentials));
        assert_eq!(unknown_email, wrong_password);
        assert_eq!(garbage_email, wrong_password);
        assert_eq!(
            wrong_password.unwrap_err().to_string(),
            unknown_email.unwrap_err().to_string()
        );
    }

    #[test]
    fn update_profile_rehashes_password() {
        let svc = service();
        let credential = svc.register(alice()).unwrap();

        let updated = svc
            .update_profile(
                credential.id,
                ProfileUpdate {
                    password: Some("pw2".to_string()),
                    role: Some(Role::Admin),
                    ..ProfileUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.role, Role::Admin);
        assert!(svc.login("alice@x.com", "pw2", now()).is_ok());
        assert_eq!(
            svc.login("alice@x.com", "pw1", now()),
            Err(CredentialError::InvalidCredentials)
        );
    }

    #[test]
    fn update_unknown_account_is_not_found() {
        let svc = service();
        let result = svc.update_profile(UserId::new(99), ProfileUpdate::default());
        assert_eq!(result, Err(CredentialError::NotFound));
    }

    #[test]
    fn ensure_account_is_idempotent() {
        let svc = service();
        let first = svc.ensure_account(alice()).unwrap();
        let second = svc.ensure_account(alice()).unwrap();
        assert_eq!(first, second);
        assert_eq!(svc.store().list().len(), 1);
    }

    #[test]
    fn delete_missing_account_is_not_found() {
        let svc = service();
        let credential = svc.register(alice()).unwrap();
        assert_eq!(svc.delete(credential.id), Ok(()));
        assert_eq!(svc.delete(credential.id), Err(CredentialError::NotFound));
    }
}
