use std::sync::Arc;

use thiserror::Error;

use tasktrack_core::{Entity, UserId};

use crate::{Role, TokenError};

/// One-way password hash as stored. Never serialized, redacted in `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn from_stored(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordHash(**redacted**)")
    }
}

/// Persisted account record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub id: UserId,
    pub email: String,
    pub password_hash: PasswordHash,
    pub role: Role,
}

impl Entity for Credential {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

/// Account fields before the store has assigned an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCredential {
    pub email: String,
    pub password_hash: PasswordHash,
    pub role: Role,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Unknown email or wrong password; deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email is already registered")]
    DuplicateEmail,

    #[error("account not found")]
    NotFound,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Credential persistence as seen by the auth core.
///
/// Implementations must keep emails unique and apply the uniqueness check and
/// the write atomically.
pub trait CredentialStore: Send + Sync {
    fn find_by_email(&self, email: &str) -> Option<Credential>;
    fn find_by_id(&self, id: UserId) -> Option<Credential>;
    fn list(&self) -> Vec<Credential>;
    /// Insert a new account, assigning its id. Fails with `DuplicateEmail`.
    fn insert(&self, credential: NewCredential) -> Result<Credential, CredentialError>;
    /// Replace an existing account. Fails with `NotFound` or `DuplicateEmail`.
    fn update(&self, credential: Credential) -> Result<Credential, CredentialError>;
    /// Returns `true` when a record was removed.
    fn delete_by_id(&self, id: UserId) -> bool;
}

impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    fn find_by_email(&self, email: &str) -> Option<Credential> {
        (**self).find_by_email(email)
    }

    fn find_by_id(&self, id: UserId) -> Option<Credential> {
        (**self).find_by_id(id)
    }

    fn list(&self) -> Vec<Credential> {
        (**self).list()
    }

    fn insert(&self, credential: NewCredential) -> Result<Credential, CredentialError> {
        (**self).insert(credential)
    }

    fn update(&self, credential: Credential) -> Result<Credential, CredentialError> {
        (**self).update(credential)
    }

    fn delete_by_id(&self, id: UserId) -> bool {
        (**self).delete_by_id(id)
    }
}

/// Trim and lowercase an email, rejecting obviously invalid input.
pub fn normalize_email(raw: &str) -> Result<String, CredentialError> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if !valid || email.chars().any(char::is_whitespace) {
        return Err(CredentialError::Validation("invalid email format".to_string()));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_email("  Alice@X.com ").unwrap(), "alice@x.com");
    }

    #[test]
    fn rejects_invalid_emails() {
        for raw in ["", "alice", "@x.com", "alice@", "a@b@c", "al ice@x.com"] {
            assert!(
                matches!(normalize_email(raw), Err(CredentialError::Validation(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::from_stored("$2b$04$secretsecretsecret");
        assert!(!format!("{hash:?}").contains("secret"));
    }
}
