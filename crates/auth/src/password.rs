//! Salted, slow password hashing (bcrypt).

use crate::credential::{CredentialError, PasswordHash};

/// Minimum cost accepted by bcrypt; handy for tests.
pub const MIN_COST: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, plaintext: &str) -> Result<PasswordHash, CredentialError> {
        if plaintext.is_empty() {
            return Err(CredentialError::Validation("password must not be empty".to_string()));
        }
        bcrypt::hash(plaintext, self.cost)
            .map(PasswordHash::from_stored)
            .map_err(|e| CredentialError::Hashing(e.to_string()))
    }

    /// Constant-outcome comparison: a corrupt stored hash is a mismatch.
    pub fn verify(&self, plaintext: &str, hash: &PasswordHash) -> bool {
        bcrypt::verify(plaintext, hash.as_str()).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_and_verifiable() {
        let hasher = PasswordHasher::new(MIN_COST);
        let a = hasher.hash("pw1").unwrap();
        let b = hasher.hash("pw1").unwrap();

        assert_ne!(a, b);
        assert_ne!(a.as_str(), "pw1");
        assert!(hasher.verify("pw1", &a));
        assert!(!hasher.verify("pw2", &a));
    }

    #[test]
    fn empty_password_is_rejected() {
        let err = PasswordHasher::new(MIN_COST).hash("").unwrap_err();
        assert!(matches!(err, CredentialError::Validation(_)));
    }

    #[test]
    fn corrupt_hash_never_verifies() {
        let hasher = PasswordHasher::new(MIN_COST);
        assert!(!hasher.verify("pw1", &PasswordHash::from_stored("not-a-bcrypt-hash")));
    }
}
