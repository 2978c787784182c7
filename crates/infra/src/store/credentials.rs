use tasktrack_auth::{Credential, CredentialError, CredentialStore, NewCredential};
use tasktrack_core::UserId;

use super::table::InMemoryTable;

/// Account records keyed by id, unique by email.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    table: InMemoryTable<Credential>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn find_by_email(&self, email: &str) -> Option<Credential> {
        self.table.find(|c| c.email == email)
    }

    fn find_by_id(&self, id: UserId) -> Option<Credential> {
        self.table.get(id)
    }

    fn list(&self) -> Vec<Credential> {
        self.table.list()
    }

    fn insert(&self, credential: NewCredential) -> Result<Credential, CredentialError> {
        let mut rows = self.table.write();
        if rows.values().any(|c| c.email == credential.email) {
            return Err(CredentialError::DuplicateEmail);
        }

        let stored = Credential {
            id: rows.allocate_id(),
            email: credential.email,
            password_hash: credential.password_hash,
            role: credential.role,
        };
        rows.put(stored.clone());
        Ok(stored)
    }

    fn update(&self, credential: Credential) -> Result<Credential, CredentialError> {
        let mut rows = self.table.write();
        if rows.get(credential.id).is_none() {
            return Err(CredentialError::NotFound);
        }
        if rows
            .values()
            .any(|c| c.id != credential.id && c.email == credential.email)
        {
            return Err(CredentialError::DuplicateEmail);
        }

        rows.put(credential.clone());
        Ok(credential)
    }

    fn delete_by_id(&self, id: UserId) -> bool {
        self.table.remove(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tasktrack_auth::{PasswordHash, Role};

    fn new_credential(email: &str) -> NewCredential {
        NewCredential {
            email: email.to_string(),
            password_hash: PasswordHash::from_stored("$2b$04$hash"),
            role: Role::User,
        }
    }

    #[test]
    fn insert_assigns_ids_and_rejects_duplicates() {
        let store = InMemoryCredentialStore::new();
        let alice = store.insert(new_credential("alice@x.com")).unwrap();
        let bob = store.insert(new_credential("bob@x.com")).unwrap();
        assert_eq!(alice.id, UserId::new(1));
        assert_eq!(bob.id, UserId::new(2));

        let err = store.insert(new_credential("alice@x.com")).unwrap_err();
        assert_eq!(err, CredentialError::DuplicateEmail);
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn update_enforces_unique_email() {
        let store = InMemoryCredentialStore::new();
        store.insert(new_credential("alice@x.com")).unwrap();
        let mut bob = store.insert(new_credential("bob@x.com")).unwrap();

        bob.email = "alice@x.com".to_string();
        assert_eq!(store.update(bob.clone()).unwrap_err(), CredentialError::DuplicateEmail);

        bob.email = "robert@x.com".to_string();
        bob.role = Role::Admin;
        store.update(bob).unwrap();
        let found = store.find_by_email("robert@x.com").unwrap();
        assert_eq!(found.role, Role::Admin);
        assert!(store.find_by_email("bob@x.com").is_none());
    }

    #[test]
    fn update_of_missing_account_is_not_found() {
        let store = InMemoryCredentialStore::new();
        let ghost = Credential {
            id: UserId::new(42),
            email: "ghost@x.com".to_string(),
            password_hash: PasswordHash::from_stored("h"),
            role: Role::User,
        };
        assert_eq!(store.update(ghost).unwrap_err(), CredentialError::NotFound);
    }

    #[test]
    fn concurrent_registration_of_one_email_succeeds_once() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || store.insert(new_credential("race@x.com")).is_ok())
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
        assert_eq!(store.list().len(), 1);
    }
}
