//! In-crate test doubles for the store ports.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tasktrack_core::{TaskId, UserId};

use crate::authorize::{OwnershipFact, TaskOwnership};
use crate::credential::{Credential, CredentialError, CredentialStore, NewCredential};

#[derive(Debug, Default)]
pub struct MemoryCredentials {
    rows: Mutex<BTreeMap<UserId, Credential>>,
}

impl CredentialStore for MemoryCredentials {
    fn find_by_email(&self, email: &str) -> Option<Credential> {
        let rows = self.rows.lock().unwrap();
        rows.values().find(|c| c.email == email).cloned()
    }

    fn find_by_id(&self, id: UserId) -> Option<Credential> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    fn list(&self) -> Vec<Credential> {
        self.rows.lock().unwrap().values().cloned().collect()
    }

    fn insert(&self, credential: NewCredential) -> Result<Credential, CredentialError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|c| c.email == credential.email) {
            return Err(CredentialError::DuplicateEmail);
        }
        let id = UserId::new(rows.len() as i64 + 1);
        let stored = Credential {
            id,
            email: credential.email,
            password_hash: credential.password_hash,
            role: credential.role,
        };
        rows.insert(id, stored.clone());
        Ok(stored)
    }

    fn update(&self, credential: Credential) -> Result<Credential, CredentialError> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&credential.id) {
            return Err(CredentialError::NotFound);
        }
        if rows
            .values()
            .any(|c| c.id != credential.id && c.email == credential.email)
        {
            return Err(CredentialError::DuplicateEmail);
        }
        rows.insert(credential.id, credential.clone());
        Ok(credential)
    }

    fn delete_by_id(&self, id: UserId) -> bool {
        self.rows.lock().unwrap().remove(&id).is_some()
    }
}

#[derive(Debug, Default)]
pub struct MemoryTasks {
    facts: Vec<OwnershipFact>,
    lookups: AtomicUsize,
}

impl MemoryTasks {
    pub fn with(facts: Vec<OwnershipFact>) -> Self {
        Self {
            facts,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl TaskOwnership for MemoryTasks {
    fn ownership(&self, task_id: TaskId) -> Option<OwnershipFact> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.facts.iter().find(|f| f.task_id == task_id).copied()
    }
}
