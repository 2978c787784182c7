use serde::{Deserialize, Serialize};

use tasktrack_core::{DomainError, DomainResult, Entity, TaskId, UserId};

use crate::status::{TaskPriority, TaskStatus};

/// A unit of work with an optional author and executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub author_id: Option<UserId>,
    pub executor_id: Option<UserId>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
}

impl Entity for Task {
    type Id = TaskId;

    fn id(&self) -> TaskId {
        self.id
    }
}

/// Task fields before the store assigns an id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub author_id: Option<UserId>,
    pub executor_id: Option<UserId>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
}

impl NewTask {
    /// Trim text fields and reject a blank title.
    pub fn validated(mut self) -> DomainResult<Self> {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        if self.title.is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        Ok(self)
    }

    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            author_id: self.author_id,
            executor_id: self.executor_id,
            status: self.status,
            priority: self.priority,
        }
    }
}

impl Task {
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    pub fn set_priority(&mut self, priority: TaskPriority) {
        self.priority = priority;
    }

    /// Drop references to a removed account.
    pub fn forget_user(&mut self, user: UserId) -> bool {
        let mut changed = false;
        if self.executor_id == Some(user) {
            self.executor_id = None;
            changed = true;
        }
        if self.author_id == Some(user) {
            self.author_id = None;
            changed = true;
        }
        changed
    }
}
