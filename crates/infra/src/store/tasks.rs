use tracing::debug;

use tasktrack_auth::{OwnershipFact, TaskOwnership};
use tasktrack_core::{DomainError, DomainResult, TaskId, UserId};
use tasktrack_tasks::{NewTask, Task, TaskPriority, TaskStatus, TaskStore};

use super::table::InMemoryTable;

#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    table: InMemoryTable<Task>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn modify(&self, id: TaskId, change: impl FnOnce(&mut Task)) -> DomainResult<Task> {
        self.table
            .modify(id, change)
            .ok_or_else(|| DomainError::not_found(format!("task {id}")))
    }
}

impl TaskStore for InMemoryTaskStore {
    fn create(&self, task: NewTask) -> DomainResult<Task> {
        let task = task.validated()?;
        let mut rows = self.table.write();
        let stored = task.into_task(rows.allocate_id());
        rows.put(stored.clone());
        Ok(stored)
    }

    fn get(&self, id: TaskId) -> Option<Task> {
        self.table.get(id)
    }

    fn list(&self) -> Vec<Task> {
        self.table.list()
    }

    fn by_executor(&self, executor: UserId) -> Vec<Task> {
        self.table.filter(|t| t.executor_id == Some(executor))
    }

    fn by_author(&self, author: UserId) -> Vec<Task> {
        self.table.filter(|t| t.author_id == Some(author))
    }

    fn update_status(&self, id: TaskId, status: TaskStatus) -> DomainResult<Task> {
        self.modify(id, |t| t.set_status(status))
    }

    fn update_priority(&self, id: TaskId, priority: TaskPriority) -> DomainResult<Task> {
        self.modify(id, |t| t.set_priority(priority))
    }

    fn delete(&self, id: TaskId) -> bool {
        self.table.remove(id).is_some()
    }

    fn forget_user(&self, user: UserId) -> usize {
        let mut rows = self.table.write();
        let touched = rows
            .values_mut()
            .map(|t| t.forget_user(user))
            .filter(|changed| *changed)
            .count();
        if touched > 0 {
            debug!(user_id = %user, touched, "cleared task references to removed account");
        }
        touched
    }
}

impl TaskOwnership for InMemoryTaskStore {
    fn ownership(&self, task_id: TaskId) -> Option<OwnershipFact> {
        self.table.read().get(task_id).map(|t| OwnershipFact {
            task_id: t.id,
            executor_id: t.executor_id,
            author_id: t.author_id,
        })
    }
}
