//! Storage ports for tasks and comments.

use std::sync::Arc;

use tasktrack_core::{CommentId, DomainResult, TaskId, UserId};

use crate::comment::{Comment, NewComment};
use crate::status::{TaskPriority, TaskStatus};
use crate::task::{NewTask, Task};

pub trait TaskStore: Send + Sync {
    /// Validate and persist, assigning the next id.
    fn create(&self, task: NewTask) -> DomainResult<Task>;
    fn get(&self, id: TaskId) -> Option<Task>;
    fn list(&self) -> Vec<Task>;
    fn by_executor(&self, executor: UserId) -> Vec<Task>;
    fn by_author(&self, author: UserId) -> Vec<Task>;
    fn update_status(&self, id: TaskId, status: TaskStatus) -> DomainResult<Task>;
    fn update_priority(&self, id: TaskId, priority: TaskPriority) -> DomainResult<Task>;
    /// Returns `true` when a record was removed.
    fn delete(&self, id: TaskId) -> bool;
    /// Clear author/executor references to a removed account. Returns the number of tasks touched.
    fn forget_user(&self, user: UserId) -> usize;
}

pub trait CommentStore: Send + Sync {
    fn add(&self, comment: NewComment) -> DomainResult<Comment>;
    fn get(&self, id: CommentId) -> Option<Comment>;
    /// Oldest first.
    fn list_by_task(&self, task_id: TaskId) -> Vec<Comment>;
    fn delete(&self, id: CommentId) -> bool;
    fn delete_by_task(&self, task_id: TaskId) -> usize;
}

impl<S> TaskStore for Arc<S>
where
    S: TaskStore + ?Sized,
{
    fn create(&self, task: NewTask) -> DomainResult<Task> {
        (**self).create(task)
    }

    fn get(&self, id: TaskId) -> Option<Task> {
        (**self).get(id)
    }

    fn list(&self) -> Vec<Task> {
        (**self).list()
    }

    fn by_executor(&self, executor: UserId) -> Vec<Task> {
        (**self).by_executor(executor)
    }

    fn by_author(&self, author: UserId) -> Vec<Task> {
        (**self).by_author(author)
    }

    fn update_status(&self, id: TaskId, status: TaskStatus) -> DomainResult<Task> {
        (**self).update_status(id, status)
    }

    fn update_priority(&self, id: TaskId, priority: TaskPriority) -> DomainResult<Task> {
        (**self).update_priority(id, priority)
    }

    fn delete(&self, id: TaskId) -> bool {
        (**self).delete(id)
    }

    fn forget_user(&self, user: UserId) -> usize {
        (**self).forget_user(user)
    }
}

impl<S> CommentStore for Arc<S>
where
    S: CommentStore + ?Sized,
{
    fn add(&self, comment: NewComment) -> DomainResult<Comment> {
        (**self).add(comment)
    }

    fn get(&self, id: CommentId) -> Option<Comment> {
        (**self).get(id)
    }

    fn list_by_task(&self, task_id: TaskId) -> Vec<Comment> {
        (**self).list_by_task(task_id)
    }

    fn delete(&self, id: CommentId) -> bool {
        (**self).delete(id)
    }

    fn delete_by_task(&self, task_id: TaskId) -> usize {
        (**self).delete_by_task(task_id)
    }
}
