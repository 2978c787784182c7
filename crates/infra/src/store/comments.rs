use tasktrack_core::{CommentId, DomainResult, TaskId};
use tasktrack_tasks::{Comment, CommentStore, NewComment};

use super::table::InMemoryTable;

#[derive(Debug, Default)]
pub struct InMemoryCommentStore {
    table: InMemoryTable<Comment>,
}

impl InMemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommentStore for InMemoryCommentStore {
    fn add(&self, comment: NewComment) -> DomainResult<Comment> {
        let comment = comment.validated()?;
        let mut rows = self.table.write();
        let stored = comment.into_comment(rows.allocate_id());
        rows.put(stored.clone());
        Ok(stored)
    }

    fn get(&self, id: CommentId) -> Option<Comment> {
        self.table.get(id)
    }

    fn list_by_task(&self, task_id: TaskId) -> Vec<Comment> {
        // Ids grow monotonically, so id order is insertion order.
        self.table.filter(|c| c.task_id == task_id)
    }

    fn delete(&self, id: CommentId) -> bool {
        self.table.remove(id).is_some()
    }

    fn delete_by_task(&self, task_id: TaskId) -> usize {
        self.table.write().remove_where(|c| c.task_id == task_id)
    }
}
