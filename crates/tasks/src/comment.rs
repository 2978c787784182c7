use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tasktrack_core::{CommentId, DomainError, DomainResult, Entity, TaskId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub task_id: TaskId,
    pub author_id: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for Comment {
    type Id = CommentId;

    fn id(&self) -> CommentId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub task_id: TaskId,
    pub author_id: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl NewComment {
    pub fn validated(mut self) -> DomainResult<Self> {
        self.text = self.text.trim().to_string();
        if self.text.is_empty() {
            return Err(DomainError::validation("comment text cannot be empty"));
        }
        Ok(self)
    }

    pub fn into_comment(self, id: CommentId) -> Comment {
        Comment {
            id,
            task_id: self.task_id,
            author_id: self.author_id,
            text: self.text,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn draft(text: &str) -> NewComment {
        NewComment {
            task_id: TaskId::new(7),
            author_id: UserId::new(1),
            text: text.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn keeps_trimmed_text() {
        let comment = draft("  looks good ").validated().unwrap().into_comment(CommentId::new(1));
        assert_eq!(comment.text, "looks good");
        assert_eq!(comment.task_id, TaskId::new(7));
    }

    proptest! {
        #[test]
        fn whitespace_only_text_is_rejected(text in "[ \t\n]{0,16}") {
            prop_assert!(draft(&text).validated().is_err());
        }
    }
}
