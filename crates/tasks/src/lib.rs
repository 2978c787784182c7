//! `tasktrack-tasks` — task and comment domain model.
//!
//! Plain records with validation plus the storage ports the API layer talks
//! to. Access control lives in `tasktrack-auth`.

pub mod comment;
pub mod status;
pub mod store;
pub mod task;

pub use comment::{Comment, NewComment};
pub use status::{TaskPriority, TaskStatus, UnknownVariant};
pub use store::{CommentStore, TaskStore};
pub use task::{NewTask, Task};
