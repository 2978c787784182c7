//! In-memory stores for development and tests.

pub mod comments;
pub mod credentials;
pub mod table;
pub mod tasks;

pub use comments::InMemoryCommentStore;
pub use credentials::InMemoryCredentialStore;
pub use table::{InMemoryTable, Rows};
pub use tasks::InMemoryTaskStore;
