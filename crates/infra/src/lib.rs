//! Infrastructure layer: storage adapters for the auth and task ports.

pub mod store;

pub use store::{
    InMemoryCommentStore, InMemoryCredentialStore, InMemoryTable, InMemoryTaskStore, Rows,
};
