//! `tasktrack-core` — shared domain building blocks.
//!
//! Identifiers, the domain error model and the `Entity` trait used by every
//! other crate. No IO, no framework code.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CommentId, TaskId, UserId};
