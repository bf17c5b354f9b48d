//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO network dependencies (only serde/chrono/thiserror).

mod error;
mod todo;
mod user;

pub use error::{DomainError, DomainResult};
pub use todo::{Todo, TodoFilter, TodoId, TodoStats};
pub use user::{AuthUser, UserProfile};
