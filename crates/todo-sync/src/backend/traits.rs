//! Backend Layer - Core Trait
//!
//! Defines the operations the app consumes from the hosted backend.
//! Implementations can use Data Connect over HTTPS, in-memory, etc.

use async_trait::async_trait;

use crate::domain::{DomainResult, Todo, TodoId, UserProfile};

/// Todo operations exposed by the hosted backend
///
/// Authorization is implicit: every call acts on the signed-in user's data.
/// All operations are async remote calls that may fail.
#[async_trait(?Send)]
pub trait TodoBackend {
    /// List the current user's todos, newest first
    async fn list_my_todos(&self) -> DomainResult<Vec<Todo>>;

    /// Point lookup by id
    async fn get_todo(&self, id: &str) -> DomainResult<Option<Todo>>;

    /// Create a todo; the server assigns id and timestamps
    async fn add_todo(&self, text: &str) -> DomainResult<TodoId>;

    /// Set the completion flag
    async fn toggle_todo(&self, id: &str, completed: bool) -> DomainResult<()>;

    /// Replace the todo text
    async fn update_todo_text(&self, id: &str, text: &str) -> DomainResult<()>;

    /// Delete by id
    async fn delete_todo(&self, id: &str) -> DomainResult<()>;

    /// Mirror the signed-in user's profile into the backend
    async fn upsert_user(&self, profile: &UserProfile) -> DomainResult<()>;
}
