//! In-Memory Backend
//!
//! Deterministic stand-in for the hosted backend with failure injection and
//! call recording. Used by tests and as an offline demo backend.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::traits::TodoBackend;
use crate::domain::{DomainError, DomainResult, Todo, TodoId, UserProfile};

/// Backend operations, for failure injection and call assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendOp {
    ListMyTodos,
    GetTodo,
    AddTodo,
    ToggleTodo,
    UpdateTodoText,
    DeleteTodo,
    UpsertUser,
}

impl BackendOp {
    pub fn label(&self) -> &'static str {
        match self {
            BackendOp::ListMyTodos => "getMyTodos",
            BackendOp::GetTodo => "getTodoById",
            BackendOp::AddTodo => "addTodo",
            BackendOp::ToggleTodo => "toggleTodoCompletion",
            BackendOp::UpdateTodoText => "updateTodoText",
            BackendOp::DeleteTodo => "deleteTodo",
            BackendOp::UpsertUser => "upsertUser",
        }
    }
}

#[derive(Default)]
struct MemoryState {
    /// Newest first, like the hosted `GetMyTodos` ordering
    todos: Vec<Todo>,
    next_id: u64,
    failures: HashMap<BackendOp, String>,
    calls: Vec<BackendOp>,
    users: Vec<UserProfile>,
}

/// Todo backend held entirely in process memory
#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<MemoryState>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an authoritative list (kept in the given order)
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let backend = Self::new();
        backend.lock().todos = todos;
        backend
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make every following call of `op` fail with `message`
    pub fn fail(&self, op: BackendOp, message: impl Into<String>) {
        self.lock().failures.insert(op, message.into());
    }

    /// Stop failing `op`
    pub fn recover(&self, op: BackendOp) {
        self.lock().failures.remove(&op);
    }

    /// Authoritative server-side list
    pub fn todos(&self) -> Vec<Todo> {
        self.lock().todos.clone()
    }

    /// Replace the server-side list (e.g. changes made from another device)
    pub fn set_todos(&self, todos: Vec<Todo>) {
        self.lock().todos = todos;
    }

    /// Every operation invoked so far, in order
    pub fn calls(&self) -> Vec<BackendOp> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, op: BackendOp) -> usize {
        self.lock().calls.iter().filter(|c| **c == op).count()
    }

    /// Profiles received through `upsert_user`
    pub fn users(&self) -> Vec<UserProfile> {
        self.lock().users.clone()
    }

    /// Record the call and return the injected failure, if any
    fn begin(&self, op: BackendOp) -> DomainResult<MutexGuard<'_, MemoryState>> {
        let mut state = self.lock();
        state.calls.push(op);
        if let Some(message) = state.failures.get(&op).cloned() {
            return Err(DomainError::backend(op.label(), message));
        }
        Ok(state)
    }
}

#[async_trait(?Send)]
impl TodoBackend for InMemoryBackend {
    async fn list_my_todos(&self) -> DomainResult<Vec<Todo>> {
        let state = self.begin(BackendOp::ListMyTodos)?;
        Ok(state.todos.clone())
    }

    async fn get_todo(&self, id: &str) -> DomainResult<Option<Todo>> {
        let state = self.begin(BackendOp::GetTodo)?;
        Ok(state.todos.iter().find(|t| t.id == id).cloned())
    }

    async fn add_todo(&self, text: &str) -> DomainResult<TodoId> {
        let mut state = self.begin(BackendOp::AddTodo)?;
        state.next_id += 1;
        let id = format!("todo-{}", state.next_id);
        state.todos.insert(0, Todo::new(id.clone(), text, Utc::now()));
        Ok(id)
    }

    async fn toggle_todo(&self, id: &str, completed: bool) -> DomainResult<()> {
        let mut state = self.begin(BackendOp::ToggleTodo)?;
        if let Some(todo) = state.todos.iter_mut().find(|t| t.id == id) {
            todo.completed = completed;
            todo.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_todo_text(&self, id: &str, text: &str) -> DomainResult<()> {
        let mut state = self.begin(BackendOp::UpdateTodoText)?;
        if let Some(todo) = state.todos.iter_mut().find(|t| t.id == id) {
            todo.text = text.to_string();
            todo.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete_todo(&self, id: &str) -> DomainResult<()> {
        let mut state = self.begin(BackendOp::DeleteTodo)?;
        state.todos.retain(|t| t.id != id);
        Ok(())
    }

    async fn upsert_user(&self, profile: &UserProfile) -> DomainResult<()> {
        let mut state = self.begin(BackendOp::UpsertUser)?;
        state.users.push(profile.clone());
        Ok(())
    }
}
