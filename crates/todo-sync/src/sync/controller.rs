//! Optimistic Sync Controller
//!
//! Mediates list/add/toggle/edit/delete between the UI and the backend.
//!
//! The remote call always resolves before local state changes. On success
//! toggle/edit/delete patch the local list; add instead reloads since the
//! server assigns the id. On failure toggle/edit/delete reload the
//! authoritative list; a failed add only surfaces its error.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::state::{LoadStatus, TodoListState};
use crate::auth::SessionContext;
use crate::backend::TodoBackend;
use crate::domain::{AuthUser, DomainError, DomainResult};

/// Pause between sign-in and the first list load, so the backend sees the new token
pub const INITIAL_LOAD_DELAY: Duration = Duration::from_millis(100);

const LOAD_FAILED: &str = "Failed to load todos";
const ADD_FAILED: &str = "Failed to add todo";
const UPDATE_FAILED: &str = "Failed to update todo";
const DELETE_FAILED: &str = "Failed to delete todo";

/// Owner of the local todo list
pub struct SyncController<B: ?Sized> {
    backend: Arc<B>,
    session: SessionContext,
    state: Arc<watch::Sender<TodoListState>>,
}

impl<B: ?Sized> Clone for SyncController<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            session: self.session.clone(),
            state: self.state.clone(),
        }
    }
}

impl<B: TodoBackend + ?Sized> SyncController<B> {
    pub fn new(backend: Arc<B>, session: SessionContext) -> Self {
        let (state, _) = watch::channel(TodoListState::default());
        Self {
            backend,
            session,
            state: Arc::new(state),
        }
    }

    /// Current state snapshot
    pub fn snapshot(&self) -> TodoListState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<TodoListState> {
        self.state.subscribe()
    }

    pub fn dismiss_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    fn surface(&self, err: &DomainError, fallback: &str) {
        let message = err.user_message(fallback);
        tracing::warn!("{}", message);
        self.state.send_modify(|s| s.error = Some(message));
    }

    fn require_session(&self, action: &str) -> DomainResult<()> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(DomainError::AuthRequired(format!(
                "User must be authenticated to {}",
                action
            )))
        }
    }

    /// React to a session transition. Returns `true` when the caller should
    /// wait [`INITIAL_LOAD_DELAY`] and then call [`Self::load_todos`].
    pub fn handle_session_change(&self, user: Option<&AuthUser>) -> bool {
        match user {
            Some(user) => {
                tracing::info!(uid = %user.uid, "Session started, scheduling initial load");
                true
            }
            None => {
                tracing::info!("Session ended, clearing todos");
                self.state.send_modify(|s| {
                    s.replace_todos(Vec::new());
                    s.status = LoadStatus::Idle;
                });
                false
            }
        }
    }

    // ========================
    // Read
    // ========================

    /// Replace the local list with the backend's. On failure the list keeps
    /// its last-known value and the error is surfaced.
    pub async fn load_todos(&self) -> DomainResult<()> {
        match self.fetch().await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.surface(&e, LOAD_FAILED);
                Err(e)
            }
        }
    }

    /// Fetch without surfacing; leaves `LoadError` on failure
    async fn fetch(&self) -> DomainResult<()> {
        self.require_session("fetch todos")?;
        self.state.send_modify(|s| s.status = LoadStatus::Loading);

        match self.backend.list_my_todos().await {
            Ok(todos) => {
                tracing::info!(count = todos.len(), "Loaded todos");
                self.state.send_modify(|s| {
                    s.replace_todos(todos);
                    s.status = LoadStatus::Loaded;
                });
                Ok(())
            }
            Err(e) => {
                let message = e.user_message(LOAD_FAILED);
                self.state.send_modify(|s| s.status = LoadStatus::LoadError(message));
                Err(e)
            }
        }
    }

    /// Reload after a failed mutation; the mutation's error stays surfaced
    async fn resync(&self) {
        if let Err(e) = self.fetch().await {
            tracing::warn!("Resync after failed mutation also failed: {}", e);
        }
    }

    // ========================
    // Mutations
    // ========================

    /// Create a todo, then reload (no local insert: the server assigns the id)
    pub async fn add_todo(&self, text: &str) -> DomainResult<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::InvalidInput("Todo text must not be empty".to_string()));
        }

        let result = match self.require_session("add todos") {
            Ok(()) => self.backend.add_todo(text).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(id) => {
                tracing::debug!(%id, "Todo created, reloading");
                self.load_todos().await
            }
            Err(e) => {
                self.surface(&e, ADD_FAILED);
                Err(e)
            }
        }
    }

    /// Flip the completion flag of `id`; unknown ids are ignored
    pub async fn toggle_todo(&self, id: &str) -> DomainResult<()> {
        let Some(completed) = self.state.borrow().find(id).map(|t| !t.completed) else {
            tracing::debug!(id, "Toggle for unknown todo ignored");
            return Ok(());
        };

        match self.backend.toggle_todo(id, completed).await {
            Ok(()) => {
                self.state.send_modify(|s| s.patch_todo(id, |t| t.completed = completed));
                Ok(())
            }
            Err(e) => {
                self.surface(&e, UPDATE_FAILED);
                self.resync().await;
                Err(e)
            }
        }
    }

    /// Replace the text of `id`; empty text is never sent
    pub async fn edit_todo(&self, id: &str, text: &str) -> DomainResult<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::InvalidInput("Todo text must not be empty".to_string()));
        }

        match self.backend.update_todo_text(id, text).await {
            Ok(()) => {
                self.state.send_modify(|s| s.patch_todo(id, |t| t.text = text.to_string()));
                Ok(())
            }
            Err(e) => {
                self.surface(&e, UPDATE_FAILED);
                self.resync().await;
                Err(e)
            }
        }
    }

    /// Delete `id`, then drop it locally
    pub async fn delete_todo(&self, id: &str) -> DomainResult<()> {
        match self.backend.delete_todo(id).await {
            Ok(()) => {
                self.state.send_modify(|s| s.remove_todo(id));
                Ok(())
            }
            Err(e) => {
                self.surface(&e, DELETE_FAILED);
                self.resync().await;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendOp, InMemoryBackend};
    use crate::domain::Todo;
    use chrono::{Duration as ChronoDuration, Utc};

    fn make_user() -> AuthUser {
        AuthUser {
            uid: "u1".into(),
            email: None,
            display_name: None,
            photo_url: None,
            id_token: "id".into(),
            refresh_token: "refresh".into(),
            expires_at: Utc::now() + ChronoDuration::hours(1),
        }
    }

    fn setup(todos: Vec<Todo>) -> (SyncController<InMemoryBackend>, Arc<InMemoryBackend>, SessionContext) {
        let backend = Arc::new(InMemoryBackend::with_todos(todos));
        let session = SessionContext::init();
        session.set(make_user());
        (SyncController::new(backend.clone(), session.clone()), backend, session)
    }

    #[tokio::test]
    async fn test_load_requires_session() {
        let (controller, backend, session) = setup(vec![]);
        session.clear();

        let err = controller.load_todos().await.unwrap_err();
        assert_eq!(err.to_string(), "User must be authenticated to fetch todos");
        assert!(backend.calls().is_empty());
        assert_eq!(
            controller.snapshot().error.as_deref(),
            Some("User must be authenticated to fetch todos")
        );
    }

    #[tokio::test]
    async fn test_load_failure_keeps_last_known_list() {
        let (controller, backend, _) = setup(vec![Todo::new("1", "one", Utc::now())]);
        controller.load_todos().await.unwrap();

        backend.fail(BackendOp::ListMyTodos, "timeout");
        assert!(controller.load_todos().await.is_err());

        let state = controller.snapshot();
        assert_eq!(state.todos.len(), 1);
        assert_eq!(state.status, LoadStatus::LoadError("getMyTodos failed: timeout".into()));
        assert_eq!(state.error.as_deref(), Some("getMyTodos failed: timeout"));
    }

    #[tokio::test]
    async fn test_add_requires_session() {
        let (controller, backend, session) = setup(vec![]);
        session.clear();
        let err = controller.add_todo("x").await.unwrap_err();
        assert_eq!(err.to_string(), "User must be authenticated to add todos");
        assert_eq!(backend.call_count(BackendOp::AddTodo), 0);
    }

    #[tokio::test]
    async fn test_session_end_clears_list() {
        let (controller, _, _) = setup(vec![Todo::new("1", "one", Utc::now())]);
        controller.load_todos().await.unwrap();

        assert!(!controller.handle_session_change(None));
        let state = controller.snapshot();
        assert!(state.todos.is_empty());
        assert_eq!(state.status, LoadStatus::Idle);

        assert!(controller.handle_session_change(Some(&make_user())));
    }

    #[tokio::test]
    async fn test_toggle_unknown_id_is_noop() {
        let (controller, backend, _) = setup(vec![]);
        controller.load_todos().await.unwrap();
        controller.toggle_todo("missing").await.unwrap();
        assert_eq!(backend.call_count(BackendOp::ToggleTodo), 0);
    }

    #[tokio::test]
    async fn test_subscribers_see_patches() {
        let (controller, _, _) = setup(vec![Todo::new("1", "one", Utc::now())]);
        let mut rx = controller.subscribe();
        controller.load_todos().await.unwrap();
        rx.borrow_and_update();

        controller.edit_todo("1", "  renamed ").await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().find("1").unwrap().text, "renamed");
    }

    #[tokio::test]
    async fn test_dismiss_error() {
        let (controller, _, session) = setup(vec![]);
        session.clear();
        assert!(controller.load_todos().await.is_err());
        assert!(controller.snapshot().error.is_some());
        controller.dismiss_error();
        assert_eq!(controller.snapshot().error, None);
    }
}
