//! Sync Controller Integration Tests
//!
//! Drives the controller against the in-memory backend and checks the local
//! list against the backend's after each operation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Notify;
use todo_sync::backend::BackendOp;
use todo_sync::{
    AuthUser, DomainResult, InMemoryBackend, LoadStatus, SessionContext, SyncController, Todo, TodoBackend,
    TodoId, UserProfile,
};

fn make_user() -> AuthUser {
    AuthUser {
        uid: "user-1".into(),
        email: Some("ada@example.com".into()),
        display_name: Some("Ada".into()),
        photo_url: None,
        id_token: "id-token".into(),
        refresh_token: "refresh-token".into(),
        expires_at: Utc::now() + Duration::hours(1),
    }
}

fn make_todos() -> Vec<Todo> {
    let now = Utc::now();
    let mut done = Todo::new("b", "Ship it", now - Duration::minutes(1));
    done.completed = true;
    vec![
        Todo::new("a", "Write tests", now),
        done,
        Todo::new("c", "Review", now - Duration::minutes(2)),
    ]
}

async fn setup() -> (SyncController<InMemoryBackend>, Arc<InMemoryBackend>) {
    let backend = Arc::new(InMemoryBackend::with_todos(make_todos()));
    let session = SessionContext::init();
    session.set(make_user());
    let controller = SyncController::new(backend.clone(), session);
    controller.load_todos().await.expect("initial load");
    (controller, backend)
}

fn ids(todos: &[Todo]) -> Vec<String> {
    todos.iter().map(|t| t.id.clone()).collect()
}

#[tokio::test]
async fn test_initial_load_mirrors_backend() {
    let (controller, backend) = setup().await;
    let state = controller.snapshot();
    assert_eq!(state.status, LoadStatus::Loaded);
    assert_eq!(*state.todos, backend.todos());
    assert_eq!(state.stats().active, 2);
}

#[tokio::test]
async fn test_toggle_negates_only_target() {
    let (controller, backend) = setup().await;
    let before = controller.snapshot();

    controller.toggle_todo("a").await.expect("toggle");

    let after = controller.snapshot();
    assert!(after.find("a").unwrap().completed);
    for id in ["b", "c"] {
        assert_eq!(after.find(id), before.find(id));
    }
    assert_eq!(*after.todos, backend.todos());
    assert_eq!(backend.call_count(BackendOp::ListMyTodos), 1);
}

#[tokio::test]
async fn test_failed_toggle_resyncs_with_backend() {
    let (controller, backend) = setup().await;

    // Someone else changed the list meanwhile
    let mut remote = backend.todos();
    remote.remove(2);
    backend.set_todos(remote);
    backend.fail(BackendOp::ToggleTodo, "permission denied");

    assert!(controller.toggle_todo("a").await.is_err());

    let state = controller.snapshot();
    assert_eq!(*state.todos, backend.todos());
    assert_eq!(
        state.error.as_deref(),
        Some("toggleTodoCompletion failed: permission denied")
    );
}

#[tokio::test]
async fn test_failed_edit_resyncs_with_backend() {
    let (controller, backend) = setup().await;
    backend.fail(BackendOp::UpdateTodoText, "");

    assert!(controller.edit_todo("c", "Review again").await.is_err());

    let state = controller.snapshot();
    assert_eq!(state.find("c").unwrap().text, "Review");
    assert_eq!(*state.todos, backend.todos());
    assert!(state.error.is_some());
    assert_eq!(backend.call_count(BackendOp::ListMyTodos), 2);
}

#[tokio::test]
async fn test_delete_and_failed_delete() {
    let (controller, backend) = setup().await;

    controller.delete_todo("b").await.expect("delete");
    assert_eq!(ids(&controller.snapshot().todos), vec!["a", "c"]);

    backend.fail(BackendOp::DeleteTodo, "offline");
    assert!(controller.delete_todo("a").await.is_err());
    assert_eq!(ids(&controller.snapshot().todos), vec!["a", "c"]);
    assert_eq!(*controller.snapshot().todos, backend.todos());
}

#[tokio::test]
async fn test_add_reloads_instead_of_inserting() {
    let (controller, backend) = setup().await;

    controller.add_todo("  Buy milk  ").await.expect("add");

    let state = controller.snapshot();
    assert_eq!(state.todos.len(), 4);
    assert_eq!(state.todos[0].text, "Buy milk");
    assert_eq!(*state.todos, backend.todos());
    assert_eq!(backend.call_count(BackendOp::ListMyTodos), 2);
}

#[tokio::test]
async fn test_empty_add_never_reaches_backend() {
    let (controller, backend) = setup().await;

    assert!(controller.add_todo("   ").await.is_err());
    assert_eq!(backend.call_count(BackendOp::AddTodo), 0);
    assert_eq!(controller.snapshot().todos.len(), 3);
}

#[tokio::test]
async fn test_failed_add_does_not_reload() {
    let (controller, backend) = setup().await;
    backend.fail(BackendOp::AddTodo, "quota exceeded");

    let err = controller.add_todo("Buy milk").await.unwrap_err();

    assert_eq!(err.to_string(), "addTodo failed: quota exceeded");
    assert_eq!(backend.call_count(BackendOp::ListMyTodos), 1);
    assert_eq!(controller.snapshot().error.as_deref(), Some("addTodo failed: quota exceeded"));
}

#[tokio::test]
async fn test_sign_out_then_sign_in_reloads() {
    let (controller, backend) = setup().await;

    controller.handle_session_change(None);
    assert!(controller.snapshot().todos.is_empty());

    if controller.handle_session_change(Some(&make_user())) {
        controller.load_todos().await.expect("reload");
    }
    assert_eq!(*controller.snapshot().todos, backend.todos());
}

/// Holds `toggle_todo` at a gate until the test releases it
struct GatedBackend {
    inner: InMemoryBackend,
    gate: Notify,
    entered: AtomicBool,
}

#[async_trait(?Send)]
impl TodoBackend for GatedBackend {
    async fn list_my_todos(&self) -> DomainResult<Vec<Todo>> {
        self.inner.list_my_todos().await
    }

    async fn get_todo(&self, id: &str) -> DomainResult<Option<Todo>> {
        self.inner.get_todo(id).await
    }

    async fn add_todo(&self, text: &str) -> DomainResult<TodoId> {
        self.inner.add_todo(text).await
    }

    async fn toggle_todo(&self, id: &str, completed: bool) -> DomainResult<()> {
        self.entered.store(true, Ordering::SeqCst);
        self.gate.notified().await;
        self.inner.toggle_todo(id, completed).await
    }

    async fn update_todo_text(&self, id: &str, text: &str) -> DomainResult<()> {
        self.inner.update_todo_text(id, text).await
    }

    async fn delete_todo(&self, id: &str) -> DomainResult<()> {
        self.inner.delete_todo(id).await
    }

    async fn upsert_user(&self, profile: &UserProfile) -> DomainResult<()> {
        self.inner.upsert_user(profile).await
    }
}

#[tokio::test]
async fn test_list_untouched_while_toggle_in_flight() {
    let backend = Arc::new(GatedBackend {
        inner: InMemoryBackend::with_todos(make_todos()),
        gate: Notify::new(),
        entered: AtomicBool::new(false),
    });
    let session = SessionContext::init();
    session.set(make_user());
    let controller = SyncController::new(backend.clone(), session);
    controller.load_todos().await.expect("initial load");

    let before = controller.snapshot();
    let mut rx = controller.subscribe();
    rx.borrow_and_update();

    let in_flight = async {
        while !backend.entered.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
        let during = controller.snapshot();
        assert_eq!(during.todos, before.todos);
        assert!(!during.find("a").unwrap().completed);
        assert!(!rx.has_changed().unwrap());
        backend.gate.notify_one();
    };
    let (result, ()) = tokio::join!(controller.toggle_todo("a"), in_flight);

    result.expect("toggle");
    assert!(controller.snapshot().find("a").unwrap().completed);
    assert_eq!(*controller.snapshot().todos, backend.inner.todos());
}
