//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The sync
//! controller owns the todo list; the store mirrors its snapshots.

use leptos::prelude::*;
use reactive_stores::Store;
use todo_sync::{AuthUser, QueryHistory, TodoFilter, TodoListState};

/// Which view of the list is shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    List,
    Table,
    Sql,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::List, ViewMode::Table, ViewMode::Sql];

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::List => "List View",
            ViewMode::Table => "Table View",
            ViewMode::Sql => "SQL Editor",
        }
    }
}

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Signed-in user, `None` when signed out
    pub user: Option<AuthUser>,
    /// Session resolved at least once
    pub auth_ready: bool,
    /// Latest controller snapshot
    pub list: TodoListState,
    /// Errors raised outside the controller (sign-in, sign-out, config)
    pub error: Option<String>,
    pub filter: TodoFilter,
    pub view: ViewMode,
    /// SQL playground runs, newest first
    pub history: QueryHistory,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Error to show: local errors win over the controller's
pub fn store_current_error(store: &AppStore) -> Option<String> {
    store.error().get().or_else(|| store.list().read().error.clone())
}

pub fn store_set_error(store: &AppStore, message: impl Into<String>) {
    store.error().set(Some(message.into()));
}

/// Replace the mirrored list snapshot
pub fn store_set_list(store: &AppStore, list: TodoListState) {
    store.list().set(list);
}

/// Sign-out leaves no per-user state behind
pub fn store_reset_user(store: &AppStore) {
    store.user().set(None);
    store.filter().set(TodoFilter::All);
    store.view().set(ViewMode::List);
    store.history().set(QueryHistory::default());
}
