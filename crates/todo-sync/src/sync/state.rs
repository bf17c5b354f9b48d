//! Todo List State
//!
//! Client-side cache of the user's todos. Every change produces a new list
//! (replace-on-write); snapshots handed out earlier never change.

use std::sync::Arc;

use crate::domain::{Todo, TodoFilter, TodoStats};

/// Load lifecycle of the list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    LoadError(String),
}

/// Snapshot of the local todo list
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TodoListState {
    pub todos: Arc<Vec<Todo>>,
    pub status: LoadStatus,
    /// Last error surfaced to the user, until dismissed
    pub error: Option<String>,
}

impl TodoListState {
    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn find(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub fn stats(&self) -> TodoStats {
        TodoStats::from_todos(&self.todos)
    }

    pub fn visible(&self, filter: TodoFilter) -> Vec<Todo> {
        filter.apply(&self.todos)
    }

    /// Replace the whole list
    pub(crate) fn replace_todos(&mut self, todos: Vec<Todo>) {
        self.todos = Arc::new(todos);
    }

    /// New list with `patch` applied to the record `id`; others untouched
    pub(crate) fn patch_todo<F>(&mut self, id: &str, patch: F)
    where
        F: Fn(&mut Todo),
    {
        let todos = self
            .todos
            .iter()
            .cloned()
            .map(|mut t| {
                if t.id == id {
                    patch(&mut t);
                }
                t
            })
            .collect();
        self.todos = Arc::new(todos);
    }

    /// New list without the record `id`
    pub(crate) fn remove_todo(&mut self, id: &str) {
        let todos = self.todos.iter().filter(|t| t.id != id).cloned().collect();
        self.todos = Arc::new(todos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_state() -> TodoListState {
        let mut state = TodoListState::default();
        state.replace_todos(vec![
            Todo::new("1", "one", Utc::now()),
            Todo::new("2", "two", Utc::now()),
        ]);
        state
    }

    #[test]
    fn test_patch_replaces_list() {
        let mut state = make_state();
        let before = state.todos.clone();

        state.patch_todo("2", |t| t.completed = true);

        assert!(!before[1].completed, "earlier snapshot must not change");
        assert!(state.find("2").unwrap().completed);
        assert!(!state.find("1").unwrap().completed);
        assert!(!Arc::ptr_eq(&before, &state.todos));
    }

    #[test]
    fn test_remove() {
        let mut state = make_state();
        state.remove_todo("1");
        assert_eq!(state.todos.len(), 1);
        assert!(state.find("1").is_none());
        assert_eq!(state.stats().total, 1);
    }

    #[test]
    fn test_visible_uses_filter() {
        let mut state = make_state();
        state.patch_todo("1", |t| t.completed = true);
        let active = state.visible(TodoFilter::Active);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "2");
    }
}
