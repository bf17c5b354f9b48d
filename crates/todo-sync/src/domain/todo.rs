//! Todo Entity
//!
//! A user-owned task record plus the list filters and counters the UI shows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned todo identifier (a UUID on the wire)
pub type TodoId = String;

/// A todo item as returned by the hosted backend
///
/// Field order matters: it is the column order of SQL playground results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Unique identifier, immutable
    pub id: TodoId,
    /// User-editable text
    pub text: String,
    /// Completion status
    pub completed: bool,
    /// Server creation timestamp
    pub created_at: DateTime<Utc>,
    /// Server update timestamp, never earlier than `created_at`
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Create a todo with both timestamps set to `at`
    pub fn new(id: impl Into<TodoId>, text: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed: false,
            created_at: at,
            updated_at: at,
        }
    }
}

/// Which todos the list view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TodoFilter {
    pub const ALL: [TodoFilter; 3] = [TodoFilter::All, TodoFilter::Active, TodoFilter::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            TodoFilter::All => "all",
            TodoFilter::Active => "active",
            TodoFilter::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TodoFilter::All => "All",
            TodoFilter::Active => "Active",
            TodoFilter::Completed => "Completed",
        }
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        match self {
            TodoFilter::All => true,
            TodoFilter::Active => !todo.completed,
            TodoFilter::Completed => todo.completed,
        }
    }

    /// Todos passing this filter, in list order
    pub fn apply(&self, todos: &[Todo]) -> Vec<Todo> {
        todos.iter().filter(|t| self.matches(t)).cloned().collect()
    }

    /// Message for an empty filtered list; `total` is the unfiltered length
    pub fn empty_message(&self, total: usize) -> &'static str {
        const NOTHING_YET: &str = "No todos yet. Add one above to get started!";
        if total == 0 {
            return NOTHING_YET;
        }
        match self {
            TodoFilter::Active => "Awesome! No active tasks. Time to relax!",
            TodoFilter::Completed => "No completed tasks yet. Start checking off some todos!",
            TodoFilter::All => NOTHING_YET,
        }
    }
}

/// Counters shown in the filter bar and footer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TodoStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl TodoStats {
    pub fn from_todos(todos: &[Todo]) -> Self {
        let completed = todos.iter().filter(|t| t.completed).count();
        Self {
            total: todos.len(),
            active: todos.len() - completed,
            completed,
        }
    }

    pub fn count_for(&self, filter: TodoFilter) -> usize {
        match filter {
            TodoFilter::All => self.total,
            TodoFilter::Active => self.active,
            TodoFilter::Completed => self.completed,
        }
    }

    pub fn all_done(&self) -> bool {
        self.total > 0 && self.active == 0
    }

    pub fn summary(&self) -> String {
        if self.active == 0 {
            "Congratulations! All tasks completed!".to_string()
        } else {
            format!("{} of {} tasks remaining", self.active, self.total)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_todo(id: &str, completed: bool) -> Todo {
        let mut todo = Todo::new(id, format!("Todo {}", id), Utc::now());
        todo.completed = completed;
        todo
    }

    #[test]
    fn test_todo_wire_format() {
        let json = r#"{
            "id": "0b5c7a2e-0000-4000-8000-000000000001",
            "text": "Buy milk",
            "completed": true,
            "createdAt": "2024-05-01T10:00:00.000Z",
            "updatedAt": "2024-05-02T10:00:00.000Z"
        }"#;
        let todo: Todo = serde_json::from_str(json).unwrap();
        assert_eq!(todo.text, "Buy milk");
        assert!(todo.completed);
        assert!(todo.updated_at >= todo.created_at);

        let value = serde_json::to_value(&todo).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["id", "text", "completed", "createdAt", "updatedAt"]);
    }

    #[test]
    fn test_filter_apply() {
        let todos = vec![make_todo("1", false), make_todo("2", true), make_todo("3", false)];
        assert_eq!(TodoFilter::All.apply(&todos).len(), 3);
        assert_eq!(TodoFilter::Active.apply(&todos).len(), 2);
        let done = TodoFilter::Completed.apply(&todos);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, "2");
    }

    #[test]
    fn test_empty_messages() {
        assert_eq!(
            TodoFilter::Active.empty_message(0),
            "No todos yet. Add one above to get started!"
        );
        assert_eq!(
            TodoFilter::Active.empty_message(4),
            "Awesome! No active tasks. Time to relax!"
        );
        assert!(TodoFilter::Completed.empty_message(1).starts_with("No completed tasks"));
    }

    #[test]
    fn test_stats() {
        let todos = vec![make_todo("1", false), make_todo("2", true)];
        let stats = TodoStats::from_todos(&todos);
        assert_eq!(stats, TodoStats { total: 2, active: 1, completed: 1 });
        assert_eq!(stats.count_for(TodoFilter::Completed), 1);
        assert!(!stats.all_done());
        assert_eq!(stats.summary(), "1 of 2 tasks remaining");

        let stats = TodoStats::from_todos(&[make_todo("3", true)]);
        assert!(stats.all_done());
        assert_eq!(stats.summary(), "Congratulations! All tasks completed!");
    }
}
