//! UI Components
//!
//! Reusable Leptos components.

mod add_todo_form;
mod delete_confirm_button;
mod error_banner;
mod filter_bar;
mod login_form;
mod sql_editor;
mod todo_item;
mod todo_list;
mod todo_table_view;

pub use add_todo_form::AddTodoForm;
pub use delete_confirm_button::DeleteConfirmButton;
pub use error_banner::ErrorBanner;
pub use filter_bar::FilterBar;
pub use login_form::LoginForm;
pub use sql_editor::SqlEditor;
pub use todo_item::TodoItem;
pub use todo_list::TodoList;
pub use todo_table_view::TodoTableView;
