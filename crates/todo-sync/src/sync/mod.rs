//! Sync Layer
//!
//! Optimistic synchronization between the local todo list and the backend.

mod controller;
mod state;

pub use controller::{SyncController, INITIAL_LOAD_DELAY};
pub use state::{LoadStatus, TodoListState};
