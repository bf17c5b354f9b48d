//! Todo List Component
//!
//! Filtered list with empty-state messages and the remaining-tasks footer.

use leptos::prelude::*;

use super::TodoItem;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn TodoList() -> impl IntoView {
    let store = use_app_store();

    let visible = move || {
        let filter = store.filter().get();
        store.list().read().visible(filter)
    };

    view! {
        <Show
            when=move || !store.list().read().is_loading()
            fallback=|| view! {
                <div class="loading-container">
                    <p>"⏳ Loading todos..."</p>
                </div>
            }
        >
            {move || {
                let todos = visible();
                if todos.is_empty() {
                    let total = store.list().read().todos.len();
                    let message = store.filter().get().empty_message(total);
                    view! {
                        <div class="empty-state">
                            <p>{message}</p>
                        </div>
                    }
                    .into_any()
                } else {
                    view! {
                        <div class="todo-list">
                            <For
                                each=move || todos.clone()
                                key=|todo| (todo.id.clone(), todo.completed, todo.text.clone())
                                children=|todo| view! { <TodoItem todo=todo /> }
                            />
                        </div>
                    }
                    .into_any()
                }
            }}

            {move || {
                let stats = store.list().read().stats();
                (stats.total > 0).then(|| {
                    let message = if stats.all_done() {
                        format!("🎉 {} 🏆✨", stats.summary())
                    } else {
                        format!("🎯 {}", stats.summary())
                    };
                    view! {
                        <div class="todo-stats">
                            <p>{message}</p>
                        </div>
                    }
                })
            }}
        </Show>
    }
}
