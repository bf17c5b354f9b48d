//! Add Todo Form Component

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app_context;

/// Single-line form creating a todo
#[component]
pub fn AddTodoForm() -> impl IntoView {
    let ctx = use_app_context();
    let (text, set_text) = signal(String::new());

    let add_todo = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let value = text.get();
        if value.trim().is_empty() {
            return;
        }
        set_text.set(String::new());

        spawn_local(async move {
            // Failures are surfaced through the controller state
            if let Err(e) = ctx.services().controller.add_todo(&value).await {
                tracing::debug!("Add failed: {}", e);
            }
        });
    };

    view! {
        <form class="add-todo-form" on:submit=add_todo>
            <div class="add-todo-container">
                <input
                    type="text"
                    class="add-todo-input"
                    placeholder="✍️ What needs to be done?"
                    prop:value=move || text.get()
                    on:input=move |ev| set_text.set(event_target_value(&ev))
                />
                <button
                    type="submit"
                    class="add-todo-btn"
                    disabled=move || text.get().trim().is_empty()
                >
                    "➕ Add Todo"
                </button>
            </div>
        </form>
    }
}
