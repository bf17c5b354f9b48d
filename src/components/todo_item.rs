//! Todo Item Component
//!
//! One row of the list view: checkbox, text with inline edit, delete.

use leptos::prelude::*;
use leptos::task::spawn_local;
use todo_sync::Todo;

use super::DeleteConfirmButton;
use crate::context::use_app_context;

#[component]
pub fn TodoItem(todo: Todo) -> impl IntoView {
    let ctx = use_app_context();

    let id = StoredValue::new(todo.id.clone());
    let completed = todo.completed;
    let text = StoredValue::new(todo.text.clone());

    let (editing, set_editing) = signal(false);
    let (edit_text, set_edit_text) = signal(todo.text.clone());

    let toggle = move |_| {
        let id = id.get_value();
        spawn_local(async move {
            if let Err(e) = ctx.services().controller.toggle_todo(&id).await {
                tracing::debug!("Toggle failed: {}", e);
            }
        });
    };

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let value = edit_text.get();
        if value.trim().is_empty() {
            return;
        }
        set_editing.set(false);
        let id = id.get_value();
        spawn_local(async move {
            if let Err(e) = ctx.services().controller.edit_todo(&id, &value).await {
                tracing::debug!("Edit failed: {}", e);
            }
        });
    };

    let cancel = move |_| {
        set_edit_text.set(text.get_value());
        set_editing.set(false);
    };

    let delete = Callback::new(move |_| {
        let id = id.get_value();
        spawn_local(async move {
            if let Err(e) = ctx.services().controller.delete_todo(&id).await {
                tracing::debug!("Delete failed: {}", e);
            }
        });
    });

    view! {
        <div class={if completed { "todo-item completed" } else { "todo-item" }}>
            <input type="checkbox" class="todo-checkbox" checked=completed on:change=toggle />

            <Show
                when=move || editing.get()
                fallback=move || view! {
                    <div class="todo-content">
                        <span
                            class={if completed { "todo-text line-through" } else { "todo-text" }}
                            on:dblclick=move |_| set_editing.set(true)
                        >
                            {if completed { "🎉 " } else { "" }}
                            {text.get_value()}
                        </span>
                        <div class="todo-actions">
                            <button class="edit-btn" title="Edit todo" on:click=move |_| set_editing.set(true)>
                                "✏️"
                            </button>
                            <DeleteConfirmButton button_class="delete-btn" on_confirm=delete />
                        </div>
                    </div>
                }
            >
                <form class="edit-form" on:submit=save>
                    <input
                        type="text"
                        class="edit-input"
                        autofocus=true
                        prop:value=move || edit_text.get()
                        on:input=move |ev| set_edit_text.set(event_target_value(&ev))
                    />
                    <div class="edit-buttons">
                        <button type="submit" class="save-btn">"💾 Save"</button>
                        <button type="button" class="cancel-btn" on:click=cancel>"❌ Cancel"</button>
                    </div>
                </form>
            </Show>
        </div>
    }
}
