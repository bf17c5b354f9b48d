//! Todo Table View Component
//!
//! Every todo as a table row, `SELECT * FROM todos;` style. Text cells are
//! click-to-edit: Enter or blur saves, Escape cancels.

use chrono::{DateTime, Local, Utc};
use leptos::prelude::*;
use leptos::task::spawn_local;
use todo_sync::Todo;

use super::DeleteConfirmButton;
use crate::context::{use_app_context, AppContext};
use crate::store::AppStateStoreFields;

const COLUMNS: [&str; 6] = ["id", "text", "completed", "createdAt", "updatedAt", "actions"];

fn format_date(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%m/%d/%Y, %I:%M:%S %p").to_string()
}

#[component]
pub fn TodoTableView() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    // Row being edited and its draft text
    let (editing_id, set_editing_id) = signal::<Option<String>>(None);
    let (edit_text, set_edit_text) = signal(String::new());

    let todos = move || store.list().read().todos.as_ref().clone();

    view! {
        {move || {
            let todos = todos();
            if todos.is_empty() {
                return view! {
                    <div class="table-empty-state">
                        <p>"No records found"</p>
                    </div>
                }
                .into_any();
            }
            let count = todos.len();
            view! {
                <div class="todo-table-container">
                    <div class="table-header">
                        <h3>"SELECT * FROM todos;"</h3>
                        <p>{format!("{} rows returned", count)}</p>
                    </div>
                    <div class="table-wrapper">
                        <table class="todo-table">
                            <thead>
                                <tr>
                                    {COLUMNS.iter().map(|c| view! { <th>{*c}</th> }).collect_view()}
                                </tr>
                            </thead>
                            <tbody>
                                {todos.into_iter().map(|todo| view! {
                                    <TodoRow
                                        ctx=ctx
                                        todo=todo
                                        editing_id=editing_id
                                        set_editing_id=set_editing_id
                                        edit_text=edit_text
                                        set_edit_text=set_edit_text
                                    />
                                }).collect_view()}
                            </tbody>
                        </table>
                    </div>
                </div>
            }
            .into_any()
        }}
    }
}

#[component]
fn TodoRow(
    ctx: AppContext,
    todo: Todo,
    editing_id: ReadSignal<Option<String>>,
    set_editing_id: WriteSignal<Option<String>>,
    edit_text: ReadSignal<String>,
    set_edit_text: WriteSignal<String>,
) -> impl IntoView {
    let id = StoredValue::new(todo.id.clone());
    let original = StoredValue::new(todo.text.clone());
    let completed = todo.completed;
    let is_editing = move || editing_id.get().as_deref() == Some(id.read_value().as_str());

    let start_edit = move || {
        set_editing_id.set(Some(id.get_value()));
        set_edit_text.set(original.get_value());
    };
    let cancel_edit = move || {
        set_editing_id.set(None);
        set_edit_text.set(String::new());
    };
    // Empty drafts are dropped, not sent
    let save_edit = move || {
        if editing_id.get_untracked().as_deref() != Some(id.read_value().as_str()) {
            return;
        }
        let text = edit_text.get_untracked();
        cancel_edit();
        if text.trim().is_empty() {
            return;
        }
        let id = id.get_value();
        spawn_local(async move {
            if let Err(e) = ctx.services().controller.edit_todo(&id, &text).await {
                tracing::debug!("Edit failed: {}", e);
            }
        });
    };

    let toggle = move |_| {
        let id = id.get_value();
        spawn_local(async move {
            if let Err(e) = ctx.services().controller.toggle_todo(&id).await {
                tracing::debug!("Toggle failed: {}", e);
            }
        });
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
        <tr class={if completed { "completed-row" } else { "" }}>
            <td class="id-cell">
                <span class="id-text">{todo.id.clone()}</span>
            </td>
            <td class="text-cell">
                <Show
                    when=is_editing
                    fallback=move || view! {
                        <span
                            class={if completed { "text-content completed" } else { "text-content" }}
                            title="Click to edit"
                            on:click=move |_| start_edit()
                        >
                            {original.get_value()}
                        </span>
                    }
                >
                    <input
                        type="text"
                        class="edit-input"
                        autofocus=true
                        prop:value=move || edit_text.get()
                        on:input=move |ev| set_edit_text.set(event_target_value(&ev))
                        on:keydown=move |ev: web_sys::KeyboardEvent| match ev.key().as_str() {
                            "Enter" => save_edit(),
                            "Escape" => cancel_edit(),
                            _ => {}
                        }
                        on:blur=move |_| save_edit()
                    />
                </Show>
            </td>
            <td class="status-cell">
                <label class="checkbox-container">
                    <input type="checkbox" checked=completed on:change=toggle />
                    <span class="status-text">{if completed { "TRUE" } else { "FALSE" }}</span>
                </label>
            </td>
            <td class="date-cell">{format_date(&todo.created_at)}</td>
            <td class="date-cell">{format_date(&todo.updated_at)}</td>
            <td class="actions-cell">
                <Show
                    when=is_editing
                    fallback=move || view! {
                        <div class="table-actions">
                            <button class="edit-btn" title="Edit todo" on:click=move |_| start_edit()>"✏️"</button>
                            <DeleteConfirmButton button_class="delete-btn" on_confirm=delete />
                        </div>
                    }
                >
                    <div class="edit-actions">
                        <button class="save-btn" title="Save changes" on:click=move |_| save_edit()>"✓"</button>
                        <button class="cancel-btn" title="Cancel editing" on:click=move |_| cancel_edit()>"✕"</button>
                    </div>
                </Show>
            </td>
        </tr>
    }
}
