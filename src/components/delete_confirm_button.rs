//! Delete Confirm Button
//!
//! Two-step trash button shared by the list rows and the table rows.

use leptos::prelude::*;

/// Trash button that asks "Delete?" before a todo is removed.
///
/// Clicks stop propagating so the row underneath (checkbox toggle, click to
/// edit) never sees them. `on_confirm` runs only on ✓ and is expected to
/// call `SyncController::delete_todo`; the row stays put until the backend
/// confirms.
#[component]
pub fn DeleteConfirmButton(
    #[prop(into)] button_class: String,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let (asking, set_asking) = signal(false);

    view! {
        <Show when=move || !asking.get()>
            <button
                class=button_class.clone()
                title="Delete todo"
                on:click=move |ev| {
                    ev.stop_propagation();
                    set_asking.set(true);
                }
            >
                "🗑️"
            </button>
        </Show>
        <Show when=move || asking.get()>
            <span class="delete-confirm">
                <span class="delete-confirm-text">"Delete?"</span>
                <button
                    class="confirm-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_asking.set(false);
                        on_confirm.run(());
                    }
                >
                    "✓"
                </button>
                <button
                    class="cancel-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_asking.set(false);
                    }
                >
                    "✗"
                </button>
            </span>
        </Show>
    }
}
