//! Filter Bar Component
//!
//! All / Active / Completed switch with live counts.

use leptos::prelude::*;
use todo_sync::TodoFilter;

use crate::store::{use_app_store, AppStateStoreFields};

fn icon(filter: TodoFilter) -> &'static str {
    match filter {
        TodoFilter::All => "📋",
        TodoFilter::Active => "🔥",
        TodoFilter::Completed => "✅",
    }
}

#[component]
pub fn FilterBar() -> impl IntoView {
    let store = use_app_store();

    view! {
        <div class="filter-controls">
            {TodoFilter::ALL.into_iter().map(|filter| {
                let count = move || store.list().read().stats().count_for(filter);
                view! {
                    <button
                        class=move || if store.filter().get() == filter { "active" } else { "" }
                        on:click=move |_| store.filter().set(filter)
                    >
                        {format!("{} {} (", icon(filter), filter.label())}
                        {count}
                        ")"
                    </button>
                }
            }).collect_view()}
        </div>
    }
}
