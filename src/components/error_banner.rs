//! Error banner with a dismiss button.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::store::store_current_error;

#[component]
pub fn ErrorBanner() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    move || {
        store_current_error(&store).map(|message| {
            view! {
                <div class="error-message">
                    {message}
                    <button class="error-close" on:click=move |_| ctx.dismiss_error()>"✕"</button>
                </div>
            }
        })
    }
}
