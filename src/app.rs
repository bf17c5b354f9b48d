//! Todo App Frontend
//!
//! Auth gate, session watcher and the list / table / SQL tabs.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use todo_sync::{AuthUser, INITIAL_LOAD_DELAY};

use crate::commands::{self, Services};
use crate::components::{
    AddTodoForm, ErrorBanner, FilterBar, LoginForm, SqlEditor, TodoList, TodoTableView,
};
use crate::context::AppContext;
use crate::store::{
    store_reset_user, store_set_list, AppState, AppStateStoreFields, ViewMode,
};

#[component]
pub fn App() -> impl IntoView {
    let store = Store::new(AppState::default());
    provide_context(store);

    let services = match commands::connect() {
        Ok(services) => services,
        Err(e) => {
            tracing::error!("Startup failed: {}", e);
            return view! {
                <div class="App">
                    <div class="error-message">{e.to_string()}</div>
                </div>
            }
            .into_any();
        }
    };

    let session = services.session.clone();
    on_cleanup(move || session.teardown());

    let ctx = AppContext::new(services.clone(), store);
    provide_context(ctx);
    mirror_list(ctx, &services);
    watch_session(ctx, services);

    view! { <TodoApp /> }.into_any()
}

/// Copy every controller snapshot into the store
fn mirror_list(ctx: AppContext, services: &Services) {
    let mut rx = services.controller.subscribe();
    spawn_local(async move {
        store_set_list(&ctx.store, rx.borrow_and_update().clone());
        while rx.changed().await.is_ok() {
            store_set_list(&ctx.store, rx.borrow_and_update().clone());
        }
    });
}

/// Follow the session: restore the stored one, clear on sign-out, load after sign-in
fn watch_session(ctx: AppContext, services: Services) {
    let mut rx = services.session.subscribe();
    spawn_local(async move {
        // The login form stays hidden until the stored session is settled
        if let Err(e) = services.auth.restore_session().await {
            ctx.report(e.user_message("Please sign in again"));
        }

        let mut current: Option<AuthUser> = rx.borrow_and_update().clone();
        on_session_change(ctx, &services, current.as_ref());
        ctx.store.auth_ready().set(true);

        while rx.changed().await.is_ok() {
            let user = rx.borrow_and_update().clone();
            let same_uid = user.as_ref().map(|u| &u.uid) == current.as_ref().map(|u| &u.uid);
            if same_uid {
                // Token refresh republishes the same user
                ctx.store.user().set(user.clone());
            } else {
                on_session_change(ctx, &services, user.as_ref());
            }
            current = user;
        }
    });
}

fn on_session_change(ctx: AppContext, services: &Services, user: Option<&AuthUser>) {
    services.translator.handle_session_change(user);
    match user {
        Some(user) => {
            ctx.store.user().set(Some(user.clone()));
            ctx.store.history().set(services.translator.history());
        }
        None => store_reset_user(&ctx.store),
    }
    if !services.controller.handle_session_change(user) {
        return;
    }

    let Some(uid) = user.map(|u| u.uid.clone()) else {
        return;
    };
    let services = services.clone();
    spawn_local(async move {
        TimeoutFuture::new(INITIAL_LOAD_DELAY.as_millis() as u32).await;
        // Skip if the user changed while waiting
        if services.session.uid().as_deref() != Some(uid.as_str()) {
            return;
        }
        if let Err(e) = services.controller.load_todos().await {
            tracing::warn!("Initial load failed: {}", e);
        }
    });
}

#[component]
fn TodoApp() -> impl IntoView {
    let ctx = crate::context::use_app_context();
    let store = ctx.store;

    view! {
        <div class="App">
            <Show
                when=move || store.auth_ready().get()
                fallback=|| view! {
                    <div class="loading-container">
                        <p>"⏳ Loading..."</p>
                    </div>
                }
            >
                <Show
                    when=move || store.user().read().is_some()
                    fallback=|| view! {
                        <LoginForm />
                        <ErrorBanner />
                    }
                >
                    <SignedIn />
                </Show>
            </Show>
        </div>
    }
}

#[component]
fn SignedIn() -> impl IntoView {
    let ctx = crate::context::use_app_context();
    let store = ctx.store;

    let user_label = move || {
        store
            .user()
            .read()
            .as_ref()
            .map(|u| u.display_label().to_string())
            .unwrap_or_default()
    };

    let sign_out = move |_| {
        ctx.services().auth.sign_out();
        tracing::info!("Signed out");
    };

    view! {
        <div class="todo-app">
            <header class="app-header">
                <div class="header-content">
                    <div class="header-main">
                        <h1>"✨ Todo App"</h1>
                        <p>"📝 Stay organized and get things done 🚀"</p>
                    </div>
                    <div class="user-info">
                        <span class="user-name">"👋 " {user_label}</span>
                        <button class="logout-btn" on:click=sign_out>"🚪 Sign Out"</button>
                    </div>
                </div>
            </header>

            <ErrorBanner />

            <nav class="view-tabs">
                {ViewMode::ALL.into_iter().map(|mode| view! {
                    <button
                        class=move || if store.view().get() == mode { "tab-btn active" } else { "tab-btn" }
                        on:click=move |_| store.view().set(mode)
                    >
                        {mode.label()}
                    </button>
                }).collect_view()}
            </nav>

            {move || match store.view().get() {
                ViewMode::List => view! {
                    <AddTodoForm />
                    <FilterBar />
                    <TodoList />
                }.into_any(),
                ViewMode::Table => view! { <TodoTableView /> }.into_any(),
                ViewMode::Sql => view! { <SqlEditor /> }.into_any(),
            }}
        </div>
    }
}
