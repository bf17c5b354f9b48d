//! Login Form Component
//!
//! Email/password sign-in or sign-up, plus Google sign-in.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands::request_google_id_token;
use crate::context::use_app_context;

#[component]
pub fn LoginForm() -> impl IntoView {
    let ctx = use_app_context();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_sign_up, set_is_sign_up) = signal(false);
    let (loading, set_loading) = signal(false);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let email = email.get();
        let password = password.get();
        let sign_up = is_sign_up.get();
        set_loading.set(true);

        spawn_local(async move {
            let auth = ctx.services().auth;
            let result = if sign_up {
                auth.sign_up_with_email(&email, &password).await
            } else {
                auth.sign_in_with_email(&email, &password).await
            };
            if let Err(e) = result {
                ctx.report(e.to_string());
            }
            // The form is gone once the session is set
            let _ = set_loading.try_set(false);
        });
    };

    let google_sign_in = move |_| {
        set_loading.set(true);
        spawn_local(async move {
            let result = match request_google_id_token().await {
                Ok(token) => ctx
                    .services()
                    .auth
                    .sign_in_with_google(&token)
                    .await
                    .map(|_| ())
                    .map_err(|e| e.to_string()),
                Err(message) => Err(message),
            };
            if let Err(message) = result {
                ctx.report(message);
            }
            let _ = set_loading.try_set(false);
        });
    };

    let submit_label = move || {
        if loading.get() {
            "⏳ Loading..."
        } else if is_sign_up.get() {
            "🔐 Sign Up"
        } else {
            "🚪 Sign In"
        }
    };

    view! {
        <div class="login-container">
            <div class="login-card">
                <header class="login-header">
                    <h1>"✨ Welcome to Todo App"</h1>
                    <p>"📝 Sign in to manage your tasks 🚀"</p>
                </header>

                <form class="login-form" on:submit=submit>
                    <div class="form-group">
                        <input
                            type="email"
                            class="login-input"
                            placeholder="📧 Email address"
                            prop:value=move || email.get()
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            disabled=move || loading.get()
                        />
                    </div>
                    <div class="form-group">
                        <input
                            type="password"
                            class="login-input"
                            placeholder="🔒 Password"
                            prop:value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            disabled=move || loading.get()
                        />
                    </div>

                    <button type="submit" class="login-btn primary" disabled=move || loading.get()>
                        {submit_label}
                    </button>
                    <button
                        type="button"
                        class="login-btn google"
                        on:click=google_sign_in
                        disabled=move || loading.get()
                    >
                        "🔗 Sign in with Google"
                    </button>
                    <button
                        type="button"
                        class="toggle-btn"
                        on:click=move |_| set_is_sign_up.update(|v| *v = !*v)
                        disabled=move || loading.get()
                    >
                        {move || if is_sign_up.get() {
                            "👋 Already have an account? Sign in"
                        } else {
                            "✨ Need an account? Sign up"
                        }}
                    </button>
                </form>
            </div>
        </div>
    }
}
