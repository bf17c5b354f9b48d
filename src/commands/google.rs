//! Google Sign-In Bridge
//!
//! The page supplies `window.todoAuth.googleIdToken()`, which runs the Google
//! popup and resolves to an ID token that Firebase exchanges for a session.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "todoAuth"], js_name = googleIdToken, catch)]
    async fn google_id_token() -> Result<JsValue, JsValue>;
}

fn js_message(err: &JsValue) -> String {
    if let Some(message) = err.as_string() {
        return message;
    }
    js_sys::Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_default()
}

/// Run the page's Google flow and return its ID token
pub async fn request_google_id_token() -> Result<String, String> {
    match google_id_token().await {
        Ok(token) => token
            .as_string()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| "Google sign-in returned no token".to_string()),
        Err(err) => {
            let message = js_message(&err);
            if message.is_empty() {
                Err("Failed to sign in with Google".to_string())
            } else {
                Err(message)
            }
        }
    }
}
