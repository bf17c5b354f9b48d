//! Browser Session Storage
//!
//! Keeps the stored session in `localStorage` so a reload does not sign
//! the user out.

use todo_sync::{SessionStore, StoredSession};
use web_sys::Storage;

const SESSION_KEY: &str = "todo-sql-ui.session";

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// [`SessionStore`] over `window.localStorage`
pub struct LocalSessionStore;

impl SessionStore for LocalSessionStore {
    fn load(&self) -> Option<StoredSession> {
        let raw = local_storage()?.get_item(SESSION_KEY).ok().flatten()?;
        match StoredSession::from_json(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("Discarding unreadable stored session: {}", e);
                self.remove();
                None
            }
        }
    }

    fn save(&self, session: &StoredSession) {
        let Some(storage) = local_storage() else {
            return;
        };
        let written = session
            .to_json()
            .map_err(|e| e.to_string())
            .and_then(|raw| storage.set_item(SESSION_KEY, &raw).map_err(|e| format!("{:?}", e)));
        if let Err(e) = written {
            tracing::warn!("Failed to store session: {}", e);
        }
    }

    fn remove(&self) {
        if let Some(storage) = local_storage() {
            if storage.remove_item(SESSION_KEY).is_err() {
                tracing::warn!("Failed to remove stored session");
            }
        }
    }
}
