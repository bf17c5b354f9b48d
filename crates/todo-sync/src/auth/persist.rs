//! Session Persistence
//!
//! What survives a page reload: the refresh token and profile of the
//! signed-in user. The ID token is never stored; a restored session starts
//! expired and is refreshed through the provider.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthUser, DomainError, DomainResult};

/// Persisted part of an [`AuthUser`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub refresh_token: String,
}

impl StoredSession {
    pub fn from_user(user: &AuthUser) -> Self {
        Self {
            uid: user.uid.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            photo_url: user.photo_url.clone(),
            refresh_token: user.refresh_token.clone(),
        }
    }

    /// User with no usable ID token; only good as input to a refresh
    pub fn into_user(self) -> AuthUser {
        AuthUser {
            uid: self.uid,
            email: self.email,
            display_name: self.display_name,
            photo_url: self.photo_url,
            id_token: String::new(),
            refresh_token: self.refresh_token,
            expires_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    pub fn to_json(&self) -> DomainResult<String> {
        serde_json::to_string(self).map_err(|e| DomainError::Auth(e.to_string()))
    }

    pub fn from_json(raw: &str) -> DomainResult<Self> {
        serde_json::from_str(raw).map_err(|e| DomainError::Auth(e.to_string()))
    }
}

/// Durable slot for at most one stored session
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Option<StoredSession>;

    fn save(&self, session: &StoredSession);

    fn remove(&self);
}

/// Process-local store, for native runs and tests
#[derive(Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<StoredSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: StoredSession) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<StoredSession> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn save(&self, session: &StoredSession) {
        *self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(session.clone());
    }

    fn remove(&self) {
        *self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_user() -> AuthUser {
        AuthUser {
            uid: "uid-1".into(),
            email: Some("ada@example.com".into()),
            display_name: Some("Ada".into()),
            photo_url: None,
            id_token: "secret-id".into(),
            refresh_token: "refresh-1".into(),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    #[test]
    fn test_id_token_is_not_stored() {
        let stored = StoredSession::from_user(&make_user());
        let json = stored.to_json().unwrap();
        assert!(!json.contains("secret-id"));
        assert!(json.contains("\"refreshToken\":\"refresh-1\""));

        let user = StoredSession::from_json(&json).unwrap().into_user();
        assert_eq!(user.uid, "uid-1");
        assert_eq!(user.display_label(), "Ada");
        assert!(user.id_token.is_empty());
        assert!(user.is_token_expired(Utc::now()));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(StoredSession::from_json("not json").is_err());
        assert!(StoredSession::from_json("{}").is_err());
    }

    #[test]
    fn test_memory_store_slot() {
        let store = MemorySessionStore::new();
        assert!(store.load().is_none());
        store.save(&StoredSession::from_user(&make_user()));
        assert_eq!(store.load().unwrap().uid, "uid-1");
        store.remove();
        assert!(store.load().is_none());
    }
}
