//! Session Context
//!
//! Observable holder of the signed-in user. Created once at startup and
//! injected wherever the session is needed. With a [`SessionStore`] attached,
//! every sign-in, token refresh and sign-out is written through to it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use super::persist::{SessionStore, StoredSession};
use crate::domain::AuthUser;

struct SessionInner {
    user: watch::Sender<Option<AuthUser>>,
    closed: AtomicBool,
    store: Option<Arc<dyn SessionStore>>,
}

/// Current user (or none) plus change notifications
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<SessionInner>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::init()
    }
}

impl SessionContext {
    /// Start a signed-out session
    pub fn init() -> Self {
        Self::build(None)
    }

    /// Start a signed-out session that persists into `store`
    pub fn with_store(store: Arc<dyn SessionStore>) -> Self {
        Self::build(Some(store))
    }

    fn build(store: Option<Arc<dyn SessionStore>>) -> Self {
        let (user, _) = watch::channel(None);
        Self {
            inner: Arc::new(SessionInner {
                user,
                closed: AtomicBool::new(false),
                store,
            }),
        }
    }

    /// Session left behind by an earlier run, if any
    pub fn stored(&self) -> Option<StoredSession> {
        self.inner.store.as_ref().and_then(|store| store.load())
    }

    fn persist(&self, user: &AuthUser) {
        if let Some(store) = &self.inner.store {
            store.save(&StoredSession::from_user(user));
        }
    }

    pub fn current(&self) -> Option<AuthUser> {
        self.inner.user.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.user.borrow().is_some()
    }

    pub fn uid(&self) -> Option<String> {
        self.inner.user.borrow().as_ref().map(|u| u.uid.clone())
    }

    /// Publish a newly signed-in user
    pub fn set(&self, user: AuthUser) {
        if self.is_closed() {
            tracing::warn!("Ignoring sign-in on a torn down session");
            return;
        }
        tracing::info!(uid = %user.uid, "Session signed in");
        self.persist(&user);
        self.inner.user.send_replace(Some(user));
    }

    /// Replace the tokens of the current user; ignored if another user (or nobody) is signed in
    pub fn refresh_user(&self, user: AuthUser) -> bool {
        if self.is_closed() {
            return false;
        }
        let refreshed = self.inner.user.send_if_modified(|current| match current {
            Some(existing) if existing.uid == user.uid => {
                *existing = user;
                true
            }
            _ => false,
        });
        if refreshed {
            // Refresh tokens may rotate
            if let Some(user) = self.current() {
                self.persist(&user);
            }
        }
        refreshed
    }

    /// Sign out locally
    pub fn clear(&self) {
        if self.is_closed() {
            return;
        }
        tracing::info!("Session signed out");
        if let Some(store) = &self.inner.store {
            store.remove();
        }
        self.inner.user.send_replace(None);
    }

    /// Receiver yielding the current user or none on every change
    pub fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.inner.user.subscribe()
    }

    /// End the session lifecycle. The stored session stays for the next run.
    pub fn teardown(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        self.inner.user.send_replace(None);
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }
}
