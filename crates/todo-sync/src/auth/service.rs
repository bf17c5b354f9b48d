//! Auth Service
//!
//! Sign-in / sign-up / sign-out flows: publishes the user to the session and
//! mirrors the profile into the backend. Also restores a stored session at
//! startup.

use std::sync::Arc;

use super::firebase::GOOGLE_PROVIDER_ID;
use super::provider::AuthProvider;
use super::session::SessionContext;
use crate::backend::TodoBackend;
use crate::domain::{AuthUser, DomainError, DomainResult};

/// Auth flows over an identity provider and the todo backend
pub struct AuthService<P: ?Sized, B: ?Sized> {
    provider: Arc<P>,
    backend: Arc<B>,
    session: SessionContext,
}

impl<P: ?Sized, B: ?Sized> Clone for AuthService<P, B> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            backend: self.backend.clone(),
            session: self.session.clone(),
        }
    }
}

/// Login form guard: both fields must be filled in
fn check_credentials(email: &str, password: &str) -> DomainResult<()> {
    if email.trim().is_empty() || password.trim().is_empty() {
        return Err(DomainError::InvalidInput("Please fill in all fields".to_string()));
    }
    Ok(())
}

impl<P, B> AuthService<P, B>
where
    P: AuthProvider + ?Sized,
    B: TodoBackend + ?Sized,
{
    pub fn new(provider: Arc<P>, backend: Arc<B>, session: SessionContext) -> Self {
        Self { provider, backend, session }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub async fn sign_in_with_email(&self, email: &str, password: &str) -> DomainResult<AuthUser> {
        check_credentials(email, password)?;
        let result = self.provider.sign_in_with_email(email.trim(), password).await;
        self.complete_sign_in(result, "Failed to sign in").await
    }

    pub async fn sign_up_with_email(&self, email: &str, password: &str) -> DomainResult<AuthUser> {
        check_credentials(email, password)?;
        let result = self.provider.sign_up_with_email(email.trim(), password).await;
        self.complete_sign_in(result, "Failed to create account").await
    }

    /// Sign in with an ID token obtained from Google on the page
    pub async fn sign_in_with_google(&self, google_id_token: &str) -> DomainResult<AuthUser> {
        let result = self
            .provider
            .sign_in_with_idp(GOOGLE_PROVIDER_ID, google_id_token)
            .await;
        self.complete_sign_in(result, "Failed to sign in with Google").await
    }

    /// Sign out locally and forget the stored session
    pub fn sign_out(&self) {
        self.session.clear();
    }

    /// Bring back the session stored by an earlier run. A rejected refresh
    /// token is dropped so the next start goes straight to the login form.
    pub async fn restore_session(&self) -> DomainResult<Option<AuthUser>> {
        let Some(saved) = self.session.stored() else {
            return Ok(None);
        };
        tracing::info!(uid = %saved.uid, "Restoring stored session");

        match self.provider.refresh(&saved.into_user()).await {
            Ok(user) => {
                self.session.set(user.clone());
                Ok(Some(user))
            }
            Err(e) => {
                tracing::warn!("Stored session rejected: {}", e);
                self.session.clear();
                Err(e)
            }
        }
    }

    async fn complete_sign_in(&self, result: DomainResult<AuthUser>, fallback: &str) -> DomainResult<AuthUser> {
        let user = result.map_err(|e| match e {
            DomainError::Auth(message) if message.trim().is_empty() => DomainError::Auth(fallback.to_string()),
            other => other,
        })?;

        self.session.set(user.clone());

        // Sign-in stands even when the profile sync fails
        if let Err(e) = self.backend.upsert_user(&user.profile()).await {
            tracing::error!("Failed to sync user to Data Connect: {}", e);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::persist::{MemorySessionStore, SessionStore, StoredSession};
    use crate::backend::{BackendOp, InMemoryBackend};
    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    struct FakeProvider;

    fn make_user(uid: &str, email: &str) -> AuthUser {
        AuthUser {
            uid: uid.into(),
            email: Some(email.into()),
            display_name: None,
            photo_url: None,
            id_token: "id".into(),
            refresh_token: "refresh".into(),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    #[async_trait(?Send)]
    impl AuthProvider for FakeProvider {
        async fn sign_in_with_email(&self, email: &str, password: &str) -> DomainResult<AuthUser> {
            if password == "right" {
                Ok(make_user("u1", email))
            } else {
                Err(DomainError::Auth("Invalid email or password".into()))
            }
        }

        async fn sign_up_with_email(&self, _: &str, _: &str) -> DomainResult<AuthUser> {
            Err(DomainError::Auth(String::new()))
        }

        async fn sign_in_with_idp(&self, provider_id: &str, _: &str) -> DomainResult<AuthUser> {
            assert_eq!(provider_id, GOOGLE_PROVIDER_ID);
            Ok(make_user("g1", "grace@example.com"))
        }

        async fn refresh(&self, user: &AuthUser) -> DomainResult<AuthUser> {
            if user.refresh_token == "revoked" {
                return Err(DomainError::Auth("Your session has expired. Please sign in again".into()));
            }
            let mut user = user.clone();
            user.id_token = "fresh".into();
            user.expires_at = Utc::now() + Duration::hours(1);
            Ok(user)
        }
    }

    fn setup() -> (AuthService<FakeProvider, InMemoryBackend>, Arc<InMemoryBackend>) {
        let backend = Arc::new(InMemoryBackend::new());
        let service = AuthService::new(Arc::new(FakeProvider), backend.clone(), SessionContext::init());
        (service, backend)
    }

    #[tokio::test]
    async fn test_sign_in_publishes_session_and_upserts_profile() {
        let (service, backend) = setup();
        let user = service.sign_in_with_email(" ada@example.com ", "right").await.unwrap();
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
        assert_eq!(service.session().uid().as_deref(), Some("u1"));
        assert_eq!(backend.users()[0].email.as_deref(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn test_empty_fields_never_reach_provider() {
        let (service, backend) = setup();
        let err = service.sign_in_with_email("  ", "right").await.unwrap_err();
        assert_eq!(err.to_string(), "Please fill in all fields");
        assert!(!service.session().is_authenticated());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_sign_in_leaves_session_empty() {
        let (service, _) = setup();
        let err = service.sign_in_with_email("ada@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");
        assert!(!service.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_empty_provider_error_uses_fallback() {
        let (service, _) = setup();
        let err = service.sign_up_with_email("ada@example.com", "pw").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to create account");
    }

    #[tokio::test]
    async fn test_upsert_failure_does_not_fail_sign_in() {
        let (service, backend) = setup();
        backend.fail(BackendOp::UpsertUser, "offline");
        let user = service.sign_in_with_google("google-jwt").await.unwrap();
        assert_eq!(user.uid, "g1");
        assert!(service.session().is_authenticated());
        assert_eq!(backend.call_count(BackendOp::UpsertUser), 1);
    }

    #[tokio::test]
    async fn test_sign_out_clears_session() {
        let (service, _) = setup();
        service.sign_in_with_email("ada@example.com", "right").await.unwrap();
        service.sign_out();
        assert!(service.session().current().is_none());
    }

    fn setup_stored(saved: Option<StoredSession>) -> (AuthService<FakeProvider, InMemoryBackend>, Arc<MemorySessionStore>) {
        let store = Arc::new(match saved {
            Some(saved) => MemorySessionStore::with_session(saved),
            None => MemorySessionStore::new(),
        });
        let session = SessionContext::with_store(store.clone());
        let service = AuthService::new(Arc::new(FakeProvider), Arc::new(InMemoryBackend::new()), session);
        (service, store)
    }

    #[tokio::test]
    async fn test_sign_in_and_out_update_stored_session() {
        let (service, store) = setup_stored(None);
        service.sign_in_with_email("ada@example.com", "right").await.unwrap();
        assert_eq!(store.load().unwrap().email.as_deref(), Some("ada@example.com"));

        service.sign_out();
        assert!(store.load().is_none());
    }

    #[tokio::test]
    async fn test_restore_without_stored_session() {
        let (service, _) = setup_stored(None);
        assert_eq!(service.restore_session().await.unwrap(), None);
        assert!(!service.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_restore_rejected_token_is_forgotten() {
        let mut saved = StoredSession::from_user(&make_user("u1", "ada@example.com"));
        saved.refresh_token = "revoked".into();
        let (service, store) = setup_stored(Some(saved));

        let err = service.restore_session().await.unwrap_err();
        assert_eq!(err.to_string(), "Your session has expired. Please sign in again");
        assert!(!service.session().is_authenticated());
        assert!(store.load().is_none());
    }
}
