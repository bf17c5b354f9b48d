//! Auth Layer - Core Traits
//!
//! Identity provider contract and the bearer token source built on it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::session::SessionContext;
use crate::domain::{AuthUser, DomainResult};

/// Hosted identity provider
#[async_trait(?Send)]
pub trait AuthProvider {
    async fn sign_in_with_email(&self, email: &str, password: &str) -> DomainResult<AuthUser>;

    async fn sign_up_with_email(&self, email: &str, password: &str) -> DomainResult<AuthUser>;

    /// Federated sign-in with an ID token issued by `provider_id` (e.g. `google.com`)
    async fn sign_in_with_idp(&self, provider_id: &str, id_token: &str) -> DomainResult<AuthUser>;

    /// Exchange the refresh token for a fresh ID token
    async fn refresh(&self, user: &AuthUser) -> DomainResult<AuthUser>;
}

/// Supplies the bearer token attached to backend calls
#[async_trait(?Send)]
pub trait TokenSource {
    /// Current session token, `None` when signed out
    async fn bearer_token(&self, force_refresh: bool) -> DomainResult<Option<String>>;
}

/// Token source reading the session and refreshing through the provider
pub struct SessionTokens<P: ?Sized> {
    session: SessionContext,
    provider: Arc<P>,
}

impl<P: ?Sized> SessionTokens<P> {
    pub fn new(session: SessionContext, provider: Arc<P>) -> Self {
        Self { session, provider }
    }
}

#[async_trait(?Send)]
impl<P: AuthProvider + ?Sized> TokenSource for SessionTokens<P> {
    async fn bearer_token(&self, force_refresh: bool) -> DomainResult<Option<String>> {
        let Some(user) = self.session.current() else {
            return Ok(None);
        };
        if !force_refresh && !user.is_token_expired(Utc::now()) {
            return Ok(Some(user.id_token));
        }

        tracing::debug!(force_refresh, "Refreshing ID token");
        let refreshed = self.provider.refresh(&user).await?;
        let token = refreshed.id_token.clone();
        self.session.refresh_user(refreshed);
        Ok(Some(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        refreshes: AtomicUsize,
    }

    #[async_trait(?Send)]
    impl AuthProvider for CountingProvider {
        async fn sign_in_with_email(&self, _: &str, _: &str) -> DomainResult<AuthUser> {
            Err(DomainError::Auth("unused".into()))
        }

        async fn sign_up_with_email(&self, _: &str, _: &str) -> DomainResult<AuthUser> {
            Err(DomainError::Auth("unused".into()))
        }

        async fn sign_in_with_idp(&self, _: &str, _: &str) -> DomainResult<AuthUser> {
            Err(DomainError::Auth("unused".into()))
        }

        async fn refresh(&self, user: &AuthUser) -> DomainResult<AuthUser> {
            let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
            let mut user = user.clone();
            user.id_token = format!("refreshed-{}", n);
            user.expires_at = Utc::now() + Duration::hours(1);
            Ok(user)
        }
    }

    fn make_user(expires_in: Duration) -> AuthUser {
        AuthUser {
            uid: "u1".into(),
            email: None,
            display_name: None,
            photo_url: None,
            id_token: "original".into(),
            refresh_token: "refresh".into(),
            expires_at: Utc::now() + expires_in,
        }
    }

    fn setup() -> (SessionContext, Arc<CountingProvider>, SessionTokens<CountingProvider>) {
        let session = SessionContext::init();
        let provider = Arc::new(CountingProvider { refreshes: AtomicUsize::new(0) });
        let tokens = SessionTokens::new(session.clone(), provider.clone());
        (session, provider, tokens)
    }

    #[tokio::test]
    async fn test_no_token_when_signed_out() {
        let (_, provider, tokens) = setup();
        assert_eq!(tokens.bearer_token(true).await.unwrap(), None);
        assert_eq!(provider.refreshes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_token_is_reused() {
        let (session, provider, tokens) = setup();
        session.set(make_user(Duration::hours(1)));
        assert_eq!(tokens.bearer_token(false).await.unwrap().as_deref(), Some("original"));
        assert_eq!(provider.refreshes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_expired_or_forced_token_is_refreshed() {
        let (session, _, tokens) = setup();
        session.set(make_user(Duration::seconds(-5)));
        assert_eq!(tokens.bearer_token(false).await.unwrap().as_deref(), Some("refreshed-1"));
        assert_eq!(session.current().unwrap().id_token, "refreshed-1");

        assert_eq!(tokens.bearer_token(true).await.unwrap().as_deref(), Some("refreshed-2"));
    }
}
