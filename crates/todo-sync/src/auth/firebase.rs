//! Firebase Auth REST Client
//!
//! Email/password and federated sign-in against the Identity Toolkit API,
//! token refresh against the Secure Token API.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::provider::AuthProvider;
use crate::config::{Endpoints, FirebaseConfig};
use crate::domain::{AuthUser, DomainError, DomainResult};

/// Provider id for Google federated sign-in
pub const GOOGLE_PROVIDER_ID: &str = "google.com";

const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    photo_url: Option<String>,
    id_token: String,
    refresh_token: String,
    expires_in: Option<String>,
}

#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: Option<String>,
    user_id: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

fn expires_at(expires_in: Option<&str>) -> chrono::DateTime<Utc> {
    let secs = expires_in
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(DEFAULT_EXPIRES_IN_SECS);
    Utc::now() + Duration::seconds(secs)
}

/// Turn an Identity Toolkit error code into a sentence for the login form
fn friendly_message(code: &str) -> String {
    // Codes may carry detail: "WEAK_PASSWORD : Password should be at least 6 characters"
    let (head, detail) = match code.split_once(" : ") {
        Some((head, detail)) => (head.trim(), Some(detail.trim())),
        None => (code.trim(), None),
    };
    match head {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "Invalid email or password".to_string()
        }
        "EMAIL_EXISTS" => "An account with this email already exists".to_string(),
        "INVALID_EMAIL" => "Please enter a valid email address".to_string(),
        "USER_DISABLED" => "This account has been disabled".to_string(),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts. Please try again later".to_string(),
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" => {
            "Your session has expired. Please sign in again".to_string()
        }
        _ => detail.unwrap_or(head).to_string(),
    }
}

/// Firebase Auth over REST
pub struct FirebaseAuth {
    http: Client,
    api_key: String,
    endpoints: Endpoints,
}

impl FirebaseAuth {
    pub fn new(config: &FirebaseConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(http: Client, config: &FirebaseConfig) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            endpoints: config.endpoints.clone(),
        }
    }

    async fn error_from(response: reqwest::Response, fallback: &str) -> DomainError {
        let text = response.text().await.unwrap_or_default();
        let code = serde_json::from_str::<ErrorBody>(&text)
            .map(|b| b.error.message)
            .unwrap_or_default();
        if code.is_empty() {
            DomainError::Auth(fallback.to_string())
        } else {
            DomainError::Auth(friendly_message(&code))
        }
    }

    /// POST to an `accounts:*` method and map the account payload to a user
    #[tracing::instrument(skip(self, body))]
    async fn accounts_call(&self, method: &str, body: Value, fallback: &str) -> DomainResult<AuthUser> {
        let url = format!(
            "{}/v1/accounts:{}",
            self.endpoints.identity_toolkit.trim_end_matches('/'),
            method
        );
        let response = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            let err = Self::error_from(response, fallback).await;
            tracing::warn!("Identity Toolkit rejected {}: {}", method, err);
            return Err(err);
        }

        let account: AccountResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Auth(e.to_string()))?;
        Ok(AuthUser {
            uid: account.local_id,
            email: account.email,
            display_name: account.display_name,
            photo_url: account.photo_url,
            expires_at: expires_at(account.expires_in.as_deref()),
            id_token: account.id_token,
            refresh_token: account.refresh_token,
        })
    }
}

#[async_trait(?Send)]
impl AuthProvider for FirebaseAuth {
    async fn sign_in_with_email(&self, email: &str, password: &str) -> DomainResult<AuthUser> {
        let body = json!({ "email": email, "password": password, "returnSecureToken": true });
        self.accounts_call("signInWithPassword", body, "Failed to sign in").await
    }

    async fn sign_up_with_email(&self, email: &str, password: &str) -> DomainResult<AuthUser> {
        let body = json!({ "email": email, "password": password, "returnSecureToken": true });
        self.accounts_call("signUp", body, "Failed to create account").await
    }

    async fn sign_in_with_idp(&self, provider_id: &str, id_token: &str) -> DomainResult<AuthUser> {
        let body = json!({
            "postBody": format!("id_token={}&providerId={}", id_token, provider_id),
            "requestUri": "http://localhost",
            "returnIdpCredential": true,
            "returnSecureToken": true,
        });
        self.accounts_call("signInWithIdp", body, "Failed to sign in with Google").await
    }

    #[tracing::instrument(skip_all, fields(uid = %user.uid))]
    async fn refresh(&self, user: &AuthUser) -> DomainResult<AuthUser> {
        let url = format!("{}/v1/token", self.endpoints.secure_token.trim_end_matches('/'));
        let response = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", user.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DomainError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, "Failed to refresh session").await);
        }

        let data: RefreshResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Auth(e.to_string()))?;
        if data.user_id != user.uid {
            return Err(DomainError::Auth("Refreshed token belongs to another user".to_string()));
        }

        let mut refreshed = user.clone();
        refreshed.expires_at = expires_at(data.expires_in.as_deref());
        refreshed.id_token = data.id_token;
        refreshed.refresh_token = data.refresh_token;
        Ok(refreshed)
    }
}
