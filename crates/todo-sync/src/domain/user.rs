//! User Entities
//!
//! The signed-in session user and the profile mirrored into the backend.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tokens are treated as expired this long before their real expiry
const EXPIRY_SKEW_SECS: i64 = 60;

/// An authenticated session user
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthUser {
    pub fn is_token_expired(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_SKEW_SECS) >= self.expires_at
    }

    /// Name shown in the header: display name, then email, then uid
    pub fn display_label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.uid)
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            photo_url: self.photo_url.clone(),
        }
    }
}

impl fmt::Debug for AuthUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthUser")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Profile fields upserted into the backend after sign-in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_user(expires_in: i64) -> AuthUser {
        AuthUser {
            uid: "uid-1".into(),
            email: Some("ada@example.com".into()),
            display_name: None,
            photo_url: None,
            id_token: "secret-id-token".into(),
            refresh_token: "secret-refresh".into(),
            expires_at: Utc::now() + Duration::seconds(expires_in),
        }
    }

    #[test]
    fn test_token_expiry_uses_skew() {
        let now = Utc::now();
        assert!(!make_user(3600).is_token_expired(now));
        assert!(make_user(30).is_token_expired(now));
    }

    #[test]
    fn test_display_label_fallbacks() {
        let mut user = make_user(3600);
        assert_eq!(user.display_label(), "ada@example.com");
        user.display_name = Some("Ada".into());
        assert_eq!(user.display_label(), "Ada");
        user.display_name = None;
        user.email = None;
        assert_eq!(user.display_label(), "uid-1");
    }

    #[test]
    fn test_debug_hides_tokens() {
        let rendered = format!("{:?}", make_user(3600));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_profile_serializes_nulls() {
        let value = serde_json::to_value(make_user(3600).profile()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"email": "ada@example.com", "displayName": null, "photoUrl": null})
        );
    }
}
