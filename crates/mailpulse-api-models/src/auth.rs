//! Authentication payloads: credentials, token pairs, and the current user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access/refresh token pair issued by login, register, and refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthTokens {
    /// Short-lived bearer credential attached to each request.
    pub access_token: String,
    /// Long-lived credential exchanged for a new pair on expiry.
    pub refresh_token: String,
    /// Token scheme reported by the server (normally `bearer`).
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Email/password pair submitted to the login endpoint.
///
/// The server expects OAuth2-style form fields, see [`LoginCredentials::form_fields`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    /// Account email address.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

impl LoginCredentials {
    /// Form-encoded field pairs (`username`, `password`) for the login call.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(String, String)> {
        vec![
            ("username".to_string(), self.email.clone()),
            ("password".to_string(), self.password.clone()),
        ]
    }
}

/// Registration payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterData {
    /// Account email address.
    pub email: String,
    /// Plain-text password.
    pub password: String,
    /// Display name for the account owner.
    pub full_name: String,
}

/// Body of `POST /api/auth/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshRequest {
    /// Refresh token being exchanged.
    pub refresh_token: String,
}

/// Subscription tier attached to a user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserPlan {
    /// Free tier.
    Free,
    /// Entry paid tier.
    Starter,
    /// Professional tier.
    Pro,
    /// Enterprise contract.
    Enterprise,
}

impl UserPlan {
    /// Wire representation of the plan.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Starter => "starter",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
        }
    }
}

/// Authenticated user returned by `GET /api/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// User identifier.
    pub id: Uuid,
    /// Login email.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Current subscription tier.
    pub plan: UserPlan,
    /// Whether the account is enabled.
    pub is_active: bool,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_credentials_map_email_to_username_field() {
        let credentials = LoginCredentials {
            email: "owner@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        assert_eq!(
            credentials.form_fields(),
            vec![
                ("username".to_string(), "owner@example.com".to_string()),
                ("password".to_string(), "hunter2".to_string()),
            ]
        );
    }

    #[test]
    fn auth_tokens_default_token_type_when_missing() {
        let tokens: AuthTokens = serde_json::from_value(json!({
            "access_token": "a",
            "refresh_token": "r"
        }))
        .expect("tokens decode");
        assert_eq!(tokens.token_type, "bearer");
    }

    #[test]
    fn user_plan_decodes_snake_case() {
        let plan: UserPlan = serde_json::from_value(json!("enterprise")).expect("plan decodes");
        assert_eq!(plan, UserPlan::Enterprise);
        assert_eq!(plan.as_str(), "enterprise");
    }
}
