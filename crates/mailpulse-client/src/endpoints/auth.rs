//! `/api/auth` routes.
//!
//! The credential routes opt out of refresh-on-401: a rejection there means
//! the supplied credentials were wrong, not that a session expired.

use mailpulse_api_models::{AuthTokens, LoginCredentials, RefreshRequest, RegisterData, User};

use crate::error::ApiResult;
use crate::gateway::{ApiRequest, Gateway, REFRESH_PATH};

const LOGIN_PATH: &str = "/api/auth/login";
const REGISTER_PATH: &str = "/api/auth/register";
const ME_PATH: &str = "/api/auth/me";

/// Authentication routes.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> AuthApi<'a> {
    pub(crate) const fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Exchange email and password for a token pair. The backend expects an
    /// OAuth2 password form with the email in `username`.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors; wrong credentials surface as a `401`
    /// [`crate::ApiError::Http`].
    pub async fn login(&self, credentials: &LoginCredentials) -> ApiResult<AuthTokens> {
        let request = ApiRequest::post(LOGIN_PATH)
            .form(credentials.form_fields())
            .without_refresh();
        self.gateway.request(request).await
    }

    /// Create an account and receive its first token pair.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn register(&self, data: &RegisterData) -> ApiResult<AuthTokens> {
        let request = ApiRequest::post(REGISTER_PATH)
            .json(data)?
            .without_refresh();
        self.gateway.request(request).await
    }

    /// Profile of the signed-in user.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn me(&self) -> ApiResult<User> {
        self.gateway.request(ApiRequest::get(ME_PATH)).await
    }

    /// Exchange a refresh token explicitly. The gateway does this on its own
    /// when a call is rejected; hosts rarely need it.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn refresh(&self, refresh_token: &str) -> ApiResult<AuthTokens> {
        let request = ApiRequest::post(REFRESH_PATH)
            .json(&RefreshRequest {
                refresh_token: refresh_token.to_string(),
            })?
            .without_refresh();
        self.gateway.request(request).await
    }
}
