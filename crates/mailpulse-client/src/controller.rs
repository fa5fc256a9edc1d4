//! Sign-in state for a host UI.
//!
//! The controller owns the [`Gateway`] and keeps a small [`AuthSnapshot`] the
//! host can render from: who is signed in, and whether the initial check is
//! still running.

use std::sync::{PoisonError, RwLock};

use mailpulse_api_models::{AuthTokens, LoginCredentials, RegisterData, User};
use tracing::{debug, info, warn};

use crate::error::ApiResult;
use crate::gateway::Gateway;

/// What the host needs to know about the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    /// Current user, once fetched.
    pub user: Option<User>,
    /// `true` until [`AuthController::initialize`] has finished.
    pub is_loading: bool,
    /// Whether the backend accepted the stored session.
    pub is_authenticated: bool,
}

impl Default for AuthSnapshot {
    fn default() -> Self {
        Self {
            user: None,
            is_loading: true,
            is_authenticated: false,
        }
    }
}

impl AuthSnapshot {
    const fn signed_out() -> Self {
        Self {
            user: None,
            is_loading: false,
            is_authenticated: false,
        }
    }

    const fn signed_in(user: User) -> Self {
        Self {
            user: Some(user),
            is_loading: false,
            is_authenticated: true,
        }
    }
}

/// Login, registration and logout on top of a [`Gateway`].
#[derive(Debug)]
pub struct AuthController {
    gateway: Gateway,
    state: RwLock<AuthSnapshot>,
}

impl AuthController {
    /// Controller in the loading state; call [`AuthController::initialize`] next.
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            state: RwLock::new(AuthSnapshot::default()),
        }
    }

    /// Gateway used for every other API call.
    #[must_use]
    pub const fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> AuthSnapshot {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Restore persisted tokens and, if there are any, confirm them with the
    /// backend. Never fails: any problem leaves the user signed out.
    pub async fn initialize(&self) -> AuthSnapshot {
        let restored = match self.gateway.session().restore() {
            Ok(found) => found,
            Err(err) => {
                warn!(error = %err, "failed to restore stored session");
                false
            }
        };
        if restored {
            self.fetch_user().await;
        } else {
            debug!("no stored session");
            self.replace(AuthSnapshot::signed_out());
        }
        self.snapshot()
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Propagates login, storage and profile errors; the state is left
    /// unchanged when login itself fails.
    pub async fn login(&self, credentials: &LoginCredentials) -> ApiResult<User> {
        let tokens = self.gateway.auth().login(credentials).await?;
        self.adopt(&tokens).await
    }

    /// Create an account and sign in to it.
    ///
    /// # Errors
    ///
    /// Propagates registration, storage and profile errors.
    pub async fn register(&self, data: &RegisterData) -> ApiResult<User> {
        let tokens = self.gateway.auth().register(data).await?;
        self.adopt(&tokens).await
    }

    /// Refresh the current user. Failures sign the user out locally and are
    /// not reported.
    pub async fn fetch_user(&self) -> Option<User> {
        match self.gateway.auth().me().await {
            Ok(user) => {
                self.replace(AuthSnapshot::signed_in(user.clone()));
                Some(user)
            }
            Err(err) => {
                debug!(error = %err, "could not load current user");
                self.replace(AuthSnapshot::signed_out());
                None
            }
        }
    }

    /// Forget the session. The auth-lost hook is not fired; the host asked
    /// for this and navigates on its own.
    ///
    /// # Errors
    ///
    /// Returns an error when stored tokens cannot be removed; the in-memory
    /// state is signed out regardless.
    pub fn logout(&self) -> ApiResult<()> {
        self.replace(AuthSnapshot::signed_out());
        self.gateway.session().clear()?;
        info!("signed out");
        Ok(())
    }

    async fn adopt(&self, tokens: &AuthTokens) -> ApiResult<User> {
        self.gateway.session().save(tokens)?;
        let user = self.gateway.auth().me().await?;
        info!(email = %user.email, "signed in");
        self.replace(AuthSnapshot::signed_in(user.clone()));
        Ok(user)
    }

    fn replace(&self, next: AuthSnapshot) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next;
    }
}
