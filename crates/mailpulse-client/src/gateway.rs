//! Authenticated request gateway.
//!
//! Every backend call goes through [`Gateway::execute`]:
//!
//! 1. attach `Authorization: Bearer <access token>` when the session has one;
//! 2. on `401`, exchange the refresh token once and retry the call once;
//! 3. if the refresh fails (or the retry is rejected again) clear the
//!    session, fire the [`AuthLostHook`], and return [`ApiError::AuthExpired`];
//! 4. map other non-2xx responses to normalised errors;
//! 5. resolve `204` with no body, anything else with the JSON payload.
//!
//! Refreshes are serialised behind a single async gate. A call that lost the
//! race finds a different access token in the session once it gets through
//! the gate and retries with that instead of refreshing a second time. Each
//! loss of the session bumps a generation counter, so concurrent calls that
//! were rejected together end the session (and fire the hook) only once.

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use mailpulse_api_models::{AuthTokens, RefreshRequest};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;
use url::form_urlencoded;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult, normalize_error};
use crate::session::Session;

/// Path of the token refresh endpoint.
pub const REFRESH_PATH: &str = "/api/auth/refresh";

const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Callback fired when the session is lost and the user must sign in again.
///
/// Browser hosts navigate to their login screen here; other hosts may print a
/// hint or flip a flag. Closures implement the trait.
pub trait AuthLostHook: Send + Sync {
    /// Called after the stored tokens have been cleared.
    fn on_authentication_lost(&self);
}

impl<F> AuthLostHook for F
where
    F: Fn() + Send + Sync,
{
    fn on_authentication_lost(&self) {
        self();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RequestBody {
    Empty,
    Json(Vec<u8>),
    Form(String),
}

/// Description of one backend call. Cheap to clone; never mutated once sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: RequestBody,
    refresh_on_unauthorized: bool,
}

impl ApiRequest {
    /// Request for `path`, which must start with `/` and is appended to the base URL.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
            refresh_on_unauthorized: true,
        }
    }

    /// `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST` request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PATCH` request.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// `DELETE` request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Encode`] when `body` cannot be serialised.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> ApiResult<Self> {
        let encoded = serde_json::to_vec(body).map_err(|source| ApiError::Encode {
            path: self.path.clone(),
            source,
        })?;
        self.body = RequestBody::Json(encoded);
        Ok(self)
    }

    /// Attach a form-encoded body.
    #[must_use]
    pub fn form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in fields {
            serializer.append_pair(key.as_ref(), value.as_ref());
        }
        self.body = RequestBody::Form(serializer.finish());
        self
    }

    /// Append query parameters to the path. An empty iterator leaves the path untouched.
    #[must_use]
    pub fn query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        let mut any = false;
        for (key, value) in pairs {
            serializer.append_pair(key.as_ref(), value.as_ref());
            any = true;
        }
        if any {
            let separator = if self.path.contains('?') { '&' } else { '?' };
            self.path.push(separator);
            self.path.push_str(&serializer.finish());
        }
        self
    }

    /// Add or replace a header. Caller headers override the default content type.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Report a `401` as an ordinary error instead of refreshing the session.
    ///
    /// Used by the credential endpoints, where a rejection means bad input
    /// rather than an expired token.
    #[must_use]
    pub const fn without_refresh(mut self) -> Self {
        self.refresh_on_unauthorized = false;
        self
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Path including any query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    fn outbound_headers(&self) -> HeaderMap {
        let content_type = match self.body {
            RequestBody::Form(_) => CONTENT_TYPE_FORM,
            RequestBody::Empty | RequestBody::Json(_) => CONTENT_TYPE_JSON,
        };
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        for (name, value) in &self.headers {
            headers.insert(name.clone(), value.clone());
        }
        headers
    }
}

/// HTTP gateway bound to one backend and one session.
pub struct Gateway {
    http: Client,
    base_url: String,
    session: Arc<Session>,
    auth_lost: Arc<dyn AuthLostHook>,
    refresh_gate: Mutex<()>,
    session_generation: AtomicU64,
}

impl Debug for Gateway {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Gateway {
    /// Build a gateway with its own HTTP client honouring the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] when the HTTP client cannot be created.
    pub fn new(config: &ClientConfig, session: Arc<Session>) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::ClientBuild)?;
        Ok(Self::with_client(http, &config.base_url, session))
    }

    /// Build a gateway around an existing HTTP client.
    #[must_use]
    pub fn with_client(http: Client, base_url: &Url, session: Arc<Session>) -> Self {
        Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            session,
            auth_lost: Arc::new(|| {}),
            refresh_gate: Mutex::new(()),
            session_generation: AtomicU64::new(0),
        }
    }

    /// Install the callback fired when the session is lost.
    #[must_use]
    pub fn with_auth_lost_hook(mut self, hook: impl AuthLostHook + 'static) -> Self {
        self.auth_lost = Arc::new(hook);
        self
    }

    /// Session whose tokens this gateway attaches.
    #[must_use]
    pub const fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send `request` and decode the JSON response. A `204` decodes from
    /// `null`, so `()` and `Option<_>` targets resolve to "no value".
    ///
    /// # Errors
    ///
    /// See [`Gateway::execute`]; additionally [`ApiError::Decode`] when the
    /// body does not match `T`.
    pub async fn request<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        let decoded = match self.execute(&request).await? {
            Some(body) => serde_json::from_slice(&body),
            None => T::deserialize(serde_json::Value::Null),
        };
        decoded.map_err(|source| ApiError::Decode {
            path: request.path.clone(),
            source,
        })
    }

    /// Send `request`, handling authentication expiry, and return the raw
    /// success body (`None` for `204 No Content`).
    ///
    /// # Errors
    ///
    /// - [`ApiError::Network`] when the transport fails;
    /// - [`ApiError::AuthExpired`] when the session was rejected and could not be refreshed;
    /// - [`ApiError::Validation`] / [`ApiError::Http`] for other non-2xx responses;
    /// - [`ApiError::InvalidUrl`] when the path does not form a URL.
    pub async fn execute(&self, request: &ApiRequest) -> ApiResult<Option<Vec<u8>>> {
        let url = self.url_for(&request.path)?;
        let generation = self.session_generation.load(Ordering::Acquire);
        let sent_token = self.session.access_token();
        let response = self.send(&url, request, sent_token.as_deref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED || !request.refresh_on_unauthorized {
            return Self::finish(request, response).await;
        }

        debug!(path = %request.path, "access token rejected; refreshing session");
        self.recover_session(&request.path, sent_token.as_deref(), generation)
            .await?;

        let token = self.session.access_token();
        let retry = self.send(&url, request, token.as_deref()).await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            warn!(path = %request.path, "refreshed token rejected; ending session");
            return Err(self.lose_authentication(&request.path, generation));
        }
        Self::finish(request, retry).await
    }

    fn url_for(&self, path: &str) -> ApiResult<Url> {
        Url::parse(&format!("{}{path}", self.base_url)).map_err(|source| ApiError::InvalidUrl {
            path: path.to_string(),
            source,
        })
    }

    async fn send(
        &self,
        url: &Url,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> ApiResult<Response> {
        let mut builder = self
            .http
            .request(request.method.clone(), url.clone())
            .headers(request.outbound_headers());
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(bytes) => builder.body(bytes.clone()),
            RequestBody::Form(encoded) => builder.body(encoded.clone()),
        };

        let response = builder.send().await.map_err(|source| ApiError::Network {
            path: request.path.clone(),
            source,
        })?;
        debug!(
            method = %request.method,
            path = %request.path,
            status = response.status().as_u16(),
            "api response"
        );
        Ok(response)
    }

    async fn finish(request: &ApiRequest, response: Response) -> ApiResult<Option<Vec<u8>>> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Network {
                path: request.path.clone(),
                source,
            })?;

        if !status.is_success() {
            return Err(normalize_error(status, &body));
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        Ok(Some(body.to_vec()))
    }

    /// Make the session usable again after `rejected` was refused, or end it.
    /// Runs entirely under the refresh gate so only one caller refreshes or
    /// ends the session for a given rejection.
    async fn recover_session(
        &self,
        path: &str,
        rejected: Option<&str>,
        generation: u64,
    ) -> ApiResult<()> {
        let _gate = self.refresh_gate.lock().await;

        if let Some(current) = self.session.access_token()
            && rejected != Some(current.as_str())
        {
            debug!("session already refreshed by a concurrent request");
            return Ok(());
        }
        if self.session_generation.load(Ordering::Acquire) != generation {
            debug!(path = %path, "session already ended by a concurrent request");
            return Err(ApiError::AuthExpired);
        }
        if self.refresh_session().await {
            Ok(())
        } else {
            Err(self.lose_authentication(path, generation))
        }
    }

    /// Exchange the refresh token for a new pair. Returns whether the session
    /// now holds a token worth retrying with. Callers hold the refresh gate.
    async fn refresh_session(&self) -> bool {
        let refresh_token = match self.session.refresh_token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("no refresh token stored");
                return false;
            }
            Err(err) => {
                warn!(error = %err, "failed to read refresh token");
                return false;
            }
        };

        let Ok(url) = self.url_for(REFRESH_PATH) else {
            return false;
        };
        let response = match self
            .http
            .post(url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "token refresh request failed");
                return false;
            }
        };

        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), "token refresh rejected");
            return false;
        }

        let tokens = match response.json::<AuthTokens>().await {
            Ok(tokens) => tokens,
            Err(err) => {
                warn!(error = %err, "token refresh returned an unexpected body");
                return false;
            }
        };

        if let Err(err) = self.session.save(&tokens) {
            warn!(error = %err, "failed to persist refreshed tokens");
            return false;
        }
        info!("session refreshed");
        true
    }

    /// End the session seen at `generation`. Only the first caller for a
    /// generation clears the tokens and fires the hook.
    fn lose_authentication(&self, path: &str, generation: u64) -> ApiError {
        if self
            .session_generation
            .compare_exchange(generation, generation + 1, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(path = %path, "session already ended by a concurrent request");
            return ApiError::AuthExpired;
        }
        warn!(path = %path, "authentication lost; clearing session");
        if let Err(err) = self.session.clear() {
            warn!(error = %err, "failed to clear stored tokens");
        }
        self.auth_lost.on_authentication_lost();
        ApiError::AuthExpired
    }
}
