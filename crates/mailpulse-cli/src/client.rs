//! Gateway construction, session file location, and error types for the CLI.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use mailpulse_client::{ApiError, AuthController, ClientConfig, FileTokenStore, Gateway, Session};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;
use url::Url;

use crate::cli::OutputFormat;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";
pub(crate) const LOGIN_HINT: &str = "session expired; run `mailpulse login` to sign in again";

const SESSION_DIR: &str = "mailpulse";
const SESSION_FILE: &str = "session.json";

/// CLI-level error type to distinguish validation, auth loss, and operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
    AuthLost,
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
            Self::AuthLost => 4,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
            Self::AuthLost => "not signed in".to_string(),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthExpired => Self::AuthLost,
            ApiError::Validation { message, .. } => Self::Validation(message),
            ApiError::Http { status, message } if matches!(status, 400 | 409 | 422) => {
                Self::Validation(message)
            }
            ApiError::Http { status, message } => {
                Self::Failure(anyhow!("{message} (status {status})"))
            }
            other => Self::Failure(other.into()),
        }
    }
}

/// Global options shared by every command.
#[derive(Debug, Clone)]
pub(crate) struct Connection {
    pub(crate) api_url: Url,
    pub(crate) timeout_secs: u64,
    pub(crate) session_file: Option<PathBuf>,
}

/// Application context passed to command handlers.
pub(crate) struct AppContext {
    pub(crate) auth: AuthController,
    pub(crate) output: OutputFormat,
}

impl AppContext {
    /// Build the gateway, restore the stored session, and wire the auth-lost hint.
    pub(crate) fn connect(
        connection: &Connection,
        output: OutputFormat,
        trace_id: &str,
    ) -> CliResult<Self> {
        let config = ClientConfig {
            base_url: connection.api_url.clone(),
            timeout: Duration::from_secs(connection.timeout_secs),
        };
        let session_path = match &connection.session_file {
            Some(path) => path.clone(),
            None => default_session_path().ok_or_else(|| {
                CliError::validation(
                    "could not determine a config directory; pass --session-file or set MAILPULSE_SESSION_FILE",
                )
            })?,
        };
        debug!(path = %session_path.display(), "using session file");

        let session = Session::new(FileTokenStore::new(session_path));
        session
            .restore()
            .map_err(|err| {
                CliError::failure(anyhow::Error::new(err).context("failed to read stored session"))
            })?;

        let http = build_http_client(&config, trace_id)?;
        let gateway = Gateway::with_client(http, &config.base_url, Arc::new(session))
            .with_auth_lost_hook(|| eprintln!("hint: {LOGIN_HINT}"));

        Ok(Self {
            auth: AuthController::new(gateway),
            output,
        })
    }

    pub(crate) const fn gateway(&self) -> &Gateway {
        self.auth.gateway()
    }
}

fn build_http_client(config: &ClientConfig, trace_id: &str) -> CliResult<Client> {
    let mut default_headers = HeaderMap::new();
    let request_id = HeaderValue::from_str(trace_id)
        .map_err(|_| CliError::failure(anyhow!("trace identifier contains invalid characters")))?;
    default_headers.insert(HEADER_REQUEST_ID, request_id);

    Client::builder()
        .timeout(config.timeout)
        .default_headers(default_headers)
        .build()
        .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))
}

/// `<config dir>/mailpulse/session.json`, when the platform has a config dir.
#[must_use]
pub(crate) fn default_session_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(SESSION_DIR).join(SESSION_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use tempfile::tempdir;

    #[test]
    fn api_errors_map_to_exit_codes() {
        let cases = [
            (ApiError::AuthExpired, 4),
            (
                ApiError::Validation {
                    status: 422,
                    message: "field required".to_string(),
                },
                2,
            ),
            (
                ApiError::Http {
                    status: 409,
                    message: "Email already registered".to_string(),
                },
                2,
            ),
            (
                ApiError::Http {
                    status: 500,
                    message: "HTTP 500".to_string(),
                },
                3,
            ),
        ];
        for (err, code) in cases {
            assert_eq!(CliError::from(err).exit_code(), code);
        }
    }

    #[test]
    fn failure_messages_include_status() {
        let err = CliError::from(ApiError::Http {
            status: 404,
            message: "Review not found".to_string(),
        });
        assert_eq!(err.display_message(), "Review not found (status 404)");
        assert_eq!(CliError::AuthLost.display_message(), "not signed in");
    }

    #[test]
    fn default_session_path_ends_with_app_file() {
        if let Some(path) = default_session_path() {
            assert!(path.ends_with("mailpulse/session.json"));
        }
    }

    #[tokio::test]
    async fn requests_carry_trace_id() -> Result<()> {
        let dir = tempdir()?;
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/billing/usage")
                .header(HEADER_REQUEST_ID, "trace-123");
            then.status(200).json_body(serde_json::json!({
                "emails_used": 1,
                "emails_limit": 100,
                "email_accounts_used": 1,
                "email_accounts_limit": 1,
                "period_start": null,
                "period_end": null
            }));
        });

        let connection = Connection {
            api_url: server.base_url().parse()?,
            timeout_secs: 5,
            session_file: Some(dir.path().join("session.json")),
        };
        let ctx = AppContext::connect(&connection, OutputFormat::Json, "trace-123")
            .map_err(|err| anyhow!(err.display_message()))?;
        let usage = ctx
            .gateway()
            .billing()
            .usage()
            .await
            .map_err(|err| anyhow!(err))?;

        assert_eq!(usage.emails_limit, 100);
        mock.assert();
        Ok(())
    }
}
