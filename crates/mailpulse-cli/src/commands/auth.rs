//! `login`, `register`, `logout` and `whoami`.

use std::io::{self, BufRead, Write};

use anyhow::anyhow;
use mailpulse_api_models::{LoginCredentials, RegisterData};

use crate::cli::{LoginArgs, RegisterArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_message, render_user};

pub(crate) async fn handle_login(ctx: &AppContext, args: LoginArgs) -> CliResult<()> {
    let email = match args.email {
        Some(email) => email,
        None => prompt_line("Email: ")?,
    };
    let email = required("email", &email)?;
    let password = password_or_prompt(args.password)?;

    let user = ctx
        .auth
        .login(&LoginCredentials { email, password })
        .await?;
    render_user(&user, ctx.output)
}

pub(crate) async fn handle_register(ctx: &AppContext, args: RegisterArgs) -> CliResult<()> {
    let email = required("email", &args.email)?;
    let full_name = required("name", &args.name)?;
    let password = password_or_prompt(args.password)?;

    let user = ctx
        .auth
        .register(&RegisterData {
            email,
            password,
            full_name,
        })
        .await?;
    render_user(&user, ctx.output)
}

pub(crate) fn handle_logout(ctx: &AppContext) -> CliResult<()> {
    ctx.auth.logout()?;
    render_message("Signed out.", ctx.output)
}

pub(crate) async fn handle_whoami(ctx: &AppContext) -> CliResult<()> {
    if !ctx.gateway().session().is_authenticated() {
        return Err(CliError::AuthLost);
    }
    let user = ctx.gateway().auth().me().await?;
    render_user(&user, ctx.output)
}

fn required(field: &str, value: &str) -> CliResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CliError::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

fn password_or_prompt(password: Option<String>) -> CliResult<String> {
    let password = match password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ").map_err(|err| {
            CliError::failure(anyhow!("failed to read password from stdin: {err}"))
        })?,
    };
    if password.is_empty() {
        return Err(CliError::validation("password cannot be empty"));
    }
    Ok(password)
}

fn prompt_line(prompt: &str) -> CliResult<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{prompt}")
        .and_then(|()| stderr.flush())
        .map_err(|err| CliError::failure(anyhow!("failed to write prompt: {err}")))?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|err| CliError::failure(anyhow!("failed to read from stdin: {err}")))?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::tempdir;

    use crate::cli::OutputFormat;
    use crate::client::Connection;

    fn context(server: &MockServer, dir: &tempfile::TempDir) -> Result<AppContext> {
        let connection = Connection {
            api_url: server.base_url().parse()?,
            timeout_secs: 5,
            session_file: Some(dir.path().join("session.json")),
        };
        AppContext::connect(&connection, OutputFormat::Json, "trace")
            .map_err(|err| anyhow!(err.display_message()))
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert!(matches!(required("email", "  "), Err(CliError::Validation(_))));
        assert_eq!(
            required("email", " a@b.c ").map_err(|err| err.display_message()),
            Ok("a@b.c".to_string())
        );
        assert!(matches!(
            password_or_prompt(Some(String::new())),
            Err(CliError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn login_persists_session_file() -> Result<()> {
        let dir = tempdir()?;
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/auth/login")
                .body("username=owner%40example.com&password=pw");
            then.status(200).json_body(json!({
                "access_token": "a",
                "refresh_token": "r",
                "token_type": "bearer"
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/auth/me");
            then.status(200).json_body(json!({
                "id": "6f1c2a9e-4a8b-4c1d-9f0e-1a2b3c4d5e6f",
                "email": "owner@example.com",
                "full_name": "Owner",
                "plan": "free",
                "is_active": true,
                "created_at": "2024-01-05T10:00:00Z"
            }));
        });
        let ctx = context(&server, &dir)?;

        handle_login(
            &ctx,
            LoginArgs {
                email: Some("owner@example.com".to_string()),
                password: Some("pw".to_string()),
            },
        )
        .await
        .map_err(|err| anyhow!(err.display_message()))?;

        let stored: serde_json::Value =
            serde_json::from_slice(&std::fs::read(dir.path().join("session.json"))?)?;
        assert_eq!(stored["access_token"], "a");
        assert_eq!(stored["refresh_token"], "r");
        Ok(())
    }

    #[tokio::test]
    async fn whoami_without_session_is_auth_lost() -> Result<()> {
        let dir = tempdir()?;
        let server = MockServer::start_async().await;
        let me = server.mock(|when, then| {
            when.method(GET).path("/api/auth/me");
            then.status(401);
        });
        let ctx = context(&server, &dir)?;

        let err = handle_whoami(&ctx).await.expect_err("not signed in");
        assert_eq!(err.exit_code(), 4);
        me.assert_calls(0);
        Ok(())
    }

    #[tokio::test]
    async fn logout_removes_session_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"access_token":"a","refresh_token":"r"}"#)?;
        let server = MockServer::start_async().await;
        let ctx = context(&server, &dir)?;

        handle_logout(&ctx).map_err(|err| anyhow!(err.display_message()))?;
        assert!(!path.exists());
        Ok(())
    }
}
