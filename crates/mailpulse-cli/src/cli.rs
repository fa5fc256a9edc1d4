//! Argument parsing and command dispatch.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use mailpulse_api_models::{Priority, Sentiment, ToneType};
use mailpulse_client::config::parse_base_url;
use mailpulse_client::endpoints::AnalyticsPeriod;
use mailpulse_client::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use mailpulse_telemetry::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, TelemetryError, command_span, init_logging,
};
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::client::{AppContext, CliError, CliResult, Connection};
use crate::commands::accounts::{
    handle_accounts_connect, handle_accounts_disconnect, handle_accounts_list,
};
use crate::commands::analytics::handle_analytics;
use crate::commands::auth::{handle_login, handle_logout, handle_register, handle_whoami};
use crate::commands::billing::{
    handle_billing_cancel, handle_billing_checkout, handle_billing_invoices, handle_billing_portal,
    handle_billing_subscription, handle_billing_usage,
};
use crate::commands::reviews::{
    handle_review_drafts, handle_review_list, handle_review_regenerate, handle_review_select_draft,
    handle_review_show, handle_review_update,
};
use crate::commands::settings::{
    handle_settings_set_company, handle_settings_set_notifications, handle_settings_set_profile,
    handle_settings_show,
};

/// Parses CLI arguments, executes the requested command, and reports errors
/// on stderr. Returns the process exit code.
pub async fn run() -> i32 {
    run_with(Cli::parse()).await
}

pub(crate) async fn run_with(cli: Cli) -> i32 {
    if let Err(err) = install_logging(&cli) {
        eprintln!("error: {}", err.display_message());
        return err.exit_code();
    }

    let span = command_span(cli.command.label());
    let trace_id = Uuid::new_v4().to_string();
    match dispatch(cli, &trace_id).instrument(span).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn install_logging(cli: &Cli) -> CliResult<()> {
    let config = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
        build_sha: env!("CARGO_PKG_VERSION"),
    };
    match init_logging(&config) {
        // A subscriber is already installed when the CLI runs more than once in-process.
        Ok(()) | Err(TelemetryError::SubscriberInstall { .. }) => Ok(()),
        Err(err @ TelemetryError::InvalidFilter { .. }) => {
            Err(CliError::validation(err.to_string()))
        }
    }
}

async fn dispatch(cli: Cli, trace_id: &str) -> CliResult<()> {
    let connection = Connection {
        api_url: cli.api_url,
        timeout_secs: cli.timeout,
        session_file: cli.session_file,
    };
    let ctx = AppContext::connect(&connection, cli.output, trace_id)?;

    match cli.command {
        Command::Login(args) => handle_login(&ctx, args).await,
        Command::Register(args) => handle_register(&ctx, args).await,
        Command::Logout => handle_logout(&ctx),
        Command::Whoami => handle_whoami(&ctx).await,
        Command::Reviews(reviews) => match reviews {
            ReviewsCommand::Ls(args) => handle_review_list(&ctx, args).await,
            ReviewsCommand::Show(args) => handle_review_show(&ctx, args).await,
            ReviewsCommand::Update(args) => handle_review_update(&ctx, args).await,
            ReviewsCommand::Drafts(args) => handle_review_drafts(&ctx, args).await,
            ReviewsCommand::Regenerate(args) => handle_review_regenerate(&ctx, args).await,
            ReviewsCommand::SelectDraft(args) => handle_review_select_draft(&ctx, args).await,
        },
        Command::Analytics(analytics) => handle_analytics(&ctx, analytics).await,
        Command::Settings(settings) => match settings {
            SettingsCommand::Show(args) => handle_settings_show(&ctx, args).await,
            SettingsCommand::Set { target } => match target {
                SettingsSetCommand::Notifications(args) => {
                    handle_settings_set_notifications(&ctx, args).await
                }
                SettingsSetCommand::Company(args) => handle_settings_set_company(&ctx, args).await,
                SettingsSetCommand::Profile(args) => handle_settings_set_profile(&ctx, args).await,
            },
        },
        Command::Billing(billing) => match billing {
            BillingCommand::Subscription => handle_billing_subscription(&ctx).await,
            BillingCommand::Invoices => handle_billing_invoices(&ctx).await,
            BillingCommand::Usage => handle_billing_usage(&ctx).await,
            BillingCommand::Checkout(args) => handle_billing_checkout(&ctx, args).await,
            BillingCommand::Portal => handle_billing_portal(&ctx).await,
            BillingCommand::Cancel(args) => handle_billing_cancel(&ctx, args).await,
        },
        Command::Accounts(accounts) => match accounts {
            AccountsCommand::Ls => handle_accounts_list(&ctx).await,
            AccountsCommand::Connect(args) => handle_accounts_connect(&ctx, args).await,
            AccountsCommand::Disconnect(args) => handle_accounts_disconnect(&ctx, args).await,
        },
    }
}

#[derive(Parser)]
#[command(name = "mailpulse", version, about = "Command-line client for the Mailpulse review inbox")]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "MAILPULSE_API_URL",
        value_parser = parse_base_url,
        default_value = DEFAULT_API_URL
    )]
    api_url: Url,
    #[arg(
        long,
        global = true,
        env = "MAILPULSE_HTTP_TIMEOUT_SECS",
        value_parser = clap::value_parser!(u64).range(1..),
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    timeout: u64,
    #[arg(
        long,
        global = true,
        env = "MAILPULSE_SESSION_FILE",
        help = "Where tokens are stored (defaults to <config dir>/mailpulse/session.json)"
    )]
    session_file: Option<PathBuf>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[arg(long, global = true, env = "MAILPULSE_LOG", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
    #[arg(long, global = true, env = "MAILPULSE_LOG_FORMAT")]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session.
    Login(LoginArgs),
    /// Create an account and sign in to it.
    Register(RegisterArgs),
    /// Forget the stored session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    #[command(subcommand)]
    Reviews(ReviewsCommand),
    #[command(subcommand)]
    Analytics(AnalyticsCommand),
    #[command(subcommand)]
    Settings(SettingsCommand),
    #[command(subcommand)]
    Billing(BillingCommand),
    #[command(subcommand)]
    Accounts(AccountsCommand),
}

impl Command {
    const fn label(&self) -> &'static str {
        match self {
            Self::Login(_) => "login",
            Self::Register(_) => "register",
            Self::Logout => "logout",
            Self::Whoami => "whoami",
            Self::Reviews(_) => "reviews",
            Self::Analytics(_) => "analytics",
            Self::Settings(_) => "settings",
            Self::Billing(_) => "billing",
            Self::Accounts(_) => "accounts",
        }
    }
}

#[derive(Args)]
pub(crate) struct LoginArgs {
    #[arg(long, env = "MAILPULSE_EMAIL")]
    pub(crate) email: Option<String>,
    #[arg(
        long,
        env = "MAILPULSE_PASSWORD",
        hide_env_values = true,
        help = "Prompted for when omitted"
    )]
    pub(crate) password: Option<String>,
}

#[derive(Args)]
pub(crate) struct RegisterArgs {
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long)]
    pub(crate) name: String,
    #[arg(
        long,
        env = "MAILPULSE_PASSWORD",
        hide_env_values = true,
        help = "Prompted for when omitted"
    )]
    pub(crate) password: Option<String>,
}

/// Review inbox commands.
#[derive(Subcommand)]
enum ReviewsCommand {
    /// List reviews, newest first.
    Ls(ReviewListArgs),
    /// Show one review in full.
    Show(ReviewIdArgs),
    /// Mark processed or edit notes.
    Update(ReviewUpdateArgs),
    /// List reply drafts.
    Drafts(ReviewIdArgs),
    /// Generate new reply drafts.
    Regenerate(RegenerateArgs),
    /// Choose the reply draft to send.
    SelectDraft(SelectDraftArgs),
}

#[derive(Args, Default)]
pub(crate) struct ReviewListArgs {
    #[arg(long)]
    pub(crate) sentiment: Option<Sentiment>,
    #[arg(long)]
    pub(crate) priority: Option<Priority>,
    #[arg(long)]
    pub(crate) processed: Option<bool>,
    #[arg(long, help = "Only reviews received by this mailbox")]
    pub(crate) account: Option<Uuid>,
    #[arg(long, help = "Earliest received date (YYYY-MM-DD)")]
    pub(crate) from: Option<NaiveDate>,
    #[arg(long, help = "Latest received date (YYYY-MM-DD)")]
    pub(crate) to: Option<NaiveDate>,
    #[arg(long)]
    pub(crate) search: Option<String>,
    #[arg(long)]
    pub(crate) page: Option<u32>,
    #[arg(long)]
    pub(crate) page_size: Option<u32>,
}

#[derive(Args)]
pub(crate) struct ReviewIdArgs {
    #[arg(help = "Review identifier")]
    pub(crate) id: Uuid,
}

#[derive(Args)]
pub(crate) struct ReviewUpdateArgs {
    #[arg(help = "Review identifier")]
    pub(crate) id: Uuid,
    #[arg(long)]
    pub(crate) processed: Option<bool>,
    #[arg(long)]
    pub(crate) notes: Option<String>,
}

#[derive(Args)]
pub(crate) struct RegenerateArgs {
    #[arg(help = "Review identifier")]
    pub(crate) id: Uuid,
    #[arg(long, help = "Only generate a draft in this tone")]
    pub(crate) tone: Option<ToneType>,
}

#[derive(Args)]
pub(crate) struct SelectDraftArgs {
    #[arg(help = "Review identifier")]
    pub(crate) id: Uuid,
    #[arg(help = "Draft identifier")]
    pub(crate) draft: Uuid,
}

/// Dashboard statistics.
#[derive(Subcommand)]
pub(crate) enum AnalyticsCommand {
    /// Counts by sentiment, priority and processing state.
    Summary(PeriodArgs),
    /// Daily sentiment counts.
    Trends(PeriodArgs),
    /// Most frequent problems.
    Problems(PeriodArgs),
}

#[derive(Args)]
pub(crate) struct PeriodArgs {
    #[arg(long, help = "Reporting window: 1d, 7d, 30d, 90d or all")]
    pub(crate) period: Option<AnalyticsPeriod>,
}

/// Account preferences.
#[derive(Subcommand)]
enum SettingsCommand {
    /// Print one settings section.
    Show(SettingsShowArgs),
    /// Change one settings section.
    Set {
        #[command(subcommand)]
        target: SettingsSetCommand,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum SettingsSection {
    Notifications,
    Company,
    Profile,
}

#[derive(Args)]
pub(crate) struct SettingsShowArgs {
    #[arg(value_enum)]
    pub(crate) section: SettingsSection,
}

#[derive(Subcommand)]
enum SettingsSetCommand {
    Notifications(NotificationArgs),
    Company(CompanyArgs),
    Profile(ProfileArgs),
}

#[derive(Args, Default)]
pub(crate) struct NotificationArgs {
    #[arg(long)]
    pub(crate) email_enabled: Option<bool>,
    #[arg(long)]
    pub(crate) email_address: Option<String>,
    #[arg(long)]
    pub(crate) telegram_enabled: Option<bool>,
    #[arg(long)]
    pub(crate) telegram_chat_id: Option<String>,
    #[arg(long)]
    pub(crate) sms_enabled: Option<bool>,
    #[arg(long)]
    pub(crate) phone_number: Option<String>,
    #[arg(long)]
    pub(crate) notify_on_negative: Option<bool>,
    #[arg(long)]
    pub(crate) notify_on_critical: Option<bool>,
    #[arg(long)]
    pub(crate) weekly_report: Option<bool>,
}

#[derive(Args, Default)]
pub(crate) struct CompanyArgs {
    #[arg(long)]
    pub(crate) company_name: Option<String>,
    #[arg(long)]
    pub(crate) industry: Option<String>,
    #[arg(long)]
    pub(crate) tone: Option<ToneType>,
    #[arg(long)]
    pub(crate) instructions: Option<String>,
}

#[derive(Args, Default)]
pub(crate) struct ProfileArgs {
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long)]
    pub(crate) email: Option<String>,
}

/// Subscription and invoices.
#[derive(Subcommand)]
enum BillingCommand {
    /// Current plan and status.
    Subscription,
    /// Past invoices.
    Invoices,
    /// Plan limits and usage this period.
    Usage,
    /// Print a payment page URL for a plan.
    Checkout(CheckoutArgs),
    /// Print the customer portal URL.
    Portal,
    /// Cancel at the end of the current period.
    Cancel(CancelArgs),
}

#[derive(Args)]
pub(crate) struct CheckoutArgs {
    #[arg(help = "Plan to subscribe to, e.g. starter or professional")]
    pub(crate) plan: String,
    #[arg(long, help = "monthly or yearly (defaults to monthly)")]
    pub(crate) period: Option<String>,
}

#[derive(Args)]
pub(crate) struct CancelArgs {
    #[arg(long, help = "Confirm the cancellation")]
    pub(crate) yes: bool,
}

/// Connected mailboxes.
#[derive(Subcommand)]
enum AccountsCommand {
    /// List connected mailboxes.
    Ls,
    /// Print the consent URL for connecting a mailbox.
    Connect(ConnectArgs),
    /// Disconnect a mailbox.
    Disconnect(DisconnectArgs),
}

#[derive(Args)]
pub(crate) struct ConnectArgs {
    #[arg(long, help = "Where the provider should send the browser afterwards")]
    pub(crate) redirect_to: Option<String>,
}

#[derive(Args)]
pub(crate) struct DisconnectArgs {
    #[arg(help = "Mailbox identifier")]
    pub(crate) id: Uuid,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mailpulse").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn defaults_apply() {
        let cli = parse(&["whoami"]);
        assert_eq!(cli.api_url.as_str(), "http://localhost:8000/");
        assert_eq!(cli.timeout, DEFAULT_TIMEOUT_SECS);
        assert!(matches!(cli.output, OutputFormat::Table));
        assert_eq!(cli.command.label(), "whoami");
    }

    #[test]
    fn invalid_globals_are_rejected() {
        assert!(Cli::try_parse_from(["mailpulse", "--api-url", "ftp://x", "whoami"]).is_err());
        assert!(Cli::try_parse_from(["mailpulse", "--timeout", "0", "whoami"]).is_err());
    }

    #[test]
    fn review_filters_parse() {
        let cli = parse(&[
            "reviews",
            "ls",
            "--sentiment",
            "negative",
            "--priority",
            "CRITICAL",
            "--from",
            "2024-01-01",
            "--processed",
            "false",
        ]);
        let Command::Reviews(ReviewsCommand::Ls(args)) = cli.command else {
            panic!("expected reviews ls");
        };
        assert_eq!(args.sentiment, Some(Sentiment::Negative));
        assert_eq!(args.priority, Some(Priority::Critical));
        assert_eq!(args.from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(args.processed, Some(false));
    }

    #[test]
    fn analytics_period_parses() {
        let cli = parse(&["analytics", "trends", "--period", "7d"]);
        let Command::Analytics(AnalyticsCommand::Trends(args)) = cli.command else {
            panic!("expected analytics trends");
        };
        assert_eq!(args.period, Some(AnalyticsPeriod::Week));
        assert!(Cli::try_parse_from(["mailpulse", "analytics", "summary", "--period", "2w"]).is_err());
    }

    #[tokio::test]
    async fn whoami_prints_user_with_stored_session() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let session_file = dir.path().join("session.json");
        fs::write(
            &session_file,
            r#"{"access_token":"stored","refresh_token":"refresh"}"#,
        )?;
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/auth/me")
                .header("authorization", "Bearer stored");
            then.status(200).json_body(json!({
                "id": "6f1c2a9e-4a8b-4c1d-9f0e-1a2b3c4d5e6f",
                "email": "owner@example.com",
                "full_name": "Owner",
                "plan": "pro",
                "is_active": true,
                "created_at": "2024-01-05T10:00:00Z"
            }));
        });

        let base_url = server.base_url();
        let session_arg = session_file.display().to_string();
        let cli = parse(&[
            "--api-url",
            base_url.as_str(),
            "--session-file",
            session_arg.as_str(),
            "--output",
            "json",
            "whoami",
        ]);

        assert_eq!(run_with(cli).await, 0);
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn lost_session_exits_with_auth_code_and_clears_file() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let session_file = dir.path().join("session.json");
        fs::write(
            &session_file,
            r#"{"access_token":"stale","refresh_token":"revoked"}"#,
        )?;
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/billing/usage");
            then.status(401);
        });
        let refresh = server.mock(|when, then| {
            when.method(POST).path("/api/auth/refresh");
            then.status(401).json_body(json!({"detail": "Invalid refresh token"}));
        });

        let base_url = server.base_url();
        let session_arg = session_file.display().to_string();
        let cli = parse(&[
            "--api-url",
            base_url.as_str(),
            "--session-file",
            session_arg.as_str(),
            "billing",
            "usage",
        ]);

        assert_eq!(run_with(cli).await, 4);
        refresh.assert();
        assert!(!session_file.exists());
        Ok(())
    }

    #[tokio::test]
    async fn validation_errors_exit_with_code_two() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let session_file = dir.path().join("session.json");
        fs::write(
            &session_file,
            r#"{"access_token":"good","refresh_token":"refresh"}"#,
        )?;
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(PATCH).path("/api/settings/profile");
            then.status(422).json_body(json!({
                "detail": [{"loc": ["body", "email"], "msg": "value is not a valid email address"}]
            }));
        });

        let base_url = server.base_url();
        let session_arg = session_file.display().to_string();
        let cli = parse(&[
            "--api-url",
            base_url.as_str(),
            "--session-file",
            session_arg.as_str(),
            "settings",
            "set",
            "profile",
            "--email",
            "not-an-email",
        ]);

        assert_eq!(run_with(cli).await, 2);
        Ok(())
    }
}
