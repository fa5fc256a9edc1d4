//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use chrono::{DateTime, Local, Utc};
use mailpulse_api_models::display::{
    format_date_time, format_relative_time, priority_label, sentiment_label, truncate_text,
};
use mailpulse_api_models::{
    AnalyticsSummary, CompanySettings, DraftResponse, EmailAccountList, InvoiceList,
    NotificationSettings, PaginatedResponse, ProblemStat, ProfileSettings, Review,
    ReviewListItem, SubscriptionInfo, TrendPoint, UsageInfo, User,
};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

const SUBJECT_WIDTH: usize = 48;

/// Print `value` as pretty JSON, or run `table` for the human-readable form.
fn render<T: Serialize + ?Sized>(
    value: &T,
    format: OutputFormat,
    table: impl FnOnce(&T),
) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(value)
                .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
            println!("{text}");
        }
        OutputFormat::Table => table(value),
    }
    Ok(())
}

pub(crate) fn render_user(user: &User, format: OutputFormat) -> CliResult<()> {
    render(user, format, |user| {
        println!("id: {}", user.id);
        println!("email: {}", user.email);
        println!("name: {}", user.full_name);
        println!("plan: {}", user.plan.as_str());
        println!("active: {}", user.is_active);
        println!("since: {}", local_date_time(user.created_at));
    })
}

pub(crate) fn render_review_page(
    page: &PaginatedResponse<ReviewListItem>,
    format: OutputFormat,
) -> CliResult<()> {
    let now = Utc::now();
    render(page, format, |page| {
        println!(
            "{:<36} {:<14} {:<12} {:<4} {:<16} SUBJECT",
            "ID", "SENTIMENT", "PRIORITY", "DONE", "RECEIVED"
        );
        for item in &page.items {
            println!(
                "{:<36} {:<14} {:<12} {:<4} {:<16} {}",
                item.id,
                sentiment_label(item.sentiment),
                priority_label(item.priority),
                if item.is_processed { "yes" } else { "no" },
                format_relative_time(item.received_at, now),
                truncate_text(&item.subject, SUBJECT_WIDTH)
            );
        }
        println!(
            "page {}/{} ({} total)",
            page.page,
            page.total_pages.max(1),
            page.total
        );
    })
}

pub(crate) fn render_review(review: &Review, format: OutputFormat) -> CliResult<()> {
    render(review, format, |review| {
        println!("id: {}", review.id);
        println!("subject: {}", review.subject);
        match &review.sender_name {
            Some(name) => println!("from: {name} <{}>", review.sender_email),
            None => println!("from: {}", review.sender_email),
        }
        println!("received: {}", local_date_time(review.received_at));
        println!("sentiment: {}", sentiment_label(review.sentiment));
        println!("priority: {}", priority_label(review.priority));
        println!("processed: {}", review.is_processed);
        println!("requires response: {}", review.requires_response);
        if let Some(summary) = &review.summary {
            println!("summary: {summary}");
        }
        print_list("problems", review.problems.as_deref());
        print_list("suggestions", review.suggestions.as_deref());
        if let Some(notes) = &review.notes {
            println!("notes: {notes}");
        }
        println!();
        println!("{}", review.body);
    })
}

pub(crate) fn render_drafts(drafts: &[DraftResponse], format: OutputFormat) -> CliResult<()> {
    render(drafts, format, |drafts| {
        if drafts.is_empty() {
            println!("no drafts");
        }
        for draft in drafts {
            print_draft(draft);
        }
    })
}

pub(crate) fn render_draft(draft: &DraftResponse, format: OutputFormat) -> CliResult<()> {
    render(draft, format, print_draft)
}

fn print_draft(draft: &DraftResponse) {
    let marker = if draft.is_selected { " (selected)" } else { "" };
    println!("[{}] {}{marker}", draft.tone, draft.id);
    println!("{}", draft.content);
    println!();
}

pub(crate) fn render_summary(summary: &AnalyticsSummary, format: OutputFormat) -> CliResult<()> {
    render(summary, format, |summary| {
        println!("total: {}", summary.total_reviews);
        println!(
            "sentiment: positive {} / negative {} / neutral {} / mixed {}",
            summary.positive_reviews,
            summary.negative_reviews,
            summary.neutral_reviews,
            summary.mixed_reviews
        );
        println!(
            "priority: critical {} / high {} / medium {} / low {}",
            summary.critical_count, summary.high_count, summary.medium_count, summary.low_count
        );
        println!(
            "processed: {} / unprocessed {}",
            summary.processed_count, summary.unprocessed_count
        );
        if let Some(hours) = summary.avg_response_time_hours {
            println!("avg response: {hours:.1} h");
        }
    })
}

pub(crate) fn render_trends(points: &[TrendPoint], format: OutputFormat) -> CliResult<()> {
    render(points, format, |points| {
        println!(
            "{:<10} {:>6} {:>8} {:>8} {:>7}",
            "DATE", "TOTAL", "POSITIVE", "NEGATIVE", "NEUTRAL"
        );
        for point in points {
            println!(
                "{:<10} {:>6} {:>8} {:>8} {:>7}",
                point.date.to_string(),
                point.total,
                point.positive,
                point.negative,
                point.neutral
            );
        }
    })
}

pub(crate) fn render_problems(problems: &[ProblemStat], format: OutputFormat) -> CliResult<()> {
    render(problems, format, |problems| {
        println!("{:>6} {:>7} PROBLEM", "COUNT", "SHARE");
        for stat in problems {
            println!(
                "{:>6} {:>6.1}% {}",
                stat.count, stat.percentage, stat.problem
            );
        }
    })
}

pub(crate) fn render_notifications(
    settings: &NotificationSettings,
    format: OutputFormat,
) -> CliResult<()> {
    render(settings, format, |settings| {
        println!(
            "email: {}{}",
            on_off(settings.email_enabled),
            suffix(settings.email_address.as_deref())
        );
        println!(
            "telegram: {}{}",
            on_off(settings.telegram_enabled),
            suffix(settings.telegram_chat_id.as_deref())
        );
        println!(
            "sms: {}{}",
            on_off(settings.sms_enabled),
            suffix(settings.phone_number.as_deref())
        );
        println!("notify on negative: {}", on_off(settings.notify_on_negative));
        println!("notify on critical: {}", on_off(settings.notify_on_critical));
        println!("weekly report: {}", on_off(settings.weekly_report));
    })
}

pub(crate) fn render_company(settings: &CompanySettings, format: OutputFormat) -> CliResult<()> {
    render(settings, format, |settings| {
        println!("company: {}", settings.company_name.as_deref().unwrap_or("-"));
        println!("industry: {}", settings.industry.as_deref().unwrap_or("-"));
        println!("reply tone: {}", settings.response_tone);
        if let Some(instructions) = &settings.custom_instructions {
            println!("instructions: {instructions}");
        }
    })
}

pub(crate) fn render_profile(profile: &ProfileSettings, format: OutputFormat) -> CliResult<()> {
    render(profile, format, |profile| {
        println!("name: {}", profile.name);
        println!("email: {}", profile.email);
    })
}

pub(crate) fn render_subscription(
    subscription: &SubscriptionInfo,
    format: OutputFormat,
) -> CliResult<()> {
    render(subscription, format, |subscription| {
        println!("plan: {}", subscription.plan);
        println!("status: {}", subscription.status);
        if let (Some(start), Some(end)) = (
            subscription.current_period_start,
            subscription.current_period_end,
        ) {
            println!(
                "period: {} - {}",
                local_date_time(start),
                local_date_time(end)
            );
        }
        if subscription.cancel_at_period_end {
            println!("cancels at period end");
        }
    })
}

pub(crate) fn render_invoices(invoices: &InvoiceList, format: OutputFormat) -> CliResult<()> {
    render(invoices, format, |invoices| {
        println!("{:<36} {:>14} {:<10} {:<20} PDF", "ID", "AMOUNT", "STATUS", "DATE");
        for invoice in &invoices.items {
            println!(
                "{:<36} {:>14} {:<10} {:<20} {}",
                invoice.id,
                format_amount(invoice.amount, &invoice.currency),
                invoice.status,
                local_date_time(invoice.paid_at.unwrap_or(invoice.created_at)),
                invoice.pdf_url.as_deref().unwrap_or("-")
            );
        }
    })
}

pub(crate) fn render_usage(usage: &UsageInfo, format: OutputFormat) -> CliResult<()> {
    render(usage, format, |usage| {
        println!("emails: {}/{}", usage.emails_used, usage.emails_limit);
        println!(
            "email accounts: {}/{}",
            usage.email_accounts_used, usage.email_accounts_limit
        );
        if let (Some(start), Some(end)) = (usage.period_start, usage.period_end) {
            println!(
                "period: {} - {}",
                local_date_time(start),
                local_date_time(end)
            );
        }
    })
}

pub(crate) fn render_accounts(accounts: &EmailAccountList, format: OutputFormat) -> CliResult<()> {
    let now = Utc::now();
    render(accounts, format, |accounts| {
        println!(
            "{:<36} {:<8} {:<7} {:<16} EMAIL",
            "ID", "PROVIDER", "ACTIVE", "LAST SYNC"
        );
        for account in &accounts.accounts {
            let synced = account
                .last_sync_at
                .map_or_else(|| "never".to_string(), |at| format_relative_time(at, now));
            println!(
                "{:<36} {:<8} {:<7} {:<16} {}",
                account.id,
                account.provider,
                if account.is_active { "yes" } else { "no" },
                synced,
                account.email
            );
        }
        println!("{} connected", accounts.total);
    })
}

/// Print a URL the user should open, or `{"url": ...}` in JSON mode.
pub(crate) fn render_url(url: &str, format: OutputFormat) -> CliResult<()> {
    render(&serde_json::json!({ "url": url }), format, |_| println!("{url}"))
}

/// Print a confirmation line, or `{"message": ...}` in JSON mode.
pub(crate) fn render_message(message: &str, format: OutputFormat) -> CliResult<()> {
    render(
        &serde_json::json!({ "message": message }),
        format,
        |_| println!("{message}"),
    )
}

fn print_list(label: &str, items: Option<&[String]>) {
    if let Some(items) = items.filter(|items| !items.is_empty()) {
        println!("{label}:");
        for item in items {
            println!("  - {item}");
        }
    }
}

const fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

fn suffix(detail: Option<&str>) -> String {
    detail
        .filter(|value| !value.is_empty())
        .map_or_else(String::new, |value| format!(" ({value})"))
}

fn local_date_time(at: DateTime<Utc>) -> String {
    format_date_time(&at.with_timezone(&Local))
}

/// Minor currency units rendered as `12.34 USD`.
#[must_use]
pub(crate) fn format_amount(amount: i64, currency: &str) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!(
        "{sign}{}.{:02} {}",
        abs / 100,
        abs % 100,
        currency.to_uppercase()
    )
}
