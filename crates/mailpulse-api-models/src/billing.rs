//! Subscription, invoices, and usage quotas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current subscription state. Free accounts come back without an id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriptionInfo {
    /// Subscription identifier.
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Plan name.
    pub plan: String,
    /// Provider status (`active`, `canceled`, ...).
    pub status: String,
    /// Start of the billing period.
    #[serde(default)]
    pub current_period_start: Option<DateTime<Utc>>,
    /// End of the billing period.
    #[serde(default)]
    pub current_period_end: Option<DateTime<Utc>>,
    /// Whether the subscription lapses at period end.
    pub cancel_at_period_end: bool,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// One issued invoice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvoiceItem {
    /// Invoice identifier.
    pub id: Uuid,
    /// Payment provider invoice identifier.
    pub stripe_invoice_id: String,
    /// Amount in minor currency units.
    pub amount: i64,
    /// ISO currency code.
    pub currency: String,
    /// Payment status.
    pub status: String,
    /// Payment time.
    pub paid_at: Option<DateTime<Utc>>,
    /// Hosted PDF link.
    pub pdf_url: Option<String>,
    /// Issue time.
    pub created_at: DateTime<Utc>,
}

/// Response of `GET /api/billing/invoices`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvoiceList {
    /// Invoices, newest first.
    pub items: Vec<InvoiceItem>,
}

/// Quota consumption for the current period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageInfo {
    /// Emails analysed.
    pub emails_used: u64,
    /// Email analysis quota.
    pub emails_limit: u64,
    /// Mailboxes connected.
    pub email_accounts_used: u64,
    /// Mailbox quota.
    pub email_accounts_limit: u64,
    /// Period start.
    pub period_start: Option<DateTime<Utc>>,
    /// Period end.
    pub period_end: Option<DateTime<Utc>>,
}

/// Body of `POST /api/billing/checkout`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutRequest {
    /// Target plan.
    pub plan: String,
    /// `monthly` or `yearly`.
    pub billing_period: String,
}

/// Hosted page the user should be sent to (checkout or billing portal).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RedirectUrl {
    /// Destination URL.
    pub url: String,
}

/// Plain acknowledgement message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}
