#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::multiple_crate_versions)]
//! Shared HTTP DTOs for the Mailpulse public API.
//!
//! These types describe the JSON contract spoken by the backend and are
//! re-used by the client gateway and the CLI so both sides decode the same
//! shapes. The `display` module carries the label and badge lookup tables the
//! dashboard renders next to reviews.
//!
//! Layout: `auth.rs` (tokens, users, credentials), `reviews.rs` (reviews,
//! filters, drafts), `analytics.rs`, `settings.rs`, `billing.rs`,
//! `accounts.rs` (connected mailboxes), `problem.rs` (error bodies),
//! `display.rs` (labels and text formatting).

pub mod accounts;
pub mod analytics;
pub mod auth;
pub mod billing;
pub mod display;
pub mod problem;
pub mod reviews;
pub mod settings;

pub use accounts::{ConnectUrl, EmailAccount, EmailAccountList};
pub use analytics::{AnalyticsSummary, ProblemStat, TrendPoint};
pub use auth::{AuthTokens, LoginCredentials, RefreshRequest, RegisterData, User, UserPlan};
pub use billing::{
    CheckoutRequest, InvoiceItem, InvoiceList, MessageResponse, RedirectUrl, SubscriptionInfo,
    UsageInfo,
};
pub use problem::{ErrorBody, ErrorDetail, FieldError};
pub use reviews::{
    DraftResponse, DraftSelection, PaginatedResponse, Priority, RegenerateDrafts, Review,
    ReviewFilters, ReviewListItem, ReviewUpdate, Sentiment, ToneType,
};
pub use settings::{
    CompanySettings, CompanySettingsPatch, NotificationSettings, NotificationSettingsPatch,
    ProfileSettings, ProfileSettingsPatch,
};
