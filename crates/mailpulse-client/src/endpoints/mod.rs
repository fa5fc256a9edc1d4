//! Typed wrappers for each backend route group.
//!
//! Every group borrows the [`Gateway`] and adds nothing but paths and payload
//! types; authentication and error handling stay in the gateway.

pub mod accounts;
pub mod analytics;
pub mod auth;
pub mod billing;
pub mod reviews;
pub mod settings;

pub use accounts::AccountsApi;
pub use analytics::{AnalyticsApi, AnalyticsPeriod};
pub use auth::AuthApi;
pub use billing::{BillingApi, DEFAULT_BILLING_PERIOD};
pub use reviews::ReviewsApi;
pub use settings::SettingsApi;

use crate::gateway::Gateway;

impl Gateway {
    /// Sign-in, registration and current-user routes.
    #[must_use]
    pub const fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// Review inbox routes.
    #[must_use]
    pub const fn reviews(&self) -> ReviewsApi<'_> {
        ReviewsApi::new(self)
    }

    /// Dashboard statistics routes.
    #[must_use]
    pub const fn analytics(&self) -> AnalyticsApi<'_> {
        AnalyticsApi::new(self)
    }

    /// Account preference routes.
    #[must_use]
    pub const fn settings(&self) -> SettingsApi<'_> {
        SettingsApi::new(self)
    }

    /// Subscription and invoice routes.
    #[must_use]
    pub const fn billing(&self) -> BillingApi<'_> {
        BillingApi::new(self)
    }

    /// Connected mailbox routes.
    #[must_use]
    pub const fn accounts(&self) -> AccountsApi<'_> {
        AccountsApi::new(self)
    }
}
