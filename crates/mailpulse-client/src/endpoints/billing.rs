//! `/api/billing` routes.

use mailpulse_api_models::{
    CheckoutRequest, InvoiceList, MessageResponse, RedirectUrl, SubscriptionInfo, UsageInfo,
};

use crate::error::ApiResult;
use crate::gateway::{ApiRequest, Gateway};

/// Billing period used when the caller does not pick one.
pub const DEFAULT_BILLING_PERIOD: &str = "monthly";

/// Subscription and invoice routes.
#[derive(Debug, Clone, Copy)]
pub struct BillingApi<'a> {
    gateway: &'a Gateway,
}

#[allow(clippy::missing_errors_doc)]
impl<'a> BillingApi<'a> {
    pub(crate) const fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Current subscription.
    pub async fn subscription(&self) -> ApiResult<SubscriptionInfo> {
        self.gateway
            .request(ApiRequest::get("/api/billing/subscription"))
            .await
    }

    /// Past invoices.
    pub async fn invoices(&self) -> ApiResult<InvoiceList> {
        self.gateway
            .request(ApiRequest::get("/api/billing/invoices"))
            .await
    }

    /// Plan limits and what has been used this period.
    pub async fn usage(&self) -> ApiResult<UsageInfo> {
        self.gateway
            .request(ApiRequest::get("/api/billing/usage"))
            .await
    }

    /// Start a checkout for `plan`; returns the payment page URL.
    pub async fn checkout(&self, plan: &str, billing_period: Option<&str>) -> ApiResult<RedirectUrl> {
        let body = CheckoutRequest {
            plan: plan.to_string(),
            billing_period: billing_period
                .unwrap_or(DEFAULT_BILLING_PERIOD)
                .to_string(),
        };
        let request = ApiRequest::post("/api/billing/checkout").json(&body)?;
        self.gateway.request(request).await
    }

    /// Customer portal URL for managing payment methods.
    pub async fn portal(&self) -> ApiResult<RedirectUrl> {
        self.gateway
            .request(ApiRequest::get("/api/billing/portal"))
            .await
    }

    /// Cancel the subscription at the end of the current period.
    pub async fn cancel(&self) -> ApiResult<MessageResponse> {
        self.gateway
            .request(ApiRequest::post("/api/billing/cancel"))
            .await
    }
}
