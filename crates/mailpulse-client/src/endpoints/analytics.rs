//! `/api/analytics` routes.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use mailpulse_api_models::{AnalyticsSummary, ProblemStat, TrendPoint};
use serde::de::DeserializeOwned;

use crate::error::ApiResult;
use crate::gateway::{ApiRequest, Gateway};

/// Reporting window understood by the analytics routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyticsPeriod {
    /// Last 24 hours.
    Day,
    /// Last 7 days.
    Week,
    /// Last 30 days; the dashboard default.
    Month,
    /// Last 90 days.
    Quarter,
    /// Since the account was created.
    All,
}

impl AnalyticsPeriod {
    /// Query value sent to the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "1d",
            Self::Week => "7d",
            Self::Month => "30d",
            Self::Quarter => "90d",
            Self::All => "all",
        }
    }
}

impl Display for AnalyticsPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalyticsPeriod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1d" | "day" => Ok(Self::Day),
            "7d" | "week" => Ok(Self::Week),
            "30d" | "month" => Ok(Self::Month),
            "90d" | "quarter" => Ok(Self::Quarter),
            "all" => Ok(Self::All),
            other => Err(format!(
                "unknown period '{other}'; expected one of 1d, 7d, 30d, 90d, all"
            )),
        }
    }
}

/// Dashboard statistics routes.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> AnalyticsApi<'a> {
    pub(crate) const fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Review counts by sentiment, priority and processing state.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn summary(&self, period: Option<AnalyticsPeriod>) -> ApiResult<AnalyticsSummary> {
        self.fetch("summary", period).await
    }

    /// Daily sentiment counts.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn trends(&self, period: Option<AnalyticsPeriod>) -> ApiResult<Vec<TrendPoint>> {
        self.fetch("trends", period).await
    }

    /// Most frequently reported problems.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn problems(&self, period: Option<AnalyticsPeriod>) -> ApiResult<Vec<ProblemStat>> {
        self.fetch("problems", period).await
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        name: &str,
        period: Option<AnalyticsPeriod>,
    ) -> ApiResult<T> {
        let request = ApiRequest::get(format!("/api/analytics/{name}"))
            .query(period.map(|period| ("period", period.as_str())));
        self.gateway.request(request).await
    }
}
