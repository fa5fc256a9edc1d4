//! `/api/settings` routes.

use mailpulse_api_models::{
    CompanySettings, CompanySettingsPatch, NotificationSettings, NotificationSettingsPatch,
    ProfileSettings, ProfileSettingsPatch,
};

use crate::error::ApiResult;
use crate::gateway::{ApiRequest, Gateway};

const NOTIFICATIONS_PATH: &str = "/api/settings/notifications";
const COMPANY_PATH: &str = "/api/settings/company";
const PROFILE_PATH: &str = "/api/settings/profile";

/// Account preference routes. Every `update_*` sends only the fields set on
/// the patch and returns the stored result.
#[derive(Debug, Clone, Copy)]
pub struct SettingsApi<'a> {
    gateway: &'a Gateway,
}

#[allow(clippy::missing_errors_doc)]
impl<'a> SettingsApi<'a> {
    pub(crate) const fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Notification channels and triggers.
    pub async fn notifications(&self) -> ApiResult<NotificationSettings> {
        self.gateway.request(ApiRequest::get(NOTIFICATIONS_PATH)).await
    }

    /// Change notification channels and triggers.
    pub async fn update_notifications(
        &self,
        patch: &NotificationSettingsPatch,
    ) -> ApiResult<NotificationSettings> {
        let request = ApiRequest::patch(NOTIFICATIONS_PATH).json(patch)?;
        self.gateway.request(request).await
    }

    /// Company profile used when drafting replies.
    pub async fn company(&self) -> ApiResult<CompanySettings> {
        self.gateway.request(ApiRequest::get(COMPANY_PATH)).await
    }

    /// Change the company profile.
    pub async fn update_company(&self, patch: &CompanySettingsPatch) -> ApiResult<CompanySettings> {
        let request = ApiRequest::patch(COMPANY_PATH).json(patch)?;
        self.gateway.request(request).await
    }

    /// Name and email of the signed-in user.
    pub async fn profile(&self) -> ApiResult<ProfileSettings> {
        self.gateway.request(ApiRequest::get(PROFILE_PATH)).await
    }

    /// Change name or email.
    pub async fn update_profile(&self, patch: &ProfileSettingsPatch) -> ApiResult<ProfileSettings> {
        let request = ApiRequest::patch(PROFILE_PATH).json(patch)?;
        self.gateway.request(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::test_support::gateway;
    use httpmock::prelude::*;
    use mailpulse_api_models::ToneType;
    use serde_json::json;

    #[tokio::test]
    async fn company_patch_sends_changed_fields_only() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(PATCH)
                .path("/api/settings/company")
                .json_body(json!({"response_tone": "professional"}));
            then.status(200).json_body(json!({
                "company_name": "Acme",
                "industry": null,
                "response_tone": "professional",
                "custom_instructions": null
            }));
        });
        let gateway = gateway(&server);

        let company = gateway
            .settings()
            .update_company(&CompanySettingsPatch {
                response_tone: Some(ToneType::Professional),
                ..CompanySettingsPatch::default()
            })
            .await
            .expect("update succeeds");

        assert_eq!(company.company_name.as_deref(), Some("Acme"));
        assert_eq!(company.response_tone, ToneType::Professional);
        mock.assert();
    }

    #[tokio::test]
    async fn profile_is_fetched() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/settings/profile");
            then.status(200)
                .json_body(json!({"name": "Owner", "email": "owner@example.com"}));
        });
        let gateway = gateway(&server);

        let profile = gateway.settings().profile().await.expect("profile");
        assert_eq!(profile.name, "Owner");
    }
}
