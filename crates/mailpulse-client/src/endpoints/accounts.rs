//! `/api/gmail` routes for connected mailboxes.

use mailpulse_api_models::{ConnectUrl, EmailAccountList};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::gateway::{ApiRequest, Gateway};

/// Connected mailbox routes.
#[derive(Debug, Clone, Copy)]
pub struct AccountsApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> AccountsApi<'a> {
    pub(crate) const fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Mailboxes connected to the account.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn list(&self) -> ApiResult<EmailAccountList> {
        self.gateway
            .request(ApiRequest::get("/api/gmail/accounts"))
            .await
    }

    /// OAuth consent URL for connecting a new mailbox. `redirect_to` is where
    /// the provider sends the user afterwards.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn connect_url(&self, redirect_to: Option<&str>) -> ApiResult<ConnectUrl> {
        let request = ApiRequest::get("/api/gmail/connect")
            .query(redirect_to.map(|target| ("redirect_to", target)));
        self.gateway.request(request).await
    }

    /// Disconnect a mailbox. The backend answers `204 No Content`.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn disconnect(&self, id: Uuid) -> ApiResult<()> {
        self.gateway
            .execute(&ApiRequest::delete(format!("/api/gmail/accounts/{id}")))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::test_support::gateway;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn connect_url_encodes_redirect_target() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/gmail/connect")
                .query_param("redirect_to", "http://localhost:3000/dashboard?tab=accounts");
            then.status(200).json_body(json!({
                "authorization_url": "https://accounts.google.com/o/oauth2/auth?x=1"
            }));
        });
        let gateway = gateway(&server);

        let connect = gateway
            .accounts()
            .connect_url(Some("http://localhost:3000/dashboard?tab=accounts"))
            .await
            .expect("connect url");

        assert!(connect.authorization_url.starts_with("https://accounts.google.com"));
        mock.assert();
    }

    #[tokio::test]
    async fn disconnect_accepts_no_content() {
        let server = MockServer::start_async().await;
        let id = Uuid::new_v4();
        let mock = server.mock(|when, then| {
            when.method(DELETE).path(format!("/api/gmail/accounts/{id}"));
            then.status(204);
        });
        let gateway = gateway(&server);

        gateway
            .accounts()
            .disconnect(id)
            .await
            .expect("disconnect succeeds");
        mock.assert();
    }

    #[tokio::test]
    async fn list_decodes_accounts() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/gmail/accounts");
            then.status(200).json_body(json!({
                "accounts": [{
                    "id": "6f1c2a9e-4a8b-4c1d-9f0e-1a2b3c4d5e6f",
                    "email": "support@example.com",
                    "provider": "gmail",
                    "is_active": true,
                    "last_sync_at": null,
                    "created_at": "2024-01-05T10:00:00Z"
                }],
                "total": 1
            }));
        });
        let gateway = gateway(&server);

        let list = gateway.accounts().list().await.expect("list");
        assert_eq!(list.total, 1);
        assert_eq!(list.accounts[0].provider, "gmail");
    }
}
