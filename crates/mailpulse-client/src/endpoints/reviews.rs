//! `/api/reviews` routes.

use mailpulse_api_models::{
    DraftResponse, DraftSelection, PaginatedResponse, RegenerateDrafts, Review, ReviewFilters,
    ReviewListItem, ReviewUpdate, ToneType,
};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::gateway::{ApiRequest, Gateway};

const REVIEWS_PATH: &str = "/api/reviews";

/// Review inbox routes.
#[derive(Debug, Clone, Copy)]
pub struct ReviewsApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> ReviewsApi<'a> {
    pub(crate) const fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// One page of reviews matching `filters`.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn list(
        &self,
        filters: &ReviewFilters,
    ) -> ApiResult<PaginatedResponse<ReviewListItem>> {
        let request = ApiRequest::get(REVIEWS_PATH).query(filters.query_pairs());
        self.gateway.request(request).await
    }

    /// Full review.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn get(&self, id: Uuid) -> ApiResult<Review> {
        self.gateway
            .request(ApiRequest::get(format!("{REVIEWS_PATH}/{id}")))
            .await
    }

    /// Mark processed or edit notes.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn update(&self, id: Uuid, update: &ReviewUpdate) -> ApiResult<Review> {
        let request = ApiRequest::patch(format!("{REVIEWS_PATH}/{id}")).json(update)?;
        self.gateway.request(request).await
    }

    /// Reply drafts generated for a review.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn drafts(&self, id: Uuid) -> ApiResult<Vec<DraftResponse>> {
        self.gateway
            .request(ApiRequest::get(format!("{REVIEWS_PATH}/{id}/drafts")))
            .await
    }

    /// Ask for fresh drafts, optionally in one tone only.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn regenerate_drafts(
        &self,
        id: Uuid,
        tone: Option<ToneType>,
    ) -> ApiResult<Vec<DraftResponse>> {
        let request = ApiRequest::post(format!("{REVIEWS_PATH}/{id}/drafts/regenerate"))
            .json(&RegenerateDrafts { tone })?;
        self.gateway.request(request).await
    }

    /// Mark one draft as the chosen reply.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn select_draft(&self, id: Uuid, draft: Uuid) -> ApiResult<DraftResponse> {
        let request = ApiRequest::patch(format!("{REVIEWS_PATH}/{id}/drafts/{draft}"))
            .json(&DraftSelection { is_selected: true })?;
        self.gateway.request(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::test_support::gateway;
    use chrono::NaiveDate;
    use httpmock::prelude::*;
    use mailpulse_api_models::{Priority, Sentiment};
    use serde_json::json;

    const REVIEW_ID: &str = "0d6b3f4e-7c1a-4b6f-8a2e-5f9c1d2e3a4b";
    const DRAFT_ID: &str = "9a8b7c6d-5e4f-4a3b-9c2d-1e0f9a8b7c6d";

    fn draft_json(tone: &str, selected: bool) -> serde_json::Value {
        json!({
            "id": DRAFT_ID,
            "review_id": REVIEW_ID,
            "tone": tone,
            "content": "Спасибо за отзыв!",
            "is_selected": selected,
            "created_at": "2024-01-05T10:00:00Z"
        })
    }

    #[tokio::test]
    async fn list_sends_only_set_filters() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/reviews")
                .query_param("sentiment", "negative")
                .query_param("priority", "critical")
                .query_param("date_from", "2024-01-01")
                .query_param("page", "2")
                .query_param_missing("search")
                .query_param_missing("is_processed");
            then.status(200).json_body(json!({
                "items": [],
                "total": 0,
                "page": 2,
                "page_size": 20,
                "total_pages": 0
            }));
        });
        let gateway = gateway(&server);

        let filters = ReviewFilters {
            sentiment: Some(Sentiment::Negative),
            priority: Some(Priority::Critical),
            date_from: NaiveDate::from_ymd_opt(2024, 1, 1),
            search: Some(String::new()),
            page: Some(2),
            ..ReviewFilters::default()
        };
        let page = gateway.reviews().list(&filters).await.expect("list succeeds");

        assert_eq!(page.page, 2);
        assert!(page.items.is_empty());
        mock.assert();
    }

    #[tokio::test]
    async fn regenerate_without_tone_sends_empty_object() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path(format!("/api/reviews/{REVIEW_ID}/drafts/regenerate"))
                .json_body(json!({}));
            then.status(200)
                .json_body(json!([draft_json("formal", false), draft_json("friendly", false)]));
        });
        let gateway = gateway(&server);
        let id: Uuid = REVIEW_ID.parse().expect("uuid");

        let drafts = gateway
            .reviews()
            .regenerate_drafts(id, None)
            .await
            .expect("regenerate succeeds");

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[1].tone, ToneType::Friendly);
        mock.assert();
    }

    #[tokio::test]
    async fn select_draft_patches_selection_flag() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(PATCH)
                .path(format!("/api/reviews/{REVIEW_ID}/drafts/{DRAFT_ID}"))
                .json_body(json!({"is_selected": true}));
            then.status(200).json_body(draft_json("formal", true));
        });
        let gateway = gateway(&server);

        let draft = gateway
            .reviews()
            .select_draft(
                REVIEW_ID.parse().expect("uuid"),
                DRAFT_ID.parse().expect("uuid"),
            )
            .await
            .expect("select succeeds");

        assert!(draft.is_selected);
        mock.assert();
    }

    #[tokio::test]
    async fn update_sends_only_changed_fields() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(PATCH)
                .path(format!("/api/reviews/{REVIEW_ID}"))
                .json_body(json!({"is_processed": true}));
            then.status(404).json_body(json!({"detail": "Review not found"}));
        });
        let gateway = gateway(&server);

        let err = gateway
            .reviews()
            .update(
                REVIEW_ID.parse().expect("uuid"),
                &ReviewUpdate {
                    is_processed: Some(true),
                    notes: None,
                },
            )
            .await
            .expect_err("missing review");

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Review not found");
        mock.assert();
    }
}
