//! Reviews (classified customer emails), list filters, and reply drafts.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentiment assigned to an email by the classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    /// Satisfied customer.
    Positive,
    /// Unhappy customer.
    Negative,
    /// Neither positive nor negative.
    Neutral,
    /// Both praise and complaints.
    Mixed,
}

impl Sentiment {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Mixed => "mixed",
        }
    }
}

impl Display for Sentiment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            "mixed" => Ok(Self::Mixed),
            other => Err(format!("unknown sentiment '{other}'")),
        }
    }
}

/// Urgency assigned to an email by the classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Needs attention immediately.
    Critical,
    /// Handle today.
    High,
    /// Handle soon.
    Medium,
    /// No rush.
    Low,
}

impl Priority {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

/// Voice used when generating reply drafts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ToneType {
    /// Formal register.
    Formal,
    /// Warm, casual register.
    Friendly,
    /// Neutral business register.
    Professional,
}

impl ToneType {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Friendly => "friendly",
            Self::Professional => "professional",
        }
    }
}

impl Display for ToneType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToneType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "formal" => Ok(Self::Formal),
            "friendly" => Ok(Self::Friendly),
            "professional" => Ok(Self::Professional),
            other => Err(format!("unknown tone '{other}'")),
        }
    }
}

/// Full review record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Review {
    /// Review identifier.
    pub id: Uuid,
    /// Mailbox the email arrived in.
    pub email_account_id: Uuid,
    /// Provider message identifier.
    pub message_id: String,
    /// Email subject line.
    pub subject: String,
    /// Sender address.
    pub sender_email: String,
    /// Sender display name when present.
    pub sender_name: Option<String>,
    /// Email body text.
    pub body: String,
    /// Time the email was received.
    pub received_at: DateTime<Utc>,
    /// Classified sentiment, `None` until analysed.
    pub sentiment: Option<Sentiment>,
    /// Classified priority, `None` until analysed.
    pub priority: Option<Priority>,
    /// One-paragraph summary from the classifier.
    pub summary: Option<String>,
    /// Problems the customer raised.
    pub problems: Option<Vec<String>>,
    /// Suggestions the customer made.
    pub suggestions: Option<Vec<String>>,
    /// Customer name extracted from the email.
    pub customer_name: Option<String>,
    /// Whether the classifier thinks a reply is needed.
    pub requires_response: bool,
    /// Whether an operator marked the review as handled.
    pub is_processed: bool,
    /// Operator notes.
    pub notes: Option<String>,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Summary row returned by the review list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewListItem {
    /// Review identifier.
    pub id: Uuid,
    /// Email subject line.
    pub subject: String,
    /// Sender address.
    pub sender_email: String,
    /// Sender display name when present.
    pub sender_name: Option<String>,
    /// Time the email was received.
    pub received_at: DateTime<Utc>,
    /// Classified sentiment.
    pub sentiment: Option<Sentiment>,
    /// Classified priority.
    pub priority: Option<Priority>,
    /// Classifier summary.
    pub summary: Option<String>,
    /// Whether the review has been handled.
    pub is_processed: bool,
}

/// Query filters accepted by `GET /api/reviews`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewFilters {
    /// Restrict to a sentiment.
    pub sentiment: Option<Sentiment>,
    /// Restrict to a priority.
    pub priority: Option<Priority>,
    /// Restrict to handled/unhandled reviews.
    pub is_processed: Option<bool>,
    /// Restrict to one mailbox.
    pub email_account_id: Option<Uuid>,
    /// Earliest receive date (inclusive).
    pub date_from: Option<NaiveDate>,
    /// Latest receive date (inclusive).
    pub date_to: Option<NaiveDate>,
    /// Free-text search.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size.
    pub page_size: Option<u32>,
}

impl ReviewFilters {
    /// Query pairs for the filters that are set. Empty search strings are skipped.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(sentiment) = self.sentiment {
            pairs.push(("sentiment", sentiment.as_str().to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        if let Some(processed) = self.is_processed {
            pairs.push(("is_processed", processed.to_string()));
        }
        if let Some(account) = self.email_account_id {
            pairs.push(("email_account_id", account.to_string()));
        }
        if let Some(from) = self.date_from {
            pairs.push(("date_from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.date_to {
            pairs.push(("date_to", to.format("%Y-%m-%d").to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|value| !value.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("page_size", page_size.to_string()));
        }
        pairs
    }
}

/// Generic page envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginatedResponse<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total matching items.
    pub total: u64,
    /// Current page (1-based).
    pub page: u32,
    /// Page size used.
    pub page_size: u32,
    /// Number of pages available.
    pub total_pages: u32,
}

/// Partial update accepted by `PATCH /api/reviews/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewUpdate {
    /// Mark as handled or not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_processed: Option<bool>,
    /// Replace operator notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ReviewUpdate {
    /// Whether the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.is_processed.is_none() && self.notes.is_none()
    }
}

/// Body of the draft regeneration call; an absent tone lets the server pick.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegenerateDrafts {
    /// Requested tone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<ToneType>,
}

/// Body of the draft selection call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DraftSelection {
    /// Always `true`; selecting one draft deselects the others server-side.
    pub is_selected: bool,
}

/// AI-generated reply draft.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DraftResponse {
    /// Draft identifier.
    pub id: Uuid,
    /// Review the draft answers.
    pub review_id: Uuid,
    /// Tone used for generation.
    pub tone: ToneType,
    /// Draft text.
    pub content: String,
    /// Whether the operator picked this draft.
    pub is_selected: bool,
    /// Generation time.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_pairs_skip_unset_and_empty_values() {
        let filters = ReviewFilters {
            sentiment: Some(Sentiment::Negative),
            is_processed: Some(false),
            date_from: NaiveDate::from_ymd_opt(2024, 3, 1),
            search: Some(String::new()),
            page: Some(2),
            ..ReviewFilters::default()
        };
        assert_eq!(
            filters.query_pairs(),
            vec![
                ("sentiment", "negative".to_string()),
                ("is_processed", "false".to_string()),
                ("date_from", "2024-03-01".to_string()),
                ("page", "2".to_string()),
            ]
        );
        assert!(ReviewFilters::default().query_pairs().is_empty());
    }

    #[test]
    fn review_update_omits_unset_fields() {
        let patch = ReviewUpdate {
            is_processed: Some(true),
            notes: None,
        };
        assert_eq!(
            serde_json::to_value(&patch).expect("encode"),
            json!({"is_processed": true})
        );
        assert!(ReviewUpdate::default().is_empty());
    }

    #[test]
    fn regenerate_without_tone_encodes_empty_object() {
        assert_eq!(
            serde_json::to_value(RegenerateDrafts::default()).expect("encode"),
            json!({})
        );
        assert_eq!(
            serde_json::to_value(RegenerateDrafts {
                tone: Some(ToneType::Friendly)
            })
            .expect("encode"),
            json!({"tone": "friendly"})
        );
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!("Mixed".parse::<Sentiment>(), Ok(Sentiment::Mixed));
        assert_eq!(" HIGH ".parse::<Priority>(), Ok(Priority::High));
        assert_eq!("formal".parse::<ToneType>(), Ok(ToneType::Formal));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn list_item_accepts_unclassified_rows() {
        let item: ReviewListItem = serde_json::from_value(json!({
            "id": "6f9619ff-8b86-d011-b42d-00cf4fc964ff",
            "subject": "Order late",
            "sender_email": "c@example.com",
            "sender_name": null,
            "received_at": "2024-05-01T10:00:00Z",
            "sentiment": null,
            "priority": null,
            "summary": null,
            "is_processed": false
        }))
        .expect("decode");
        assert!(item.sentiment.is_none());
        assert!(item.priority.is_none());
    }
}
