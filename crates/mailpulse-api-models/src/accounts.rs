//! Connected mailboxes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Mailbox the service polls for customer emails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailAccount {
    /// Account identifier.
    pub id: Uuid,
    /// Mailbox address.
    pub email: String,
    /// Mail provider (for example `gmail`).
    pub provider: String,
    /// Whether polling is enabled.
    pub is_active: bool,
    /// Last successful sync.
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Connection time.
    pub created_at: DateTime<Utc>,
}

/// Response of `GET /api/gmail/accounts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailAccountList {
    /// Connected accounts.
    pub accounts: Vec<EmailAccount>,
    /// Number of connected accounts.
    pub total: u64,
}

/// OAuth consent URL for connecting a new mailbox.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectUrl {
    /// Provider authorization URL to open in a browser.
    pub authorization_url: String,
}
