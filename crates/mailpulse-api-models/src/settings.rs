//! Account settings: notifications, company profile, and user profile.
//!
//! Each settings document has a `*Patch` twin used for `PATCH` calls; unset
//! fields are omitted from the request body so the server keeps them.

use serde::{Deserialize, Serialize};

use crate::reviews::ToneType;

/// Alert delivery preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationSettings {
    /// Email alerts on/off.
    pub email_enabled: bool,
    /// Alert recipient address.
    pub email_address: Option<String>,
    /// Telegram alerts on/off.
    pub telegram_enabled: bool,
    /// Telegram chat to post into.
    pub telegram_chat_id: Option<String>,
    /// SMS alerts on/off.
    pub sms_enabled: bool,
    /// SMS recipient.
    pub phone_number: Option<String>,
    /// Alert on negative reviews.
    pub notify_on_negative: bool,
    /// Alert on critical reviews.
    pub notify_on_critical: bool,
    /// Send the weekly digest.
    pub weekly_report: bool,
}

/// Partial update for [`NotificationSettings`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct NotificationSettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_chat_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_on_negative: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_on_critical: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_report: Option<bool>,
}

/// Company context fed to the reply generator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompanySettings {
    /// Company name.
    pub company_name: Option<String>,
    /// Industry.
    pub industry: Option<String>,
    /// Default tone for drafts.
    pub response_tone: ToneType,
    /// Extra prompt instructions.
    pub custom_instructions: Option<String>,
}

/// Partial update for [`CompanySettings`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct CompanySettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_tone: Option<ToneType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
}

/// User profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileSettings {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
}

/// Partial update for [`ProfileSettings`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct ProfileSettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
