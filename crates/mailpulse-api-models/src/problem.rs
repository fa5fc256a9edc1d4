//! Error payloads returned by the backend on non-2xx responses.
//!
//! The server reports either a flat `detail` string or a list of field-level
//! validation entries (`[{"loc": [...], "msg": "...", "type": "..."}]`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level error document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    /// Error detail in either of its supported shapes.
    #[serde(default)]
    pub detail: Option<ErrorDetail>,
}

/// Shape of the `detail` member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ErrorDetail {
    /// Human-readable message.
    Message(String),
    /// Field-level validation failures.
    Fields(Vec<FieldError>),
    /// Anything else; carries no usable message.
    Other(Value),
}

/// One field-level validation failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FieldError {
    /// Path to the offending input, usually a list of keys and indexes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<Value>,
    /// Failure description.
    #[serde(default)]
    pub msg: Option<String>,
    /// Machine-readable failure kind.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Value>,
}

impl ErrorBody {
    /// Whether `detail` is a list of field errors.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self.detail, Some(ErrorDetail::Fields(_)))
    }

    /// Message to surface to the user, `None` when the body carries nothing usable.
    ///
    /// Field messages are joined with `", "`; entries without a `msg` contribute
    /// an empty segment so positions stay aligned with the server's list.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        let message = match self.detail.as_ref()? {
            ErrorDetail::Message(text) => text.clone(),
            ErrorDetail::Fields(fields) => fields
                .iter()
                .map(|field| field.msg.as_deref().unwrap_or_default())
                .collect::<Vec<_>>()
                .join(", "),
            ErrorDetail::Other(_) => return None,
        };
        if message.is_empty() {
            None
        } else {
            Some(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> ErrorBody {
        serde_json::from_value(value).expect("error body decodes")
    }

    #[test]
    fn field_messages_join_with_comma() {
        let body = parse(json!({
            "detail": [
                {"loc": ["body", "email"], "msg": "field required", "type": "missing"},
                {"msg": "too short"}
            ]
        }));
        assert!(body.is_validation());
        assert_eq!(body.message().as_deref(), Some("field required, too short"));
    }

    #[test]
    fn loosely_shaped_entries_still_join_messages() {
        let body = parse(json!({
            "detail": [
                {"loc": "body", "msg": "field required"},
                {"loc": null, "msg": "too short", "type": {"code": 3}}
            ]
        }));
        assert!(body.is_validation());
        assert_eq!(body.message().as_deref(), Some("field required, too short"));
    }

    #[test]
    fn string_detail_is_used_verbatim() {
        let body = parse(json!({"detail": "Review not found"}));
        assert!(!body.is_validation());
        assert_eq!(body.message().as_deref(), Some("Review not found"));
    }

    #[test]
    fn missing_or_unusable_detail_has_no_message() {
        assert_eq!(parse(json!({})).message(), None);
        assert_eq!(parse(json!({"detail": ""})).message(), None);
        assert_eq!(parse(json!({"detail": {"code": 7}})).message(), None);
        assert_eq!(parse(json!({"detail": []})).message(), None);
    }
}
