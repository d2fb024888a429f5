//! DTOs shared by every HTTP module.

use serde::{Deserialize, Serialize};

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_are_omitted_when_absent() {
        let json = serde_json::to_value(ErrorResponse::new("NOT_FOUND", "gone")).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn details_are_serialized_when_present() {
        let body = ErrorResponse::with_details(
            "VALIDATION_FAILED",
            "bad",
            serde_json::json!({ "field": "amount" }),
        );
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["details"]["field"], "amount");
    }
}
