//! Plain HTTP response bodies.

use serde::{Deserialize, Serialize};

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// Result of the `get_current_time` tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeResponse {
    pub timezone: String,
    pub datetime: String,
    pub is_dst: bool,
}

impl TimeResponse {
    /// The canned answer every caller receives.
    pub fn fixed() -> Self {
        Self {
            timezone: "Europe/Warsaw".to_string(),
            datetime: "2025-08-26T21:37:15+02:00".to_string(),
            is_dst: true,
        }
    }
}
