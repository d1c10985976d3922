//! Error types for the membership client.

use thiserror::Error;

/// Result type for membership client operations.
pub type Result<T> = std::result::Result<T, MembershipError>;

/// Membership API errors.
#[derive(Debug, Error)]
pub enum MembershipError {
    /// Configuration error (unparseable base URL, bad endpoint path)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection refused, timeout, TLS)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response. `body` is the raw error payload.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl MembershipError {
    /// HTTP status of the failed request, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Extract the `user_message` field from an error payload.
///
/// Returns `None` when the payload is not JSON, is not an object, or has no
/// string `user_message`; callers then fall back to their generic message.
pub fn user_message_from_payload(payload: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(payload).ok()?;
    value
        .get("user_message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
}
