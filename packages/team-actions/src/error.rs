//! Typed errors for the team profile actions.
//!
//! Service failures never escape the component: they are recovered locally
//! and surfaced through the notifier. These types exist so the recovery code
//! can tell what happened.

use thiserror::Error;

use membership_client::user_message_from_payload;

/// Errors raised while building or rendering the component.
#[derive(Debug, Error)]
pub enum TeamActionsError {
    /// Required page context is missing or invalid
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The panel template failed to load or render
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// A failed request to the membership service (lookup, join, re-fetch or
/// meeting creation).
#[derive(Debug, Clone, Error)]
#[error("{operation} failed: {message}")]
pub struct ServiceError {
    pub operation: &'static str,
    pub status: Option<u16>,
    /// Raw error payload, when the server sent one.
    pub payload: Option<String>,
    pub message: String,
}

impl ServiceError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            status: None,
            payload: None,
            message: message.into(),
        }
    }

    /// Failure with an HTTP status and error payload.
    pub fn api(operation: &'static str, status: u16, payload: impl Into<String>) -> Self {
        Self {
            operation,
            status: Some(status),
            payload: Some(payload.into()),
            message: format!("status {status}"),
        }
    }

    /// The `user_message` carried by the error payload, if it parses.
    pub fn user_message(&self) -> Option<String> {
        self.payload.as_deref().and_then(user_message_from_payload)
    }
}
