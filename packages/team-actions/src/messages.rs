//! User-facing message kinds, resolved to text only at the presentation edge.

use serde::Serialize;

use crate::error::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    GenericError,
    AlreadyMemberElsewhere,
    TeamFull,
    InstructorManaged,
}

impl MessageKind {
    pub fn text(&self) -> &'static str {
        match self {
            MessageKind::GenericError => "An error occurred. Try again.",
            MessageKind::AlreadyMemberElsewhere => "You already belong to another team.",
            MessageKind::TeamFull => "This team is full.",
            MessageKind::InstructorManaged => "Cannot join instructor managed team",
        }
    }
}

/// Text to surface for a failed request: the server's `user_message` when the
/// payload carries one, the generic error otherwise.
pub fn service_error_text(error: &ServiceError) -> String {
    error
        .user_message()
        .unwrap_or_else(|| MessageKind::GenericError.text().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_text_prefers_payload() {
        let err = ServiceError::api("join team", 400, r#"{"user_message": "Team is locked."}"#);
        assert_eq!(service_error_text(&err), "Team is locked.");
    }

    #[test]
    fn test_service_error_text_falls_back_to_generic() {
        let err = ServiceError::api("join team", 502, "<html>Bad Gateway</html>");
        assert_eq!(service_error_text(&err), "An error occurred. Try again.");
    }
}
