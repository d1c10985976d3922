use serde::{Deserialize, Serialize};

/// Endpoint paths, relative to the client's base URL (absolute URLs also work).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoints {
    /// Membership collection (`GET` to query, `POST` to create).
    pub memberships: String,
    /// Team detail collection; the team id is appended.
    pub teams: String,
    /// Meeting creation endpoint. Absent when live collaboration is off.
    pub meetings: Option<String>,
}

/// Form body for creating a membership.
#[derive(Debug, Clone, Serialize)]
pub struct CreateMembershipForm<'a> {
    pub username: &'a str,
    pub team_id: &'a str,
}

/// Query string for the membership lookup.
#[derive(Debug, Clone, Serialize)]
pub struct MembershipQuery<'a> {
    pub username: &'a str,
    pub course_id: &'a str,
}

/// Paginated membership listing. Only the total count is read.
#[derive(Debug, Clone, Deserialize)]
pub struct MembershipPage {
    pub count: u64,
}

/// Response of the meeting-creation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MeetingCreated {
    pub meeting_id: String,
}
