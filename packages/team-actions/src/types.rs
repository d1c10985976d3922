//! Domain types for the team profile header.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TeamActionsError;

/// A team as returned by the team-detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub topic_id: String,
    #[serde(default)]
    pub membership: Vec<MembershipRecord>,
}

impl Team {
    /// Whether `username` holds a membership record on this team.
    pub fn has_member(&self, username: &str) -> bool {
        self.membership.iter().any(|m| m.user.username == username)
    }

    pub fn member_count(&self) -> usize {
        self.membership.len()
    }

    /// Client-side estimate only; the server is authoritative on capacity.
    pub fn has_space(&self, max_team_size: usize) -> bool {
        self.member_count() < max_team_size
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipRecord {
    pub user: UserRef,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_activity_at: Option<DateTime<Utc>>,
}

impl MembershipRecord {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            user: UserRef {
                username: username.into(),
            },
            date_joined: None,
            last_activity_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub username: String,
}

/// A grouping of teams. The type tag decides whether joining is restricted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    #[serde(rename = "type", default)]
    pub topic_type: Option<String>,
}

impl Topic {
    pub fn new(id: impl Into<String>, topic_type: Option<&str>) -> Self {
        Self {
            id: id.into(),
            topic_type: topic_type.map(str::to_string),
        }
    }

    /// Any type other than `open` is instructor-managed. Untyped topics are open.
    pub fn is_instructor_managed(&self) -> bool {
        self.topic_type
            .as_deref()
            .is_some_and(|t| !t.is_empty() && !t.eq_ignore_ascii_case("open"))
    }
}

/// The viewing user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub username: String,
    #[serde(default)]
    pub privileged: bool,
    #[serde(default)]
    pub staff: bool,
}

impl UserInfo {
    pub fn is_admin_or_staff(&self) -> bool {
        self.privileged || self.staff
    }
}

/// Live-collaboration meeting descriptor supplied by the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeetingInfo {
    #[serde(default)]
    pub meeting_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Construction-time render inputs, as the page hands them over.
///
/// Immutable for the lifetime of the component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelContext {
    pub user_info: UserInfo,
    #[serde(default)]
    pub show_live_collaboration: bool,
    #[serde(default)]
    pub meetings: HashMap<String, MeetingInfo>,
    pub max_team_size: usize,
    #[serde(rename = "courseID")]
    pub course_id: String,
    pub team_memberships_url: String,
    #[serde(default)]
    pub teams_url: String,
    #[serde(default)]
    pub create_meetings_url: Option<String>,
    #[serde(default)]
    pub meeting_portal_url: Option<String>,
}

impl PanelContext {
    /// Reject contexts that would leave the panel unable to act.
    pub fn validate(&self) -> Result<(), TeamActionsError> {
        if self.user_info.username.trim().is_empty() {
            return missing("userInfo.username");
        }
        if self.course_id.trim().is_empty() {
            return missing("courseID");
        }
        if self.team_memberships_url.trim().is_empty() {
            return missing("teamMembershipsUrl");
        }
        if self.teams_url.trim().is_empty() {
            return missing("teamsUrl");
        }
        if self.max_team_size == 0 {
            return Err(TeamActionsError::Configuration(
                "maxTeamSize must be at least 1".to_string(),
            ));
        }
        if self.show_live_collaboration {
            if is_blank(&self.create_meetings_url) {
                return missing("createMeetingsUrl");
            }
            if is_blank(&self.meeting_portal_url) {
                return missing("meetingPortalUrl");
            }
        }
        Ok(())
    }

    /// Meeting descriptor for `team_id`, if the page supplied one.
    pub fn meeting_for(&self, team_id: &str) -> Option<&MeetingInfo> {
        self.meetings.get(team_id)
    }

    /// External URL of a meeting, built from the portal base.
    pub fn meeting_url(&self, meeting_id: &str) -> Option<String> {
        let base = self.meeting_portal_url.as_deref()?.trim_end_matches('/');
        Some(format!("{base}/meeting/{meeting_id}"))
    }
}

fn missing(field: &str) -> Result<(), TeamActionsError> {
    Err(TeamActionsError::Configuration(format!("{field} is required")))
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}
