//! Pure team membership REST API client.
//!
//! A minimal client for the course teams API. Supports looking up a user's
//! memberships in a course, joining a team, re-reading a team, and creating a
//! live-collaboration meeting.
//!
//! # Example
//!
//! ```rust,ignore
//! use membership_client::{Endpoints, MembershipClient};
//!
//! let client = MembershipClient::new(
//!     "https://courses.example.org",
//!     Endpoints {
//!         memberships: "/api/team/v0/team_membership/".into(),
//!         teams: "/api/team/v0/teams/".into(),
//!         meetings: None,
//!     },
//! )?
//! .with_token(token);
//!
//! let count = client.count_memberships("staff", "course-v1:edX+DemoX+Demo").await?;
//! ```

pub mod error;
pub mod types;

pub use error::{user_message_from_payload, MembershipError, Result};
pub use types::{CreateMembershipForm, Endpoints, MeetingCreated, MembershipPage, MembershipQuery};

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

#[derive(Clone)]
pub struct MembershipClient {
    client: reqwest::Client,
    base_url: Url,
    endpoints: Endpoints,
    token: Option<String>,
}

impl MembershipClient {
    pub fn new(base_url: &str, endpoints: Endpoints) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| MembershipError::Config(format!("invalid base URL {base_url}: {e}")))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            endpoints,
            token: None,
        })
    }

    /// Authenticate every request with a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Count the memberships `username` holds in `course_id`.
    pub async fn count_memberships(&self, username: &str, course_id: &str) -> Result<u64> {
        let url = self.resolve(&self.endpoints.memberships)?;
        let query = MembershipQuery {
            username,
            course_id,
        };
        let resp = self.send(self.client.get(url).query(&query)).await?;
        let page: MembershipPage = parse_json(resp).await?;
        tracing::debug!(username, course_id, count = page.count, "Membership lookup");
        Ok(page.count)
    }

    /// Add `username` to `team_id`. The response body is not required.
    pub async fn create_membership(&self, team_id: &str, username: &str) -> Result<()> {
        let url = self.resolve(&self.endpoints.memberships)?;
        let form = CreateMembershipForm { username, team_id };
        self.send(self.client.post(url).form(&form)).await?;
        tracing::info!(team_id, username, "Membership created");
        Ok(())
    }

    /// Fetch the current state of a team.
    pub async fn fetch_team<T: DeserializeOwned>(&self, team_id: &str) -> Result<T> {
        let mut url = self.resolve(&self.endpoints.teams)?;
        url.path_segments_mut()
            .map_err(|_| MembershipError::Config("teams endpoint cannot take a team id".into()))?
            .pop_if_empty()
            .push(team_id);
        let resp = self.send(self.client.get(url)).await?;
        parse_json(resp).await
    }

    /// Create a meeting for the authenticated user and return its id.
    pub async fn create_meeting(&self) -> Result<String> {
        let path = self
            .endpoints
            .meetings
            .as_deref()
            .ok_or_else(|| MembershipError::Config("meeting endpoint not configured".into()))?;
        let url = self.resolve(path)?;
        let resp = self.send(self.client.post(url)).await?;
        let created: MeetingCreated = parse_json(resp).await?;
        tracing::info!(meeting_id = %created.meeting_id, "Meeting created");
        Ok(created.meeting_id)
    }

    fn resolve(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| MembershipError::Config(format!("invalid endpoint {path}: {e}")))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Membership API returned an error");
            return Err(MembershipError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }
}

async fn parse_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let body = resp.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| MembershipError::Parse(format!("unexpected response body: {e}")))
}
