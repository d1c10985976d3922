//! Component dependencies (using traits for testability)
//!
//! All external collaborators sit behind `Base*` traits so the evaluator and
//! controller can run against recording mocks in tests.

use std::sync::Arc;

use async_trait::async_trait;
use membership_client::{MembershipClient, MembershipError};

use crate::error::ServiceError;
use crate::kernel::{BaseMembershipService, BaseNavigator, BaseNotifier, BasePanelView};
use crate::types::Team;

// =============================================================================
// MembershipClient Adapter (implements BaseMembershipService trait)
// =============================================================================

/// Wrapper around MembershipClient that implements BaseMembershipService trait
pub struct HttpMembershipService(pub Arc<MembershipClient>);

impl HttpMembershipService {
    pub fn new(client: Arc<MembershipClient>) -> Self {
        Self(client)
    }
}

fn service_error(operation: &'static str, err: MembershipError) -> ServiceError {
    match err {
        MembershipError::Api { status, body } => ServiceError::api(operation, status, body),
        other => ServiceError {
            operation,
            status: other.status(),
            payload: None,
            message: other.to_string(),
        },
    }
}

#[async_trait]
impl BaseMembershipService for HttpMembershipService {
    async fn count_memberships(
        &self,
        username: &str,
        course_id: &str,
    ) -> Result<u64, ServiceError> {
        self.0
            .count_memberships(username, course_id)
            .await
            .map_err(|e| service_error("membership lookup", e))
    }

    async fn create_membership(&self, team_id: &str, username: &str) -> Result<(), ServiceError> {
        self.0
            .create_membership(team_id, username)
            .await
            .map_err(|e| service_error("join team", e))
    }

    async fn fetch_team(&self, team_id: &str) -> Result<Team, ServiceError> {
        self.0
            .fetch_team(team_id)
            .await
            .map_err(|e| service_error("team refresh", e))
    }

    async fn create_meeting(&self) -> Result<String, ServiceError> {
        self.0
            .create_meeting()
            .await
            .map_err(|e| service_error("create meeting", e))
    }
}

// =============================================================================
// ActionDeps
// =============================================================================

/// Collaborators of the header actions component.
#[derive(Clone)]
pub struct ActionDeps {
    pub membership: Arc<dyn BaseMembershipService>,
    pub navigator: Arc<dyn BaseNavigator>,
    pub notifier: Arc<dyn BaseNotifier>,
    pub view: Arc<dyn BasePanelView>,
}

impl ActionDeps {
    pub fn new(
        membership: Arc<dyn BaseMembershipService>,
        navigator: Arc<dyn BaseNavigator>,
        notifier: Arc<dyn BaseNotifier>,
        view: Arc<dyn BasePanelView>,
    ) -> Self {
        Self {
            membership,
            navigator,
            notifier,
            view,
        }
    }
}
