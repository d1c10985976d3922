// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no eligibility or action logic.
// The decision code in `eligibility` and `actions` is written against them.
//
// Naming convention: Base* for trait names (e.g., BaseMembershipService, BaseNavigator)

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::types::Team;

// =============================================================================
// Membership Service Trait (Infrastructure - team membership backend)
// =============================================================================

#[async_trait]
pub trait BaseMembershipService: Send + Sync {
    /// Number of memberships `username` holds anywhere in `course_id`
    async fn count_memberships(&self, username: &str, course_id: &str)
        -> Result<u64, ServiceError>;

    /// Add `username` to `team_id`
    async fn create_membership(&self, team_id: &str, username: &str) -> Result<(), ServiceError>;

    /// Re-read the current state of a team
    async fn fetch_team(&self, team_id: &str) -> Result<Team, ServiceError>;

    /// Create a live-collaboration meeting for the authenticated user, returning its id
    async fn create_meeting(&self) -> Result<String, ServiceError>;
}

// =============================================================================
// Navigation Trait (Infrastructure - page router / location)
// =============================================================================

pub trait BaseNavigator: Send + Sync {
    /// Client-side route change (history push with trigger)
    fn navigate(&self, route: &str);

    /// Leave the page for an external URL
    fn redirect(&self, url: &str);
}

// =============================================================================
// Notification Trait (Infrastructure - shared page message area)
// =============================================================================

pub trait BaseNotifier: Send + Sync {
    fn show_error(&self, message: &str);
}

// =============================================================================
// Panel View Trait (Infrastructure - the element the controls render into)
// =============================================================================

pub trait BasePanelView: Send + Sync {
    /// Replace the panel's content. Never appends.
    fn set_html(&self, html: &str);
}
