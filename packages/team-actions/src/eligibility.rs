//! Eligibility decision for the join control.
//!
//! The decision is split the same way the rest of the crate splits work:
//! pure steps decide, and the single IO step (the "member elsewhere" lookup)
//! runs between them only when the pure steps cannot settle the answer.
//!
//! Check order is fixed:
//!
//! 1. Viewer already on this team → [`EligibilityState::NoAction`] (local)
//! 2. Team at capacity → [`EligibilityState::TeamFull`] (local, no lookup)
//! 3. Viewer on another team in the course → [`EligibilityState::AlreadyMemberElsewhere`] (lookup)
//! 4. Instructor-managed topic and viewer is neither privileged nor staff
//!    → [`EligibilityState::Blocked`]
//! 5. Otherwise → [`EligibilityState::ShowJoin`]

use serde::Serialize;
use tracing::debug;

use crate::error::ServiceError;
use crate::kernel::BaseMembershipService;
use crate::messages::MessageKind;
use crate::types::{PanelContext, Team, Topic, UserInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    InstructorManaged,
}

/// Derived UI-gating decision for the current viewer/team pair.
///
/// Recomputed on every team change; never cached past one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityState {
    ShowJoin,
    AlreadyMemberElsewhere,
    TeamFull,
    Blocked(BlockReason),
    /// Viewer is already on this team; no join control or message.
    NoAction,
    /// The membership lookup failed. Renders no join control.
    Unresolved,
}

impl EligibilityState {
    pub fn show_join_button(&self) -> bool {
        matches!(self, EligibilityState::ShowJoin)
    }

    pub fn message(&self) -> Option<MessageKind> {
        match self {
            EligibilityState::AlreadyMemberElsewhere => Some(MessageKind::AlreadyMemberElsewhere),
            EligibilityState::TeamFull => Some(MessageKind::TeamFull),
            EligibilityState::Blocked(BlockReason::InstructorManaged) => {
                Some(MessageKind::InstructorManaged)
            }
            EligibilityState::ShowJoin
            | EligibilityState::NoAction
            | EligibilityState::Unresolved => None,
        }
    }
}

/// Everything the decision reads.
#[derive(Debug, Clone, Copy)]
pub struct EligibilityInputs<'a> {
    pub team: &'a Team,
    pub user: &'a UserInfo,
    pub topic: &'a Topic,
    pub max_team_size: usize,
    pub course_id: &'a str,
}

impl<'a> EligibilityInputs<'a> {
    pub fn new(team: &'a Team, topic: &'a Topic, context: &'a PanelContext) -> Self {
        Self {
            team,
            user: &context.user_info,
            topic,
            max_team_size: context.max_team_size,
            course_id: &context.course_id,
        }
    }
}

/// Outcome of the checks that need no network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalDecision {
    Settled(EligibilityState),
    /// Team has space and the viewer is not on it; ask the service.
    NeedsLookup,
}

/// Steps 1 and 2.
pub fn decide_locally(inputs: &EligibilityInputs<'_>) -> LocalDecision {
    if inputs.team.has_member(&inputs.user.username) {
        return LocalDecision::Settled(EligibilityState::NoAction);
    }
    if !inputs.team.has_space(inputs.max_team_size) {
        return LocalDecision::Settled(EligibilityState::TeamFull);
    }
    LocalDecision::NeedsLookup
}

/// Steps 3 to 5, given how many memberships the viewer holds in the course.
pub fn decide_after_lookup(
    inputs: &EligibilityInputs<'_>,
    course_memberships: u64,
) -> EligibilityState {
    if course_memberships > 0 {
        EligibilityState::AlreadyMemberElsewhere
    } else if inputs.topic.is_instructor_managed() && !inputs.user.is_admin_or_staff() {
        EligibilityState::Blocked(BlockReason::InstructorManaged)
    } else {
        EligibilityState::ShowJoin
    }
}

/// Run the full decision, issuing the lookup only when required.
///
/// A failed lookup is returned as an error; it never falls through to
/// [`EligibilityState::ShowJoin`].
pub async fn evaluate(
    inputs: &EligibilityInputs<'_>,
    membership: &dyn BaseMembershipService,
) -> Result<EligibilityState, ServiceError> {
    if let LocalDecision::Settled(state) = decide_locally(inputs) {
        debug!(team_id = %inputs.team.id, ?state, "Eligibility settled locally");
        return Ok(state);
    }

    let count = membership
        .count_memberships(&inputs.user.username, inputs.course_id)
        .await?;

    let state = decide_after_lookup(inputs, count);
    debug!(team_id = %inputs.team.id, course_memberships = count, ?state, "Eligibility evaluated");
    Ok(state)
}
