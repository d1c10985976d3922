//! Testing utilities including mock implementations of every port.
//!
//! These let the evaluator, controller and coordinator run without a
//! membership service, router or page. Every mock records its calls so tests
//! can assert on what was (or was not) requested.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{watch, Semaphore};

use crate::error::ServiceError;
use crate::kernel::{BaseMembershipService, BaseNavigator, BaseNotifier, BasePanelView};
use crate::types::Team;

// =============================================================================
// Mock Membership Service
// =============================================================================

/// Record of a call made to the mock membership service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipCall {
    CountMemberships { username: String, course_id: String },
    CreateMembership { team_id: String, username: String },
    FetchTeam { team_id: String },
    CreateMeeting,
}

/// Gate that holds a mocked request open until the test releases it.
#[derive(Clone)]
pub struct RequestGate(Arc<Semaphore>);

impl RequestGate {
    pub fn new() -> Self {
        Self(Arc::new(Semaphore::new(0)))
    }

    /// Let `n` waiting (or future) requests through.
    pub fn release(&self, n: usize) {
        self.0.add_permits(n);
    }

    async fn pass(&self) {
        if let Ok(permit) = self.0.acquire().await {
            permit.forget();
        }
    }
}

impl Default for RequestGate {
    fn default() -> Self {
        Self::new()
    }
}

pub struct MockMembershipService {
    count_responses: Mutex<VecDeque<Result<u64, ServiceError>>>,
    default_count: Mutex<Result<u64, ServiceError>>,
    create_result: Mutex<Result<(), ServiceError>>,
    team: Mutex<Option<Result<Team, ServiceError>>>,
    meeting_result: Mutex<Result<String, ServiceError>>,
    lookup_gate: Option<RequestGate>,
    create_gate: Option<RequestGate>,
    fetch_gate: Option<RequestGate>,
    meeting_gate: Option<RequestGate>,
    calls: Mutex<Vec<MembershipCall>>,
}

impl MockMembershipService {
    pub fn new() -> Self {
        Self {
            count_responses: Mutex::new(VecDeque::new()),
            default_count: Mutex::new(Ok(0)),
            create_result: Mutex::new(Ok(())),
            team: Mutex::new(None),
            meeting_result: Mutex::new(Ok("meeting-1".to_string())),
            lookup_gate: None,
            create_gate: None,
            fetch_gate: None,
            meeting_gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer every lookup with `count`.
    pub fn with_course_memberships(self, count: u64) -> Self {
        *self.default_count.lock().unwrap() = Ok(count);
        self
    }

    /// Answer every lookup with an error.
    pub fn with_count_error(self, error: ServiceError) -> Self {
        *self.default_count.lock().unwrap() = Err(error);
        self
    }

    /// Queue a one-off lookup answer, used before the default.
    pub fn with_next_count(self, response: Result<u64, ServiceError>) -> Self {
        self.count_responses.lock().unwrap().push_back(response);
        self
    }

    pub fn with_create_error(self, error: ServiceError) -> Self {
        *self.create_result.lock().unwrap() = Err(error);
        self
    }

    /// Team returned by `fetch_team`.
    pub fn with_team(self, team: Team) -> Self {
        *self.team.lock().unwrap() = Some(Ok(team));
        self
    }

    pub fn with_fetch_error(self, error: ServiceError) -> Self {
        *self.team.lock().unwrap() = Some(Err(error));
        self
    }

    pub fn with_meeting_id(self, meeting_id: &str) -> Self {
        *self.meeting_result.lock().unwrap() = Ok(meeting_id.to_string());
        self
    }

    pub fn with_meeting_error(self, error: ServiceError) -> Self {
        *self.meeting_result.lock().unwrap() = Err(error);
        self
    }

    pub fn with_lookup_gate(mut self, gate: RequestGate) -> Self {
        self.lookup_gate = Some(gate);
        self
    }

    pub fn with_create_gate(mut self, gate: RequestGate) -> Self {
        self.create_gate = Some(gate);
        self
    }

    pub fn with_fetch_gate(mut self, gate: RequestGate) -> Self {
        self.fetch_gate = Some(gate);
        self
    }

    pub fn with_meeting_gate(mut self, gate: RequestGate) -> Self {
        self.meeting_gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<MembershipCall> {
        self.calls.lock().unwrap().clone()
    }

    /// `(username, course_id)` of every lookup issued
    pub fn count_calls(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MembershipCall::CountMemberships {
                    username,
                    course_id,
                } => Some((username, course_id)),
                _ => None,
            })
            .collect()
    }

    /// `(team_id, username)` of every join issued
    pub fn create_calls(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MembershipCall::CreateMembership { team_id, username } => Some((team_id, username)),
                _ => None,
            })
            .collect()
    }

    pub fn fetch_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MembershipCall::FetchTeam { team_id } => Some(team_id),
                _ => None,
            })
            .collect()
    }

    pub fn meeting_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MembershipCall::CreateMeeting))
            .count()
    }

    fn record(&self, call: MembershipCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for MockMembershipService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseMembershipService for MockMembershipService {
    async fn count_memberships(
        &self,
        username: &str,
        course_id: &str,
    ) -> Result<u64, ServiceError> {
        self.record(MembershipCall::CountMemberships {
            username: username.to_string(),
            course_id: course_id.to_string(),
        });
        let response = self.count_responses.lock().unwrap().pop_front();

        if let Some(gate) = &self.lookup_gate {
            gate.pass().await;
        }

        match response {
            Some(response) => response,
            None => self.default_count.lock().unwrap().clone(),
        }
    }

    async fn create_membership(&self, team_id: &str, username: &str) -> Result<(), ServiceError> {
        self.record(MembershipCall::CreateMembership {
            team_id: team_id.to_string(),
            username: username.to_string(),
        });
        if let Some(gate) = &self.create_gate {
            gate.pass().await;
        }
        self.create_result.lock().unwrap().clone()
    }

    async fn fetch_team(&self, team_id: &str) -> Result<Team, ServiceError> {
        self.record(MembershipCall::FetchTeam {
            team_id: team_id.to_string(),
        });
        if let Some(gate) = &self.fetch_gate {
            gate.pass().await;
        }
        self.team
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(ServiceError::new("team refresh", "no team configured")))
    }

    async fn create_meeting(&self) -> Result<String, ServiceError> {
        self.record(MembershipCall::CreateMeeting);
        if let Some(gate) = &self.meeting_gate {
            gate.pass().await;
        }
        self.meeting_result.lock().unwrap().clone()
    }
}

// =============================================================================
// Recording Navigator
// =============================================================================

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().unwrap().clone()
    }
}

impl BaseNavigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }

    fn redirect(&self, url: &str) {
        self.redirects.lock().unwrap().push(url.to_string());
    }
}

// =============================================================================
// Recording Notifier
// =============================================================================

#[derive(Default)]
pub struct RecordingNotifier {
    errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl BaseNotifier for RecordingNotifier {
    fn show_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

// =============================================================================
// Recording Panel View
// =============================================================================

/// Panel element double. Keeps the current content plus a render history.
pub struct RecordingPanelView {
    renders: Mutex<Vec<String>>,
    render_count: watch::Sender<usize>,
}

impl RecordingPanelView {
    pub fn new() -> Self {
        let (render_count, _) = watch::channel(0);
        Self {
            renders: Mutex::new(Vec::new()),
            render_count,
        }
    }

    /// Current content of the panel.
    pub fn html(&self) -> Option<String> {
        self.renders.lock().unwrap().last().cloned()
    }

    pub fn renders(&self) -> Vec<String> {
        self.renders.lock().unwrap().clone()
    }

    pub fn render_count(&self) -> usize {
        *self.render_count.borrow()
    }

    /// Wait until at least `n` renders have happened.
    pub async fn wait_for_renders(&self, n: usize) {
        let mut rx = self.render_count.subscribe();
        let _ = rx.wait_for(|count| *count >= n).await;
    }
}

impl Default for RecordingPanelView {
    fn default() -> Self {
        Self::new()
    }
}

impl BasePanelView for RecordingPanelView {
    fn set_html(&self, html: &str) {
        self.renders.lock().unwrap().push(html.to_string());
        self.render_count.send_modify(|count| *count += 1);
    }
}
