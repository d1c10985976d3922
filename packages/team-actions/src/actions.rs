//! Join team, edit team and join meeting.
//!
//! Each action issues at most one request per step, applies its success
//! effect (team refresh + event, route change, or redirect) and reports
//! failures through the notifier. Nothing is retried automatically.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bus::{TeamEvent, TeamEventBus};
use crate::error::ServiceError;
use crate::kernel::ActionDeps;
use crate::messages::{service_error_text, MessageKind};
use crate::state::TeamState;
use crate::types::{PanelContext, Topic};

/// What an action invocation ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Success effect applied.
    Completed,
    /// Request failed; the error was surfaced.
    Failed,
    /// Same action already in flight; nothing was sent.
    Ignored,
    /// Component torn down before the result arrived; nothing was applied.
    Discarded,
}

/// Per-action in-flight flag. Cleared when the guard drops.
#[derive(Debug, Default)]
struct InFlight(AtomicBool);

impl InFlight {
    fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(&self.0))
    }

    fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ActionController {
    context: Arc<PanelContext>,
    topic: Topic,
    team: TeamState,
    deps: ActionDeps,
    bus: TeamEventBus,
    cancel: CancellationToken,
    joining: InFlight,
    creating_meeting: InFlight,
}

impl ActionController {
    pub fn new(
        context: Arc<PanelContext>,
        topic: Topic,
        team: TeamState,
        deps: ActionDeps,
        bus: TeamEventBus,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            context,
            topic,
            team,
            deps,
            bus,
            cancel,
            joining: InFlight::default(),
            creating_meeting: InFlight::default(),
        }
    }

    pub fn is_joining(&self) -> bool {
        self.joining.is_set()
    }

    pub fn is_creating_meeting(&self) -> bool {
        self.creating_meeting.is_set()
    }

    /// Join the current team, then re-read it and announce the join.
    ///
    /// The event is emitted only after the re-read succeeds.
    pub async fn join_team(&self) -> ActionOutcome {
        let Some(_guard) = self.joining.try_begin() else {
            debug!("Join already in flight, ignoring");
            return ActionOutcome::Ignored;
        };
        if self.cancel.is_cancelled() {
            return ActionOutcome::Discarded;
        }

        let team_id = self.team.current().id;
        let username = self.context.user_info.username.as_str();

        let created = self
            .until_cancelled(self.deps.membership.create_membership(&team_id, username))
            .await;
        match created {
            None => return self.discarded("join team"),
            Some(Err(e)) => return self.fail(&e),
            Some(Ok(())) => {}
        }

        let refreshed = self
            .until_cancelled(self.deps.membership.fetch_team(&team_id))
            .await;
        let team = match refreshed {
            None => return self.discarded("team refresh"),
            Some(Err(e)) => return self.fail(&e),
            Some(Ok(team)) => team,
        };

        self.team.replace(team.clone());
        let receivers = self.bus.emit(TeamEvent::Joined {
            team_id: team.id.clone(),
            team,
        });
        info!(team_id = %team_id, username, receivers, "Joined team");
        ActionOutcome::Completed
    }

    /// Route to the team's edit page. No request, no failure path.
    pub fn edit_team(&self) -> ActionOutcome {
        if self.cancel.is_cancelled() {
            return ActionOutcome::Discarded;
        }
        let route = edit_route(&self.topic.id, &self.team.current().id);
        debug!(%route, "Navigating to edit team");
        self.deps.navigator.navigate(&route);
        ActionOutcome::Completed
    }

    /// Create a meeting and leave the page for it once the id is known.
    pub async fn join_meeting(&self) -> ActionOutcome {
        let Some(_guard) = self.creating_meeting.try_begin() else {
            debug!("Meeting creation already in flight, ignoring");
            return ActionOutcome::Ignored;
        };
        if self.cancel.is_cancelled() {
            return ActionOutcome::Discarded;
        }

        let meeting_id = match self
            .until_cancelled(self.deps.membership.create_meeting())
            .await
        {
            None => return self.discarded("create meeting"),
            Some(Err(e)) => return self.fail(&e),
            Some(Ok(id)) => id,
        };

        let Some(url) = self.context.meeting_url(&meeting_id) else {
            warn!(%meeting_id, "Meeting created but no portal URL is configured");
            self.deps.notifier.show_error(MessageKind::GenericError.text());
            return ActionOutcome::Failed;
        };

        info!(%meeting_id, "Redirecting to meeting");
        self.deps.navigator.redirect(&url);
        ActionOutcome::Completed
    }

    async fn until_cancelled<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            output = fut => (!self.cancel.is_cancelled()).then_some(output),
        }
    }

    fn fail(&self, error: &ServiceError) -> ActionOutcome {
        warn!(
            operation = error.operation,
            status = ?error.status,
            error = %error,
            "Action failed"
        );
        self.deps.notifier.show_error(&service_error_text(error));
        ActionOutcome::Failed
    }

    fn discarded(&self, operation: &'static str) -> ActionOutcome {
        debug!(operation, "Component torn down, discarding result");
        ActionOutcome::Discarded
    }
}

/// Client-side route of the edit page.
pub fn edit_route(topic_id: &str, team_id: &str) -> String {
    format!("teams/{topic_id}/{team_id}/edit-team")
}
