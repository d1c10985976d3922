//! The team profile header actions component: one per page/team.

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::actions::{ActionController, ActionOutcome};
use crate::bus::TeamEventBus;
use crate::coordinator::{PanelPhase, RenderCoordinator};
use crate::eligibility::EligibilityState;
use crate::error::TeamActionsError;
use crate::kernel::ActionDeps;
use crate::render::PanelRenderer;
use crate::state::TeamState;
use crate::types::{PanelContext, Topic};

/// Construction options, supplied by the enclosing page.
pub struct HeaderActionsOptions {
    pub context: PanelContext,
    pub topic: Topic,
    pub team: TeamState,
    /// Static capability; not derived from eligibility.
    pub show_edit_button: bool,
    pub deps: ActionDeps,
    pub bus: TeamEventBus,
}

pub struct TeamProfileHeaderActions {
    team: TeamState,
    controller: Arc<ActionController>,
    coordinator: Arc<RenderCoordinator>,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl TeamProfileHeaderActions {
    /// Validate the page context and wire the controller and coordinator.
    pub fn new(options: HeaderActionsOptions) -> Result<Self, TeamActionsError> {
        options.context.validate()?;

        let context = Arc::new(options.context);
        let cancel = CancellationToken::new();
        let controller = Arc::new(ActionController::new(
            context.clone(),
            options.topic.clone(),
            options.team.clone(),
            options.deps.clone(),
            options.bus,
            cancel.clone(),
        ));
        let coordinator = Arc::new(RenderCoordinator::new(
            context,
            options.topic,
            options.show_edit_button,
            options.deps,
            PanelRenderer::new()?,
            cancel.clone(),
        ));

        Ok(Self {
            team: options.team,
            controller,
            coordinator,
            cancel,
            task: Mutex::new(None),
        })
    }

    /// Start listening for team changes. Renders the current team right away.
    ///
    /// Must be called from within a Tokio runtime. Calling it twice is a no-op.
    pub fn start(&self) {
        let Ok(mut task) = self.task.lock() else {
            return;
        };
        if task.is_some() || self.cancel.is_cancelled() {
            return;
        }
        let changes = self.team.subscribe();
        *task = Some(tokio::spawn(self.coordinator.clone().run(changes)));
        info!(team_id = %self.team.current().id, "Team header actions started");
    }

    /// Evaluate and render the current team once, outside the change loop.
    pub async fn render(&self) -> Option<EligibilityState> {
        let team = self.team.current();
        self.coordinator.render(&team).await
    }

    pub async fn join_team(&self) -> ActionOutcome {
        self.controller.join_team().await
    }

    pub fn edit_team(&self) -> ActionOutcome {
        self.controller.edit_team()
    }

    pub async fn join_meeting(&self) -> ActionOutcome {
        self.controller.join_meeting().await
    }

    pub fn phase(&self) -> PanelPhase {
        self.coordinator.phase()
    }

    pub fn subscribe_phase(&self) -> tokio::sync::watch::Receiver<PanelPhase> {
        self.coordinator.subscribe_phase()
    }

    pub fn team(&self) -> &TeamState {
        &self.team
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stop rendering and discard every in-flight result.
    pub fn teardown(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();
        info!(team_id = %self.team.current().id, "Team header actions torn down");
    }

    /// Tear down and wait for the change loop to exit.
    pub async fn shutdown(&self) {
        self.teardown();
        let task = self.task.lock().ok().and_then(|mut task| task.take());
        if let Some(task) = task {
            let _ = task.await;
        }
    }
}

impl Drop for TeamProfileHeaderActions {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
