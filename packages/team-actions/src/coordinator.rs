//! Re-evaluates eligibility and re-renders the panel whenever the team changes.
//!
//! ```text
//! Idle ─► Evaluating ─► Rendered(state) ─► Evaluating (next change) ─► ...
//!             ▲   │
//!             └───┘ change while evaluating: pending cycle dropped
//! ```
//!
//! Only the newest team snapshot's result reaches the view. After teardown
//! nothing is written to the view or the notifier.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::eligibility::{evaluate, EligibilityInputs, EligibilityState};
use crate::kernel::ActionDeps;
use crate::messages::service_error_text;
use crate::render::{PanelRenderer, PanelView};
use crate::types::{PanelContext, Team, Topic};

/// Render-relevant phase of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPhase {
    Idle,
    Evaluating,
    Rendered(EligibilityState),
}

enum Cycle {
    Rendered,
    Superseded,
    TornDown,
}

pub struct RenderCoordinator {
    context: Arc<PanelContext>,
    topic: Topic,
    show_edit_button: bool,
    deps: ActionDeps,
    renderer: PanelRenderer,
    cancel: CancellationToken,
    phase: watch::Sender<PanelPhase>,
}

impl RenderCoordinator {
    pub fn new(
        context: Arc<PanelContext>,
        topic: Topic,
        show_edit_button: bool,
        deps: ActionDeps,
        renderer: PanelRenderer,
        cancel: CancellationToken,
    ) -> Self {
        let (phase, _) = watch::channel(PanelPhase::Idle);
        Self {
            context,
            topic,
            show_edit_button,
            deps,
            renderer,
            cancel,
            phase,
        }
    }

    pub fn phase(&self) -> PanelPhase {
        *self.phase.borrow()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<PanelPhase> {
        self.phase.subscribe()
    }

    /// Evaluate eligibility for `team` and write the panel.
    ///
    /// Returns the rendered state, or `None` when the component was torn
    /// down first or the template failed.
    pub async fn render(&self, team: &Team) -> Option<EligibilityState> {
        if self.cancel.is_cancelled() {
            return None;
        }
        self.phase.send_replace(PanelPhase::Evaluating);

        let inputs = EligibilityInputs::new(team, &self.topic, &self.context);
        let evaluated = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return None,
            result = evaluate(&inputs, self.deps.membership.as_ref()) => result,
        };
        if self.cancel.is_cancelled() {
            return None;
        }

        let state = match evaluated {
            Ok(state) => state,
            Err(e) => {
                warn!(team_id = %team.id, error = %e, "Eligibility lookup failed");
                self.deps.notifier.show_error(&service_error_text(&e));
                EligibilityState::Unresolved
            }
        };

        let view = PanelView::new(state, &self.context, &team.id, self.show_edit_button);
        match self.renderer.render(&view) {
            Ok(html) => {
                self.deps.view.set_html(&html);
                self.phase.send_replace(PanelPhase::Rendered(state));
                debug!(team_id = %team.id, ?state, "Panel rendered");
                Some(state)
            }
            Err(e) => {
                error!(team_id = %team.id, error = %e, "Panel template failed to render");
                None
            }
        }
    }

    /// Render the current team, then again after every change, until teardown.
    pub async fn run(self: Arc<Self>, mut changes: watch::Receiver<Team>) {
        let mut team = changes.borrow_and_update().clone();

        loop {
            let cycle = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Cycle::TornDown,
                changed = changes.changed() => match changed {
                    Ok(()) => Cycle::Superseded,
                    Err(_) => Cycle::TornDown,
                },
                _ = self.render(&team) => Cycle::Rendered,
            };

            match cycle {
                Cycle::TornDown => break,
                Cycle::Superseded => {
                    debug!(team_id = %team.id, "Team changed during evaluation, restarting");
                    team = changes.borrow_and_update().clone();
                    continue;
                }
                Cycle::Rendered => {}
            }

            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Cycle::TornDown,
                changed = changes.changed() => match changed {
                    Ok(()) => Cycle::Superseded,
                    Err(_) => Cycle::TornDown,
                },
            };
            match next {
                Cycle::Superseded => team = changes.borrow_and_update().clone(),
                _ => break,
            }
        }

        debug!("Render coordinator stopped");
    }
}
