//! Panel template fill.

use minijinja::Environment;
use serde::Serialize;

use crate::eligibility::EligibilityState;
use crate::error::TeamActionsError;
use crate::types::{MeetingInfo, PanelContext};

const TEMPLATE_NAME: &str = "team_profile_header_actions.html";
const TEMPLATE_SOURCE: &str = include_str!("../templates/team_profile_header_actions.html");

/// Values the panel template is filled from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub show_join_button: bool,
    pub show_live_collaboration_button: bool,
    pub meeting_info: Option<MeetingInfo>,
    pub message: Option<String>,
    pub show_edit_button: bool,
}

impl PanelView {
    pub fn new(
        state: EligibilityState,
        context: &PanelContext,
        team_id: &str,
        show_edit_button: bool,
    ) -> Self {
        let meeting_info = context.meeting_for(team_id).cloned();
        Self {
            show_join_button: state.show_join_button(),
            show_live_collaboration_button: context.show_live_collaboration
                && meeting_info.is_some(),
            meeting_info,
            message: state.message().map(|kind| kind.text().to_string()),
            show_edit_button,
        }
    }
}

/// Renders [`PanelView`]s to HTML. Output is escaped.
pub struct PanelRenderer {
    env: Environment<'static>,
}

impl PanelRenderer {
    pub fn new() -> Result<Self, TeamActionsError> {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, TEMPLATE_SOURCE)?;
        Ok(Self { env })
    }

    pub fn render(&self, view: &PanelView) -> Result<String, TeamActionsError> {
        let template = self.env.get_template(TEMPLATE_NAME)?;
        Ok(template.render(view)?)
    }
}

impl std::fmt::Debug for PanelRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelRenderer")
            .field("template", &TEMPLATE_NAME)
            .finish()
    }
}
