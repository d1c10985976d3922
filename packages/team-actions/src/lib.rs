//! # Team Actions
//!
//! Decides, per viewing user, which action controls ("Join team", "Edit
//! team", "Join meeting") a team profile page may show, renders them, and
//! runs the actions behind them.
//!
//! ## Architecture
//!
//! ```text
//! TeamState change
//!     │
//!     ▼
//! RenderCoordinator ──► eligibility::evaluate ──► BaseMembershipService (lookup)
//!     │                        │
//!     │                        ▼
//!     └──────────────► PanelRenderer ──► BasePanelView
//!
//! click ──► ActionController ──► BaseMembershipService (join / meeting)
//!                │
//!                ├─► TeamState.replace() ──► (loop above)
//!                ├─► TeamEventBus.emit(TeamEvent::Joined)
//!                ├─► BaseNavigator (edit route / meeting redirect)
//!                └─► BaseNotifier (errors)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! let actions = TeamProfileHeaderActions::new(HeaderActionsOptions {
//!     context,
//!     topic,
//!     team: TeamState::new(team),
//!     show_edit_button: user_can_edit,
//!     deps: ActionDeps::new(membership, navigator, notifier, view),
//!     bus: TeamEventBus::new(),
//! })?;
//!
//! actions.start();
//! actions.join_team().await;
//! ```

pub mod actions;
pub mod bus;
pub mod component;
pub mod coordinator;
pub mod eligibility;
pub mod error;
pub mod kernel;
pub mod messages;
pub mod render;
pub mod state;
pub mod types;

// Mock ports for tests (here and in dependent crates)
pub mod testing;

pub use actions::{edit_route, ActionController, ActionOutcome};
pub use bus::{TeamEvent, TeamEventBus};
pub use component::{HeaderActionsOptions, TeamProfileHeaderActions};
pub use coordinator::{PanelPhase, RenderCoordinator};
pub use eligibility::{evaluate, BlockReason, EligibilityInputs, EligibilityState};
pub use error::{ServiceError, TeamActionsError};
pub use kernel::{
    ActionDeps, BaseMembershipService, BaseNavigator, BaseNotifier, BasePanelView,
    HttpMembershipService,
};
pub use messages::MessageKind;
pub use render::{PanelRenderer, PanelView};
pub use state::TeamState;
pub use types::{MeetingInfo, MembershipRecord, PanelContext, Team, Topic, UserInfo, UserRef};
