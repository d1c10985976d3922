//! Typed event bus shared with sibling components on the page.
//!
//! # Guarantees
//!
//! - **At-most-once delivery**: Slow receivers may miss events
//! - **In-memory only**: Events are not persisted
//! - **No replay**: Lagged receivers get `RecvError::Lagged`

use serde::Serialize;
use tokio::sync::broadcast;

use crate::types::Team;

/// Default channel capacity for the event bus.
const DEFAULT_CAPACITY: usize = 64;

/// Facts other page components (roster list, team listing) react to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action")]
pub enum TeamEvent {
    /// The viewer joined the team and the team has been re-read.
    #[serde(rename = "join")]
    Joined { team_id: String, team: Team },
}

impl TeamEvent {
    /// Channel name used by untyped listeners.
    pub fn channel(&self) -> &'static str {
        match self {
            TeamEvent::Joined { .. } => "teams:update",
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            TeamEvent::Joined { .. } => "join",
        }
    }

    pub fn team(&self) -> &Team {
        match self {
            TeamEvent::Joined { team, .. } => team,
        }
    }
}

/// Broadcast channel of [`TeamEvent`]s.
///
/// # Example
///
/// ```ignore
/// let bus = TeamEventBus::new();
/// let mut receiver = bus.subscribe();
///
/// bus.emit(TeamEvent::Joined { team_id: team.id.clone(), team });
///
/// let event = receiver.recv().await?;
/// assert_eq!(event.action(), "join");
/// ```
#[derive(Clone)]
pub struct TeamEventBus {
    sender: broadcast::Sender<TeamEvent>,
}

impl TeamEventBus {
    /// Create a new event bus with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new event bus with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emit an event to all subscribers (fire-and-forget).
    ///
    /// Returns the number of receivers that received the event.
    pub fn emit(&self, event: TeamEvent) -> usize {
        tracing::debug!(channel = event.channel(), action = event.action(), "Emitting team event");
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<TeamEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for TeamEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TeamEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamEventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
