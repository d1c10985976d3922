//! Page-owned team entity with change notification.

use std::sync::Arc;

use tokio::sync::watch;

use crate::types::Team;

/// Shared handle to the team shown on the page.
///
/// Subscribers are notified only when a replacement actually differs from the
/// current value, mirroring attribute-level change events.
#[derive(Clone)]
pub struct TeamState {
    sender: Arc<watch::Sender<Team>>,
}

impl TeamState {
    pub fn new(team: Team) -> Self {
        let (sender, _) = watch::channel(team);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Snapshot of the current team.
    pub fn current(&self) -> Team {
        self.sender.borrow().clone()
    }

    /// Replace the team. Returns whether anything changed.
    pub fn replace(&self, team: Team) -> bool {
        self.sender.send_if_modified(|current| {
            if *current == team {
                false
            } else {
                *current = team;
                true
            }
        })
    }

    /// Receiver that wakes on every change after subscription.
    pub fn subscribe(&self) -> watch::Receiver<Team> {
        self.sender.subscribe()
    }
}

impl std::fmt::Debug for TeamState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamState")
            .field("team_id", &self.sender.borrow().id)
            .field("subscriber_count", &self.sender.receiver_count())
            .finish()
    }
}
