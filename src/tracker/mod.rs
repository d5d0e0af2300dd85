mod machine;
mod notify;
mod store;
mod timer;

pub use machine::{Tracker, TrackerSettings};
pub use notify::{ChannelNotifier, Notification, Notifier};
pub use store::StatusStore;
pub use timer::{Clock, SettleScheduler, SystemClock, TimerId, TokioScheduler};

#[cfg(test)]
pub(crate) use machine::tests as testing;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::time::Instant;

/// Host-assigned tab identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Liveness status of a chat tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TabStatus {
    /// No activity observed yet
    #[default]
    Idle,
    /// User said they are awaiting a response
    Waiting,
    /// Title just changed, settle timer running
    Updating,
    /// Title has been stable for the settle window
    Ready,
}

/// Per-tab status record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabStatusRecord {
    pub status: TabStatus,
    /// Most recent title change (or "mark waiting" stamp)
    pub last_title_change: Option<DateTime<Utc>>,
    /// Monotonic twin of `last_title_change`, used by the quiet check
    pub quiet_since: Option<Instant>,
    pub last_title: String,
    /// Outstanding settle check, at most one per record
    pub pending_settle: Option<TimerId>,
}
