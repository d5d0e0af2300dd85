use crate::protocol::Inbound;
use crate::tracker::{TabId, TimerId};

/// Actions that can be dispatched through the application
#[derive(Debug, Clone)]
pub enum Action {
    /// A message arrived from the host bridge
    Inbound(Inbound),
    /// A settle timer elapsed
    SettleDue { tab_id: TabId, timer: TimerId },
    /// Reading from the host bridge failed
    Error(String),
    /// Request to quit the application
    Quit,
}
