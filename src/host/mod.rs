mod bridge;
mod pattern;

pub use bridge::BridgeHost;
pub use pattern::{ChatHostPattern, DEFAULT_CHAT_HOST_PATTERN};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::HostError;
use crate::tracker::TabId;

/// Host-assigned browser window identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub i64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tab metadata as reported by the browser host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: TabId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub window_id: WindowId,
    #[serde(default)]
    pub active: bool,
}

#[cfg(test)]
impl TabInfo {
    pub fn new(id: TabId, window_id: WindowId, url: &str) -> Self {
        Self {
            id,
            title: None,
            url: Some(url.to_string()),
            window_id,
            active: false,
        }
    }
}

/// Tab operations provided by the browser host
pub trait TabHost {
    /// All tabs the host currently knows about
    fn query_tabs(&self) -> Vec<TabInfo>;

    fn get_tab(&self, tab_id: TabId) -> Result<TabInfo, HostError>;

    /// Raise a window to the foreground
    fn focus_window(&mut self, window_id: WindowId) -> Result<(), HostError>;

    /// Make a tab the active one in its window
    fn activate_tab(&mut self, tab_id: TabId) -> Result<(), HostError>;
}
