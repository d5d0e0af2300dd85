use std::collections::HashMap;
use tokio::sync::mpsc;

use super::{TabHost, TabInfo, WindowId};
use crate::error::HostError;
use crate::protocol::Outbound;
use crate::tracker::TabId;

/// Host backed by the stdio bridge.
///
/// Tab metadata is mirrored from inbound tab events; focus requests are
/// forwarded to the bridge as outbound effects.
pub struct BridgeHost {
    tabs: HashMap<TabId, TabInfo>,
    tx: mpsc::UnboundedSender<Outbound>,
}

impl BridgeHost {
    pub fn new(tx: mpsc::UnboundedSender<Outbound>) -> Self {
        Self {
            tabs: HashMap::new(),
            tx,
        }
    }

    /// Record the latest metadata for a tab
    pub fn upsert(&mut self, tab: TabInfo) {
        self.tabs.insert(tab.id, tab);
    }

    pub fn remove(&mut self, tab_id: TabId) -> Option<TabInfo> {
        self.tabs.remove(&tab_id)
    }

    /// Replace the whole directory with a fresh enumeration
    pub fn replace_all(&mut self, tabs: Vec<TabInfo>) {
        self.tabs = tabs.into_iter().map(|tab| (tab.id, tab)).collect();
    }

    #[cfg(test)]
    pub fn contains(&self, tab_id: TabId) -> bool {
        self.tabs.contains_key(&tab_id)
    }

    fn send(&self, message: Outbound) -> Result<(), HostError> {
        self.tx.send(message).map_err(|_| HostError::Disconnected)
    }
}

impl TabHost for BridgeHost {
    fn query_tabs(&self) -> Vec<TabInfo> {
        let mut tabs: Vec<TabInfo> = self.tabs.values().cloned().collect();
        tabs.sort_by_key(|tab| tab.id);
        tabs
    }

    fn get_tab(&self, tab_id: TabId) -> Result<TabInfo, HostError> {
        self.tabs
            .get(&tab_id)
            .cloned()
            .ok_or(HostError::TabNotFound(tab_id))
    }

    fn focus_window(&mut self, window_id: WindowId) -> Result<(), HostError> {
        if !self.tabs.values().any(|tab| tab.window_id == window_id) {
            return Err(HostError::WindowNotFound(window_id));
        }
        self.send(Outbound::FocusWindow { window_id })
    }

    fn activate_tab(&mut self, tab_id: TabId) -> Result<(), HostError> {
        let window_id = self.get_tab(tab_id)?.window_id;
        self.send(Outbound::ActivateTab { tab_id })?;

        for tab in self.tabs.values_mut() {
            if tab.window_id == window_id {
                tab.active = tab.id == tab_id;
            }
        }
        Ok(())
    }
}
