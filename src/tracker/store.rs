use std::collections::HashMap;

use super::{TabId, TabStatusRecord};

/// Owned mapping from tab id to its status record.
///
/// Records are created lazily by [`StatusStore::ensure`] and live until
/// [`StatusStore::remove`] is called for the tab.
#[derive(Debug, Default)]
pub struct StatusStore {
    records: HashMap<TabId, TabStatusRecord>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the record for a tab, creating an idle one if missing
    pub fn ensure(&mut self, tab_id: TabId) -> &mut TabStatusRecord {
        self.records.entry(tab_id).or_default()
    }

    #[cfg(test)]
    pub fn get(&self, tab_id: TabId) -> Option<&TabStatusRecord> {
        self.records.get(&tab_id)
    }

    pub fn get_mut(&mut self, tab_id: TabId) -> Option<&mut TabStatusRecord> {
        self.records.get_mut(&tab_id)
    }

    pub fn remove(&mut self, tab_id: TabId) -> Option<TabStatusRecord> {
        self.records.remove(&tab_id)
    }

    #[cfg(test)]
    pub fn contains(&self, tab_id: TabId) -> bool {
        self.records.contains_key(&tab_id)
    }

    pub fn tab_ids(&self) -> Vec<TabId> {
        self.records.keys().copied().collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
