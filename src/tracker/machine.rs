use std::time::Duration;
use tracing::{debug, info};

use super::{
    Clock, Notification, Notifier, SettleScheduler, StatusStore, TabId, TabStatus,
    TabStatusRecord, TimerId,
};

/// Tunables for settle detection and notification text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerSettings {
    /// Delay after each title change before the settle check runs
    pub settle_window: Duration,
    /// Minimum time since the last title change for the check to pass
    pub quiet_threshold: Duration,
    pub notification_title: String,
    /// Body used when the settled title is empty
    pub fallback_body: String,
    pub icon_url: String,
    pub message_max_chars: usize,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            settle_window: Duration::from_millis(2000),
            quiet_threshold: Duration::from_millis(1800),
            notification_title: "Chat likely finished".to_string(),
            fallback_body: "Chat updated".to_string(),
            icon_url: "icon128.png".to_string(),
            message_max_chars: 120,
        }
    }
}

/// Title-change debounce state machine over the status store.
///
/// ```text
/// any      --title change-->  updating   (restart settle timer)
/// any      --mark waiting-->  waiting    (cancel settle timer)
/// updating --settle, quiet--> ready      (notify once)
/// ```
pub struct Tracker {
    store: StatusStore,
    settings: TrackerSettings,
    clock: Box<dyn Clock>,
    scheduler: Box<dyn SettleScheduler>,
    notifier: Box<dyn Notifier>,
}

impl Tracker {
    pub fn new(
        settings: TrackerSettings,
        clock: Box<dyn Clock>,
        scheduler: Box<dyn SettleScheduler>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            store: StatusStore::new(),
            settings,
            clock,
            scheduler,
            notifier,
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &StatusStore {
        &self.store
    }

    #[cfg(test)]
    pub fn status(&self, tab_id: TabId) -> Option<TabStatus> {
        self.store.get(tab_id).map(|r| r.status)
    }

    /// Look up a record, creating an idle one for unseen tabs
    pub fn record(&mut self, tab_id: TabId) -> &TabStatusRecord {
        self.store.ensure(tab_id)
    }

    /// A tab's title changed: go to updating and restart the settle timer
    pub fn observe_title(&mut self, tab_id: TabId, title: &str) {
        let now = self.clock.now();
        let instant = self.clock.instant();
        let record = self.store.ensure(tab_id);

        record.status = TabStatus::Updating;
        record.last_title = title.to_string();
        record.last_title_change = Some(now);
        record.quiet_since = Some(instant);

        if let Some(previous) = record.pending_settle.take() {
            self.scheduler.cancel(previous);
        }
        record.pending_settle = Some(self.scheduler.schedule(tab_id, self.settings.settle_window));

        debug!(tab = %tab_id, title, "Title changed, settle timer restarted");
    }

    /// The user signalled they are awaiting a response
    pub fn mark_waiting(&mut self, tab_id: TabId) {
        let now = self.clock.now();
        let record = self.store.ensure(tab_id);

        if let Some(pending) = record.pending_settle.take() {
            self.scheduler.cancel(pending);
        }
        record.status = TabStatus::Waiting;
        record.last_title_change = Some(now);
        record.quiet_since = Some(self.clock.instant());

        debug!(tab = %tab_id, "Marked waiting");
    }

    /// Settle timer fired: promote to ready once the title has been quiet
    pub fn on_settle_due(&mut self, tab_id: TabId, timer: TimerId) {
        let now = self.clock.now();
        let instant = self.clock.instant();

        let Some(record) = self.store.get_mut(tab_id) else {
            debug!(tab = %tab_id, "Settle timer fired for untracked tab");
            return;
        };
        if record.pending_settle != Some(timer) {
            debug!(tab = %tab_id, ?timer, "Ignoring superseded settle timer");
            return;
        }
        record.pending_settle = None;
        // Releases the scheduler's bookkeeping for the fired timer
        self.scheduler.cancel(timer);

        if record.status != TabStatus::Updating {
            return;
        }

        let elapsed = record
            .quiet_since
            .map(|at| instant.saturating_duration_since(at))
            .unwrap_or(self.settings.quiet_threshold);
        if elapsed < self.settings.quiet_threshold {
            let remaining = self.settings.quiet_threshold - elapsed;
            record.pending_settle = Some(self.scheduler.schedule(tab_id, remaining));
            debug!(tab = %tab_id, ?remaining, "Title not quiet yet, rechecking");
            return;
        }

        record.status = TabStatus::Ready;
        let body = if record.last_title.is_empty() {
            self.settings.fallback_body.as_str()
        } else {
            record.last_title.as_str()
        };
        let notification = Notification::for_tab(
            tab_id,
            now,
            &self.settings.notification_title,
            body,
            &self.settings.icon_url,
            self.settings.message_max_chars,
        );

        info!(tab = %tab_id, title = %record.last_title, "Chat settled");
        self.notifier.notify(notification);
    }

    /// Drop a closed tab's record and any pending settle timer
    pub fn forget(&mut self, tab_id: TabId) {
        if let Some(record) = self.store.remove(tab_id) {
            if let Some(pending) = record.pending_settle {
                self.scheduler.cancel(pending);
            }
            debug!(tab = %tab_id, "Record removed");
        }
    }

    /// Forget every tracked tab for which `keep` returns false
    pub fn retain(&mut self, keep: impl Fn(TabId) -> bool) {
        for tab_id in self.store.tab_ids() {
            if !keep(tab_id) {
                self.forget(tab_id);
            }
        }
    }
}
