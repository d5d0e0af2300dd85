use tracing::{debug, warn};

use crate::error::HostError;
use crate::host::{ChatHostPattern, TabHost};
use crate::protocol::{Command, MessageSender, Response, TabSummary};
use crate::tracker::{TabId, Tracker};

/// Read/update entry points consumed by the presentation layer
pub struct CommandSurface {
    pattern: ChatHostPattern,
    placeholder_title: String,
}

impl CommandSurface {
    pub fn new(pattern: ChatHostPattern, placeholder_title: impl Into<String>) -> Self {
        Self {
            pattern,
            placeholder_title: placeholder_title.into(),
        }
    }

    pub fn pattern(&self) -> &ChatHostPattern {
        &self.pattern
    }

    /// Dispatch one command to its handler
    pub fn handle<H: TabHost>(
        &self,
        command: Command,
        sender: Option<&MessageSender>,
        tracker: &mut Tracker,
        host: &mut H,
    ) -> Response {
        debug!(?command, "Handling command");
        match command {
            Command::ListTabs => Response::tabs(self.list_tabs(tracker, host)),
            Command::FocusTab { tab_id } => match self.focus_tab(host, tab_id) {
                Ok(()) => Response::ack(),
                Err(e) => {
                    warn!(tab = %tab_id, error = %e, "Focus failed");
                    Response::failed(e.to_string())
                }
            },
            Command::MarkWaiting { tab_id } => {
                self.mark_waiting(tracker, tab_id);
                Response::ack()
            }
            Command::Whoami => Response::caller(self.identify_caller(sender)),
        }
    }

    /// Every chat tab with its current status, creating missing records
    pub fn list_tabs<H: TabHost>(&self, tracker: &mut Tracker, host: &H) -> Vec<TabSummary> {
        host.query_tabs()
            .into_iter()
            .filter(|tab| self.pattern.matches_tab(tab))
            .map(|tab| {
                let record = tracker.record(tab.id);
                let title = match tab.title {
                    Some(title) if !title.is_empty() => title,
                    _ => self.placeholder_title.clone(),
                };
                TabSummary {
                    id: tab.id,
                    title,
                    url: tab.url.unwrap_or_default(),
                    window_id: tab.window_id,
                    status: record.status,
                    last_title_change: record.last_title_change,
                }
            })
            .collect()
    }

    /// Raise the tab's window, then activate the tab
    pub fn focus_tab<H: TabHost>(&self, host: &mut H, tab_id: TabId) -> Result<(), HostError> {
        let tab = host.get_tab(tab_id)?;
        host.focus_window(tab.window_id)?;
        host.activate_tab(tab_id)
    }

    pub fn mark_waiting(&self, tracker: &mut Tracker, tab_id: TabId) {
        tracker.mark_waiting(tab_id);
    }

    /// The tab the request came from, if any
    pub fn identify_caller(&self, sender: Option<&MessageSender>) -> Option<TabId> {
        sender.and_then(MessageSender::tab_id)
    }
}

impl Default for CommandSurface {
    fn default() -> Self {
        Self::new(ChatHostPattern::default(), "(new chat)")
    }
}
