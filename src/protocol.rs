//! Newline-delimited JSON messages exchanged with the browser host bridge.
//!
//! Every message is one JSON object per line with a `type` tag. Lines that
//! do not decode into a known shape are dropped without a reply.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::host::{TabInfo, WindowId};
use crate::tracker::{Notification, TabId, TabStatus};

/// Messages from the host bridge
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Inbound {
    /// Tab metadata changed
    #[serde(rename_all = "camelCase")]
    TabUpdated {
        tab_id: TabId,
        #[serde(default)]
        change_info: ChangeInfo,
        tab: TabInfo,
    },
    /// Tab closed
    #[serde(rename_all = "camelCase")]
    TabRemoved { tab_id: TabId },
    /// Full enumeration of the host's tabs
    TabsSnapshot { tabs: Vec<TabInfo> },
    /// Command request from a popup or content script
    #[serde(rename_all = "camelCase")]
    Message {
        #[serde(default)]
        request_id: Option<String>,
        #[serde(default)]
        sender: Option<MessageSender>,
        message: Value,
    },
}

/// Which tab properties changed in a `TAB_UPDATED` event
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ChangeInfo {
    #[serde(default)]
    title: Option<Value>,
}

impl ChangeInfo {
    #[cfg(test)]
    pub fn with_title(title: &str) -> Self {
        Self {
            title: Some(Value::String(title.to_string())),
        }
    }

    /// The new title, only when the host reported it as a string
    pub fn title(&self) -> Option<&str> {
        self.title.as_ref().and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct MessageSender {
    #[serde(default)]
    pub tab: Option<SenderTab>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SenderTab {
    #[serde(default)]
    pub id: Option<TabId>,
}

impl MessageSender {
    #[cfg(test)]
    pub fn from_tab(tab_id: TabId) -> Self {
        Self {
            tab: Some(SenderTab { id: Some(tab_id) }),
        }
    }

    pub fn tab_id(&self) -> Option<TabId> {
        self.tab.as_ref().and_then(|tab| tab.id)
    }
}

/// The closed command set of the query/command surface
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    ListTabs,
    #[serde(rename_all = "camelCase")]
    FocusTab { tab_id: TabId },
    #[serde(rename_all = "camelCase")]
    MarkWaiting { tab_id: TabId },
    Whoami,
}

impl Command {
    pub fn parse(message: &Value) -> Option<Self> {
        match Command::deserialize(message) {
            Ok(command) => Some(command),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unrecognized command");
                None
            }
        }
    }
}

/// Messages to the host bridge
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outbound {
    Response(Response),
    /// Show a desktop notification
    Notify(Notification),
    #[serde(rename_all = "camelCase")]
    FocusWindow { window_id: WindowId },
    #[serde(rename_all = "camelCase")]
    ActivateTab { tab_id: TabId },
}

/// Reply to a command request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tabs: Option<Vec<TabSummary>>,
    /// Present for `WHOAMI`, null when the caller has no tab
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<Option<TabId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn ack() -> Self {
        Self {
            request_id: None,
            ok: true,
            tabs: None,
            tab_id: None,
            error: None,
        }
    }

    pub fn tabs(tabs: Vec<TabSummary>) -> Self {
        Self {
            tabs: Some(tabs),
            ..Self::ack()
        }
    }

    pub fn caller(tab_id: Option<TabId>) -> Self {
        Self {
            tab_id: Some(tab_id),
            ..Self::ack()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            ..Self::ack()
        }
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}

/// One row of the `LIST_TABS` reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSummary {
    pub id: TabId,
    pub title: String,
    pub url: String,
    pub window_id: WindowId,
    pub status: TabStatus,
    #[serde(serialize_with = "chrono::serde::ts_milliseconds_option::serialize")]
    pub last_title_change: Option<DateTime<Utc>>,
}

/// Decode one inbound line. Unknown or malformed input yields `None`.
pub fn decode(line: &str) -> Option<Inbound> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(inbound) => Some(inbound),
        Err(e) => {
            tracing::debug!(error = %e, "Dropping malformed inbound line");
            None
        }
    }
}

pub fn encode(message: &Outbound) -> serde_json::Result<String> {
    serde_json::to_string(message)
}
