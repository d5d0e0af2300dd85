use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::TabId;
use crate::protocol::Outbound;

/// A "show notification" effect for a tab that settled into ready
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub notification_id: String,
    pub title: String,
    pub message: String,
    pub icon_url: String,
}

impl Notification {
    pub fn for_tab(
        tab_id: TabId,
        at: DateTime<Utc>,
        title: &str,
        body: &str,
        icon_url: &str,
        max_chars: usize,
    ) -> Self {
        Self {
            notification_id: format!("chat-{}-{}", tab_id, at.timestamp_millis()),
            title: title.to_string(),
            message: truncate_chars(body, max_chars),
            icon_url: icon_url.to_string(),
        }
    }
}

/// Delivers notifications. Delivery is best-effort.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Forwards notifications to the outbound host channel
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Outbound>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::UnboundedSender<Outbound>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&mut self, notification: Notification) {
        if self.tx.send(Outbound::Notify(notification)).is_err() {
            tracing::warn!("Outbound channel closed, notification dropped");
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
