use anyhow::{Context, Result};
use std::future::Future;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::actions::Action;
use crate::host::{BridgeHost, TabHost};
use crate::protocol::{Command, Inbound, Outbound};
use crate::surface::CommandSurface;
use crate::tracker::Tracker;

/// Main application state. Sole owner of the status store and tab
/// directory; every mutation goes through [`App::handle_action`].
pub struct App {
    tracker: Tracker,
    host: BridgeHost,
    surface: CommandSurface,
    outbound: mpsc::UnboundedSender<Outbound>,
}

impl App {
    pub fn new(
        tracker: Tracker,
        host: BridgeHost,
        surface: CommandSurface,
        outbound: mpsc::UnboundedSender<Outbound>,
    ) -> Self {
        Self {
            tracker,
            host,
            surface,
            outbound,
        }
    }

    #[cfg(test)]
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Drive actions until a quit action, an error, or `shutdown` completes
    pub async fn run(
        mut self,
        mut rx: mpsc::UnboundedReceiver<Action>,
        shutdown: impl Future<Output = ()>,
    ) -> Result<()> {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                Some(action) = rx.recv() => {
                    if self.handle_action(action)? {
                        return Ok(());
                    }
                }
                _ = &mut shutdown => {
                    tracing::info!("Shutting down");
                    return Ok(());
                }
            }
        }
    }

    /// Handle an action and return whether to quit
    pub fn handle_action(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::Inbound(message) => self.handle_inbound(message)?,
            Action::SettleDue { tab_id, timer } => {
                self.tracker.on_settle_due(tab_id, timer);
            }
            Action::Error(msg) => warn!("{}", msg),
            Action::Quit => return Ok(true),
        }
        Ok(false)
    }

    fn handle_inbound(&mut self, message: Inbound) -> Result<()> {
        match message {
            Inbound::TabUpdated {
                tab_id,
                change_info,
                tab,
            } => {
                if tab.id != tab_id {
                    debug!(
                        event = %tab_id,
                        metadata = %tab.id,
                        "Ignoring update with mismatched tab ids"
                    );
                    return Ok(());
                }
                let is_chat = self.surface.pattern().matches_tab(&tab);
                self.host.upsert(tab);

                if !is_chat {
                    // Navigated away from the chat host
                    self.tracker.forget(tab_id);
                    return Ok(());
                }
                if let Some(title) = change_info.title() {
                    self.tracker.observe_title(tab_id, title);
                }
            }
            Inbound::TabRemoved { tab_id } => {
                self.host.remove(tab_id);
                self.tracker.forget(tab_id);
            }
            Inbound::TabsSnapshot { tabs } => {
                debug!(count = tabs.len(), "Tab snapshot received");
                self.host.replace_all(tabs);

                let host = &self.host;
                let pattern = self.surface.pattern();
                self.tracker.retain(|tab_id| {
                    host.get_tab(tab_id)
                        .map(|tab| pattern.matches_tab(&tab))
                        .unwrap_or(false)
                });
            }
            Inbound::Message {
                request_id,
                sender,
                message,
            } => {
                let Some(command) = Command::parse(&message) else {
                    return Ok(());
                };
                let response = self
                    .surface
                    .handle(command, sender.as_ref(), &mut self.tracker, &mut self.host)
                    .with_request_id(request_id);
                self.outbound
                    .send(Outbound::Response(response))
                    .context("Outbound channel closed")?;
            }
        }
        Ok(())
    }
}
