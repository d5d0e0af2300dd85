use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::TabId;
use crate::actions::Action;

/// Handle to a scheduled settle check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Time source for the tracker.
///
/// `now` stamps records for display; `instant` is the monotonic clock the
/// quiet check measures against, the same one settle timers sleep on.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
    fn instant(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }
}

/// Schedule/cancel capability for settle checks.
///
/// When a timer fires, the owner of the tracker must route it back into
/// [`super::Tracker::on_settle_due`] with the same tab and timer id.
pub trait SettleScheduler {
    fn schedule(&mut self, tab_id: TabId, delay: Duration) -> TimerId;
    /// Cancel a timer. Unknown or already-fired ids are ignored.
    fn cancel(&mut self, timer: TimerId);
}

/// Runs each settle check as a sleeping tokio task that reports back
/// through the action channel.
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<Action>,
    next_id: u64,
    tasks: HashMap<TimerId, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            tx,
            next_id: 0,
            tasks: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.tasks.values().filter(|h| !h.is_finished()).count()
    }
}

impl SettleScheduler for TokioScheduler {
    fn schedule(&mut self, tab_id: TabId, delay: Duration) -> TimerId {
        self.next_id += 1;
        let timer = TimerId(self.next_id);

        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Action::SettleDue { tab_id, timer });
        });
        self.tasks.insert(timer, handle);

        timer
    }

    fn cancel(&mut self, timer: TimerId) {
        if let Some(handle) = self.tasks.remove(&timer) {
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_timer_fires_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx);

        let start = tokio::time::Instant::now();
        let timer = scheduler.schedule(TabId(4), Duration::from_millis(2000));

        match rx.recv().await {
            Some(Action::SettleDue { tab_id, timer: fired }) => {
                assert_eq!(tab_id, TabId(4));
                assert_eq!(fired, timer);
            }
            other => panic!("unexpected action: {:?}", other),
        }
        assert!(start.elapsed() >= Duration::from_millis(2000));
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_cancelled_timer_never_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx);

        let timer = scheduler.schedule(TabId(4), Duration::from_millis(2000));
        scheduler.cancel(timer);
        assert_eq!(scheduler.pending(), 0);

        let result = tokio::time::timeout(Duration::from_secs(10), rx.recv()).await;
        assert!(result.is_err(), "cancelled timer delivered {:?}", result);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_timer_ids_are_unique() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx);

        let a = scheduler.schedule(TabId(1), Duration::from_millis(10));
        let b = scheduler.schedule(TabId(1), Duration::from_millis(10));
        assert_ne!(a, b);
        assert_eq!(scheduler.pending(), 2);
    }
}
