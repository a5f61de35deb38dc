//! Inactivity auto sign-out

use std::{future::Future, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use tokio::{
    sync::Notify,
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use utoipa::ToSchema;

/// Client events that count as activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ActivityEvent {
    Mousemove,
    Mousedown,
    Keypress,
    Touchstart,
    Scroll,
}

pub struct InactivityTimer {
    activity: Arc<Notify>,
    task: JoinHandle<()>,
}

impl InactivityTimer {
    /// Start the timer; `on_expire` runs once after `timeout` without activity.
    ///
    /// The expiry callback runs in its own task, so it may stop this timer.
    pub fn start<F, Fut>(timeout: Duration, on_expire: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let activity = Arc::new(Notify::new());
        let notified = activity.clone();

        let task = tokio::spawn(async move {
            loop {
                let deadline = Instant::now() + timeout;
                tokio::select! {
                    _ = notified.notified() => continue,
                    _ = sleep_until(deadline) => break,
                }
            }
            tracing::info!("Session inactive for {:?}, signing out", timeout);
            tokio::spawn(on_expire());
        });

        Self { activity, task }
    }

    /// Reset the countdown
    pub fn touch(&self, event: ActivityEvent) {
        tracing::trace!(?event, "Activity");
        self.activity.notify_one();
    }

    pub fn stop(&self) {
        self.task.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for InactivityTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::time::advance;

    fn flag_timer(timeout: Duration) -> (InactivityTimer, Arc<AtomicBool>) {
        let expired = Arc::new(AtomicBool::new(false));
        let flag = expired.clone();
        let timer = InactivityTimer::start(timeout, move || async move {
            flag.store(true, Ordering::SeqCst);
        });
        (timer, expired)
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_expires_after_timeout() {
        let (_timer, expired) = flag_timer(Duration::from_secs(300));
        settle().await;

        advance(Duration::from_secs(299)).await;
        settle().await;
        assert!(!expired.load(Ordering::SeqCst));

        advance(Duration::from_secs(2)).await;
        settle().await;
        assert!(expired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_resets_countdown() {
        let (timer, expired) = flag_timer(Duration::from_secs(300));
        settle().await;

        advance(Duration::from_secs(200)).await;
        timer.touch(ActivityEvent::Keypress);
        settle().await;

        advance(Duration::from_secs(200)).await;
        settle().await;
        assert!(!expired.load(Ordering::SeqCst));

        advance(Duration::from_secs(101)).await;
        settle().await;
        assert!(expired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_timer_never_fires() {
        let (timer, expired) = flag_timer(Duration::from_secs(300));
        settle().await;
        timer.stop();

        advance(Duration::from_secs(600)).await;
        settle().await;
        assert!(!expired.load(Ordering::SeqCst));
    }

    #[test]
    fn test_event_names() {
        let event: ActivityEvent = serde_json::from_str("\"touchstart\"").unwrap();
        assert_eq!(event, ActivityEvent::Touchstart);
    }
}
