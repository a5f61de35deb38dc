//! Action dispatcher: loading indicator, minimum delay and error toasts

use std::{
    future::Future,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use super::toast::ToastCenter;
use crate::error::{AppError, AppResult};

pub const GENERIC_ERROR: &str = "An error occurred. Please try again.";

#[derive(Clone)]
pub struct ActionDispatcher {
    in_flight: Arc<AtomicUsize>,
    delay: Duration,
    toasts: ToastCenter,
}

struct InFlight(Arc<AtomicUsize>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ActionDispatcher {
    pub fn new(delay: Duration, toasts: ToastCenter) -> Self {
        Self {
            in_flight: Arc::new(AtomicUsize::new(0)),
            delay,
            toasts,
        }
    }

    /// True while at least one action is running
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Run one user action. Failures are toasted and handed back.
    pub async fn run<T, F>(&self, action: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlight(self.in_flight.clone());

        tokio::time::sleep(self.delay).await;

        match action.await {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!("Action failed: {}", e);
                let message = match &e {
                    AppError::Validation(msg) => msg.clone(),
                    _ => GENERIC_ERROR.to_string(),
                };
                self.toasts.error("Error", message).await;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::toast::ToastKind;

    #[tokio::test(start_paused = true)]
    async fn test_loading_flag_spans_delay_and_action() {
        let toasts = ToastCenter::new();
        let dispatcher = ActionDispatcher::new(Duration::from_millis(300), toasts.clone());
        assert!(!dispatcher.is_loading());

        let started = tokio::time::Instant::now();
        let task = {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move { dispatcher.run(async { Ok::<_, AppError>(7) }).await })
        };
        tokio::task::yield_now().await;
        assert!(dispatcher.is_loading());

        assert_eq!(task.await.unwrap().unwrap(), 7);
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert!(!dispatcher.is_loading());
        assert!(toasts.list().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_toasts_generic_error() {
        let toasts = ToastCenter::new();
        let dispatcher = ActionDispatcher::new(Duration::from_millis(300), toasts.clone());

        let result: AppResult<()> = dispatcher
            .run(async { Err(AppError::Store("boom".into())) })
            .await;
        assert!(matches!(result, Err(AppError::Store(_))));
        assert!(!dispatcher.is_loading());

        let queued = toasts.list().await;
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].title, "Error");
        assert_eq!(queued[0].message, GENERIC_ERROR);
        assert_eq!(queued[0].kind, ToastKind::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_validation_message_is_shown() {
        let toasts = ToastCenter::new();
        let dispatcher = ActionDispatcher::new(Duration::ZERO, toasts.clone());
        let _ = dispatcher
            .run(async { Err::<(), _>(AppError::Validation("Phone is required".into())) })
            .await;
        assert_eq!(toasts.list().await[0].message, "Phone is required");
    }
}
