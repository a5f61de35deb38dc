//! Per-session toast notifications

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex};
use utoipa::ToSchema;

/// Toasts kept for polling clients; older ones are dropped first
const QUEUE_LIMIT: usize = 100;
const STREAM_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Toast {
    pub id: u64,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ToastKind,
}

struct Inner {
    next_id: AtomicU64,
    queue: Mutex<VecDeque<Toast>>,
    stream: broadcast::Sender<Toast>,
}

/// Toast queue plus a live stream of every pushed toast
#[derive(Clone)]
pub struct ToastCenter {
    inner: Arc<Inner>,
}

impl ToastCenter {
    pub fn new() -> Self {
        let (stream, _) = broadcast::channel(STREAM_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                next_id: AtomicU64::new(0),
                queue: Mutex::new(VecDeque::new()),
                stream,
            }),
        }
    }

    pub async fn push(&self, title: impl Into<String>, message: impl Into<String>, kind: ToastKind) -> Toast {
        let toast = Toast {
            id: self.inner.next_id.fetch_add(1, Ordering::SeqCst),
            title: title.into(),
            message: message.into(),
            kind,
        };
        tracing::debug!(toast_id = toast.id, title = %toast.title, "Toast queued");

        {
            let mut queue = self.inner.queue.lock().await;
            if queue.len() == QUEUE_LIMIT {
                queue.pop_front();
            }
            queue.push_back(toast.clone());
        }
        let _ = self.inner.stream.send(toast.clone());
        toast
    }

    pub async fn success(&self, title: impl Into<String>, message: impl Into<String>) -> Toast {
        self.push(title, message, ToastKind::Success).await
    }

    pub async fn info(&self, title: impl Into<String>, message: impl Into<String>) -> Toast {
        self.push(title, message, ToastKind::Info).await
    }

    pub async fn error(&self, title: impl Into<String>, message: impl Into<String>) -> Toast {
        self.push(title, message, ToastKind::Error).await
    }

    /// Toasts not yet dismissed, oldest first
    pub async fn list(&self) -> Vec<Toast> {
        self.inner.queue.lock().await.iter().cloned().collect()
    }

    /// Remove one toast; returns whether it was still queued
    pub async fn dismiss(&self, id: u64) -> bool {
        let mut queue = self.inner.queue.lock().await;
        let before = queue.len();
        queue.retain(|toast| toast.id != id);
        queue.len() != before
    }

    /// Take every queued toast
    pub async fn drain(&self) -> Vec<Toast> {
        self.inner.queue.lock().await.drain(..).collect()
    }

    pub fn stream(&self) -> broadcast::Receiver<Toast> {
        self.inner.stream.subscribe()
    }
}

impl Default for ToastCenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ids_increase_and_dismiss() {
        let toasts = ToastCenter::new();
        let a = toasts.info("A", "first").await;
        let b = toasts.error("B", "second").await;
        assert!(b.id > a.id);

        assert!(toasts.dismiss(a.id).await);
        assert!(!toasts.dismiss(a.id).await);
        assert_eq!(toasts.list().await, vec![b.clone()]);
        assert_eq!(toasts.drain().await, vec![b]);
        assert!(toasts.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_stream_receives_pushed_toasts() {
        let toasts = ToastCenter::new();
        let mut stream = toasts.stream();
        toasts.success("Saved", "ok").await;
        let received = stream.recv().await.unwrap();
        assert_eq!(received.title, "Saved");
        assert_eq!(received.kind, ToastKind::Success);
    }

    #[tokio::test]
    async fn test_queue_is_bounded() {
        let toasts = ToastCenter::new();
        for i in 0..(QUEUE_LIMIT + 5) {
            toasts.info("n", i.to_string()).await;
        }
        let queued = toasts.list().await;
        assert_eq!(queued.len(), QUEUE_LIMIT);
        assert_eq!(queued[0].message, "5");
    }

    #[test]
    fn test_wire_format() {
        let toast = Toast {
            id: 3,
            title: "Error".into(),
            message: "x".into(),
            kind: ToastKind::Error,
        };
        let json = serde_json::to_value(&toast).unwrap();
        assert_eq!(json["type"], "error");
    }
}
