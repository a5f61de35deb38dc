//! New-submission notifications for the public-site collections

use std::{collections::HashSet, sync::Arc};

use tokio::sync::Mutex;

use crate::{
    models::{
        document::{ChangeKind, Snapshot},
        submission::SubmissionKind,
    },
    session::toast::ToastCenter,
};

pub const NEW_SUBMISSION_TITLE: &str = "New Site Submission";

struct MonitorState {
    /// Collections still waiting for their first snapshot
    initial_load: HashSet<SubmissionKind>,
    /// Ids already announced this session
    notified: HashSet<String>,
}

impl MonitorState {
    fn fresh() -> Self {
        Self {
            initial_load: SubmissionKind::ALL.into_iter().collect(),
            notified: HashSet::new(),
        }
    }
}

/// Announces submissions that arrive after a session's first snapshot
#[derive(Clone)]
pub struct SubmissionMonitor {
    state: Arc<Mutex<MonitorState>>,
    toasts: ToastCenter,
}

impl SubmissionMonitor {
    pub fn new(toasts: ToastCenter) -> Self {
        Self {
            state: Arc::new(Mutex::new(MonitorState::fresh())),
            toasts,
        }
    }

    /// Back to the initial-load state with nothing announced
    pub async fn reset(&self) {
        *self.state.lock().await = MonitorState::fresh();
    }

    pub async fn observe(&self, kind: SubmissionKind, snapshot: &Snapshot) {
        let mut state = self.state.lock().await;
        if state.initial_load.remove(&kind) {
            return;
        }

        for change in snapshot.changes.iter().filter(|c| c.kind == ChangeKind::Added) {
            let document = &change.document;
            if !state.notified.insert(document.id.clone()) {
                continue;
            }
            let name = document
                .str_field(kind.name_field())
                .filter(|name| !name.is_empty())
                .unwrap_or("Unknown");
            tracing::info!("New {} submission {}", kind, document.id);
            self.toasts
                .success(NEW_SUBMISSION_TITLE, kind.arrival_message(name))
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{Document, DocumentChange};
    use crate::sync::tests::data;
    use serde_json::json;

    fn added(id: &str, name: &str) -> DocumentChange {
        DocumentChange {
            kind: ChangeKind::Added,
            document: Document::new(id, data(json!({ "customerName": name }))),
        }
    }

    fn snapshot(changes: Vec<DocumentChange>) -> Snapshot {
        Snapshot {
            documents: changes.iter().map(|c| c.document.clone()).collect(),
            changes,
        }
    }

    #[tokio::test]
    async fn test_initial_snapshot_is_silent() {
        let toasts = ToastCenter::new();
        let monitor = SubmissionMonitor::new(toasts.clone());

        monitor
            .observe(SubmissionKind::Repair, &snapshot(vec![added("old", "Ann")]))
            .await;
        assert!(toasts.list().await.is_empty());

        monitor
            .observe(SubmissionKind::Repair, &snapshot(vec![added("new", "Bo")]))
            .await;
        let queued = toasts.list().await;
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].title, NEW_SUBMISSION_TITLE);
        assert_eq!(queued[0].message, "Repair request from Bo");
    }

    #[tokio::test]
    async fn test_each_id_announced_once() {
        let toasts = ToastCenter::new();
        let monitor = SubmissionMonitor::new(toasts.clone());
        monitor.observe(SubmissionKind::Repair, &snapshot(vec![])).await;

        monitor.observe(SubmissionKind::Repair, &snapshot(vec![added("a", "")])).await;
        monitor.observe(SubmissionKind::Repair, &snapshot(vec![added("a", "")])).await;
        let queued = toasts.list().await;
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].message, "Repair request from Unknown");
    }

    #[tokio::test]
    async fn test_initial_load_is_per_collection() {
        let toasts = ToastCenter::new();
        let monitor = SubmissionMonitor::new(toasts.clone());
        monitor.observe(SubmissionKind::Contact, &snapshot(vec![])).await;

        // First repair snapshot is still the initial load
        monitor
            .observe(SubmissionKind::Repair, &snapshot(vec![added("r", "Cy")]))
            .await;
        assert!(toasts.list().await.is_empty());

        monitor.reset().await;
        monitor
            .observe(SubmissionKind::Contact, &snapshot(vec![added("c", "Di")]))
            .await;
        assert!(toasts.list().await.is_empty());
    }
}
