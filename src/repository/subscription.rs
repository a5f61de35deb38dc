//! Live collection subscriptions

use std::collections::HashMap;

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::broadcast::Receiver;

use super::SharedStore;
use crate::{
    error::{AppError, AppResult},
    models::document::{
        ChangeKind, CollectionQuery, Document, DocumentChange, Snapshot, StoreEvent,
    },
};

/// Live view of one ordered collection.
///
/// The change feed is attached before the first listing, so no write can
/// slip between the initial snapshot and the first event.
pub struct Subscription {
    store: SharedStore,
    query: CollectionQuery,
    events: Receiver<StoreEvent>,
    known: Option<HashMap<String, Document>>,
}

impl Subscription {
    pub fn new(store: SharedStore, query: CollectionQuery) -> Self {
        let events = store.events();
        Self {
            store,
            query,
            events,
            known: None,
        }
    }

    pub fn query(&self) -> &CollectionQuery {
        &self.query
    }

    /// Wait for the next snapshot. The first one lists every document as added.
    pub async fn next(&mut self) -> AppResult<Snapshot> {
        if self.known.is_none() {
            let documents = self.store.list(&self.query).await?;
            let changes = documents
                .iter()
                .map(|document| DocumentChange {
                    kind: ChangeKind::Added,
                    document: document.clone(),
                })
                .collect();
            self.known = Some(index(&documents));
            return Ok(Snapshot { documents, changes });
        }

        loop {
            let mut touched: Vec<String> = Vec::new();
            let mut resync = false;

            match self.events.recv().await {
                Ok(event) => self.note(event, &mut touched),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        "Subscription on {} lagged by {} events, resyncing",
                        self.query.collection,
                        skipped
                    );
                    resync = true;
                }
                Err(RecvError::Closed) => {
                    return Err(AppError::Store("Change feed closed".to_string()));
                }
            }

            loop {
                match self.events.try_recv() {
                    Ok(event) => self.note(event, &mut touched),
                    Err(TryRecvError::Lagged(_)) => resync = true,
                    Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                }
            }

            if touched.is_empty() && !resync {
                continue;
            }

            let documents = self.store.list(&self.query).await?;
            let current = index(&documents);
            let known = self.known.take().unwrap_or_default();

            let changes = if resync {
                diff_all(&known, &current, &documents)
            } else {
                diff_touched(&known, &current, &touched)
            };
            self.known = Some(current);

            if !changes.is_empty() {
                return Ok(Snapshot { documents, changes });
            }
        }
    }

    fn note(&self, event: StoreEvent, touched: &mut Vec<String>) {
        if event.collection == self.query.collection && !touched.contains(&event.id) {
            touched.push(event.id);
        }
    }
}

fn index(documents: &[Document]) -> HashMap<String, Document> {
    documents
        .iter()
        .map(|document| (document.id.clone(), document.clone()))
        .collect()
}

// Net change per touched id, in first-event order
fn diff_touched(
    known: &HashMap<String, Document>,
    current: &HashMap<String, Document>,
    touched: &[String],
) -> Vec<DocumentChange> {
    touched
        .iter()
        .filter_map(|id| match (known.get(id), current.get(id)) {
            (Some(old), None) => Some(DocumentChange {
                kind: ChangeKind::Removed,
                document: old.clone(),
            }),
            (None, Some(new)) => Some(DocumentChange {
                kind: ChangeKind::Added,
                document: new.clone(),
            }),
            (Some(_), Some(new)) => Some(DocumentChange {
                kind: ChangeKind::Modified,
                document: new.clone(),
            }),
            (None, None) => None,
        })
        .collect()
}

// Full comparison after missed events: removals first, then result order
fn diff_all(
    known: &HashMap<String, Document>,
    current: &HashMap<String, Document>,
    documents: &[Document],
) -> Vec<DocumentChange> {
    let mut removed: Vec<&Document> = known
        .values()
        .filter(|old| !current.contains_key(&old.id))
        .collect();
    removed.sort_by(|a, b| a.id.cmp(&b.id));

    let mut changes: Vec<DocumentChange> = removed
        .into_iter()
        .map(|old| DocumentChange {
            kind: ChangeKind::Removed,
            document: old.clone(),
        })
        .collect();

    for document in documents {
        match known.get(&document.id) {
            None => changes.push(DocumentChange {
                kind: ChangeKind::Added,
                document: document.clone(),
            }),
            Some(old) if old.data != document.data => changes.push(DocumentChange {
                kind: ChangeKind::Modified,
                document: document.clone(),
            }),
            Some(_) => {}
        }
    }
    changes
}
