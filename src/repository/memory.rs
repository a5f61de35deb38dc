//! In-process document store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

use super::{new_id, DocumentStore, EVENT_CAPACITY};
use crate::{
    error::{AppError, AppResult},
    models::document::{ChangeKind, CollectionQuery, Document, DocumentData, StoreEvent},
};

type Collection = HashMap<String, DocumentData>;

/// Document store kept in memory, used for development and tests
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
    events: broadcast::Sender<StoreEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            collections: RwLock::new(HashMap::new()),
            events,
        }
    }

    fn publish(&self, collection: &str, id: &str, kind: ChangeKind) {
        // No receiver is fine
        let _ = self.events.send(StoreEvent {
            collection: collection.to_string(),
            id: id.to_string(),
            kind,
        });
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document::new(id, data.clone())))
    }

    async fn list(&self, query: &CollectionQuery) -> AppResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut documents: Vec<Document> = collections
            .get(&query.collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Document::new(id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default();
        documents.sort_by(|a, b| query.compare(a, b));
        Ok(documents)
    }

    async fn insert(&self, collection: &str, data: DocumentData) -> AppResult<Document> {
        let id = new_id();
        {
            let mut collections = self.collections.write().await;
            collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.clone(), data.clone());
        }
        self.publish(collection, &id, ChangeKind::Added);
        Ok(Document::new(id, data))
    }

    async fn set(&self, collection: &str, id: &str, data: DocumentData) -> AppResult<Document> {
        let existed = {
            let mut collections = self.collections.write().await;
            collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.to_string(), data.clone())
                .is_some()
        };
        let kind = if existed { ChangeKind::Modified } else { ChangeKind::Added };
        self.publish(collection, id, kind);
        Ok(Document::new(id, data))
    }

    async fn update(&self, collection: &str, id: &str, data: DocumentData) -> AppResult<Document> {
        let merged = {
            let mut collections = self.collections.write().await;
            let existing = collections
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| AppError::NotFound(format!("Document {}/{} not found", collection, id)))?;
            existing.extend(data);
            existing.clone()
        };
        self.publish(collection, id, ChangeKind::Modified);
        Ok(Document::new(id, merged))
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        let removed = {
            let mut collections = self.collections.write().await;
            collections
                .get_mut(collection)
                .and_then(|docs| docs.remove(id))
                .is_some()
        };
        if removed {
            self.publish(collection, id, ChangeKind::Removed);
        }
        Ok(())
    }

    fn events(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}
