//! Document store layer
//!
//! Every entity lives in a named collection of JSON documents. The
//! [`DocumentStore`] trait is implemented by an in-process store and by a
//! PostgreSQL JSONB store; both publish a change feed that live
//! [`Subscription`]s are built on.

pub mod memory;
pub mod postgres;
pub mod subscription;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::{
    error::AppResult,
    models::document::{CollectionQuery, Document, DocumentData, StoreEvent},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use subscription::Subscription;

/// Capacity of the change feed shared by all subscribers
pub const EVENT_CAPACITY: usize = 1024;

/// Collection-oriented document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Get one document, `None` when absent
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>>;

    /// Whole collection in query order
    async fn list(&self, query: &CollectionQuery) -> AppResult<Vec<Document>>;

    /// Insert a document under a freshly generated id
    async fn insert(&self, collection: &str, data: DocumentData) -> AppResult<Document>;

    /// Create or replace a document under a known id
    async fn set(&self, collection: &str, id: &str, data: DocumentData) -> AppResult<Document>;

    /// Merge fields into an existing document
    async fn update(&self, collection: &str, id: &str, data: DocumentData) -> AppResult<Document>;

    /// Delete a document; deleting a missing document is not an error
    async fn delete(&self, collection: &str, id: &str) -> AppResult<()>;

    /// Receiver on the store-wide change feed
    fn events(&self) -> broadcast::Receiver<StoreEvent>;
}

pub type SharedStore = Arc<dyn DocumentStore>;

/// Open a live subscription on a collection
pub fn subscribe(store: &SharedStore, query: CollectionQuery) -> Subscription {
    Subscription::new(store.clone(), query)
}

/// Fresh document id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
