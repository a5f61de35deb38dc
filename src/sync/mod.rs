//! Realtime sync layer
//!
//! Each signed-in session mirrors the tracked collections. One subscription
//! task per collection replaces the mirrored result set on every snapshot;
//! the three public-site collections are additionally fed to the
//! [`SubmissionMonitor`].

pub mod monitor;

use std::{collections::HashMap, sync::Arc, time::Duration};

use serde::de::DeserializeOwned;
use tokio::{
    sync::{watch, Mutex, RwLock},
    task::JoinHandle,
};

use crate::{
    error::{AppError, AppResult},
    models::{
        contact::CONTACTS,
        document::{CollectionQuery, Direction, Document},
        inventory::INVENTORY,
        log_entry::ACTIVITY_LOGS,
        rental::RENTALS,
        repair::REPAIRS,
        sale::SALES,
        submission::{SubmissionKind, CONTACT_SUBMISSIONS, RENTAL_AGREEMENTS, REPAIR_REQUESTS},
        user::USERS,
        vendor::VENDORS,
    },
    repository::{subscribe, SharedStore},
};

pub use monitor::SubmissionMonitor;

/// How long a read waits for a collection's first snapshot
const FIRST_SNAPSHOT_WAIT: Duration = Duration::from_secs(5);

/// A collection mirrored into every session, with its live ordering
#[derive(Debug, Clone, Copy)]
pub struct TrackedCollection {
    pub name: &'static str,
    pub order_by: &'static str,
    pub direction: Direction,
}

impl TrackedCollection {
    const fn new(name: &'static str, order_by: &'static str, direction: Direction) -> Self {
        Self {
            name,
            order_by,
            direction,
        }
    }

    pub fn query(&self) -> CollectionQuery {
        CollectionQuery::new(self.name, self.order_by, self.direction)
    }
}

pub const TRACKED_COLLECTIONS: [TrackedCollection; 11] = [
    TrackedCollection::new(USERS, "name", Direction::Asc),
    TrackedCollection::new(CONTACTS, "createdAt", Direction::Desc),
    TrackedCollection::new(RENTALS, "startDate", Direction::Desc),
    TrackedCollection::new(REPAIRS, "reportedDate", Direction::Desc),
    TrackedCollection::new(INVENTORY, "purchaseDate", Direction::Desc),
    TrackedCollection::new(SALES, "saleDate", Direction::Desc),
    TrackedCollection::new(VENDORS, "vendorName", Direction::Asc),
    TrackedCollection::new(ACTIVITY_LOGS, "timestamp", Direction::Desc),
    TrackedCollection::new(CONTACT_SUBMISSIONS, "timestamp", Direction::Desc),
    TrackedCollection::new(RENTAL_AGREEMENTS, "timestamp", Direction::Desc),
    TrackedCollection::new(REPAIR_REQUESTS, "submissionDate", Direction::Desc),
];

struct MirrorInner {
    collections: RwLock<HashMap<&'static str, Vec<Document>>>,
    revision: watch::Sender<u64>,
}

/// Session-local copy of the tracked collections
#[derive(Clone)]
pub struct Mirror {
    inner: Arc<MirrorInner>,
}

impl Mirror {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(MirrorInner {
                collections: RwLock::new(HashMap::new()),
                revision,
            }),
        }
    }

    /// Replace a collection with a fresh snapshot
    pub async fn replace(&self, collection: &'static str, documents: Vec<Document>) {
        self.inner.collections.write().await.insert(collection, documents);
        self.inner.revision.send_modify(|r| *r += 1);
    }

    pub async fn clear(&self) {
        self.inner.collections.write().await.clear();
        self.inner.revision.send_modify(|r| *r += 1);
    }

    /// Revision counter bumped on every change
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    pub async fn is_loaded(&self, collection: &str) -> bool {
        self.inner.collections.read().await.contains_key(collection)
    }

    /// Wait (bounded) for a collection's first snapshot
    pub async fn loaded(&self, collection: &str) {
        let mut changes = self.changes();
        let wait = async {
            while !self.is_loaded(collection).await {
                if changes.changed().await.is_err() {
                    break;
                }
            }
        };
        if tokio::time::timeout(FIRST_SNAPSHOT_WAIT, wait).await.is_err() {
            tracing::warn!("Collection {} not loaded yet", collection);
        }
    }

    /// Raw documents in live order
    pub async fn documents(&self, collection: &str) -> Vec<Document> {
        self.loaded(collection).await;
        self.inner
            .collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Typed entities in live order; undecodable documents are skipped
    pub async fn list<T: DeserializeOwned>(&self, collection: &str) -> Vec<T> {
        self.documents(collection)
            .await
            .iter()
            .filter_map(|document| match document.to_entity::<T>() {
                Ok(entity) => Some(entity),
                Err(e) => {
                    tracing::warn!("Skipping {}/{}: {}", collection, document.id, e);
                    None
                }
            })
            .collect()
    }

    pub async fn find(&self, collection: &str, id: &str) -> Option<Document> {
        self.documents(collection)
            .await
            .into_iter()
            .find(|document| document.id == id)
    }

    pub async fn get<T: DeserializeOwned>(&self, collection: &str, id: &str) -> AppResult<T> {
        self.find(collection, id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", collection, id)))?
            .to_entity()
    }
}

impl Default for Mirror {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the subscription tasks of one session
pub struct SyncEngine {
    store: SharedStore,
    mirror: Mirror,
    monitor: SubmissionMonitor,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl SyncEngine {
    pub fn new(store: SharedStore, mirror: Mirror, monitor: SubmissionMonitor) -> Self {
        Self {
            store,
            mirror,
            monitor,
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }

    pub fn monitor(&self) -> &SubmissionMonitor {
        &self.monitor
    }

    /// Open one subscription per tracked collection
    pub async fn start(&self) {
        self.stop().await;

        let mut tasks = self.tasks.lock().await;
        for tracked in TRACKED_COLLECTIONS {
            let mut subscription = subscribe(&self.store, tracked.query());
            let mirror = self.mirror.clone();
            let monitor = self.monitor.clone();
            let kind = SubmissionKind::from_collection(tracked.name);

            tasks.push(tokio::spawn(async move {
                loop {
                    match subscription.next().await {
                        Ok(snapshot) => {
                            if let Some(kind) = kind {
                                monitor.observe(kind, &snapshot).await;
                            }
                            mirror.replace(tracked.name, snapshot.documents).await;
                        }
                        Err(e) => {
                            tracing::error!("Subscription on {} stopped: {}", tracked.name, e);
                            break;
                        }
                    }
                }
            }));
        }
        tracing::debug!("Started {} subscriptions", tasks.len());
    }

    /// Abort every subscription and clear the mirror
    pub async fn stop(&self) {
        for task in self.tasks.lock().await.drain(..) {
            task.abort();
        }
        self.mirror.clear().await;
        self.monitor.reset().await;
    }
}

impl Drop for SyncEngine {
    fn drop(&mut self) {
        for task in self.tasks.get_mut().drain(..) {
            task.abort();
        }
    }
}
