//! PostgreSQL document store
//!
//! Documents are rows of the `documents` table with a JSONB body. A trigger
//! publishes every write on the `document_changes` channel, so rows written by
//! other processes (the public website) reach live subscriptions too.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use sqlx::{postgres::PgListener, types::Json, Pool, Postgres};
use tokio::sync::broadcast;

use super::{new_id, DocumentStore, EVENT_CAPACITY};
use crate::{
    error::{AppError, AppResult},
    models::document::{ChangeKind, CollectionQuery, Document, DocumentData, StoreEvent},
};

/// Notification channel fed by the `documents` trigger
pub const CHANGE_CHANNEL: &str = "document_changes";

/// Payload of a `document_changes` notification
#[derive(Debug, Deserialize)]
struct ChangeNotification {
    collection: String,
    id: String,
    op: String,
}

impl ChangeNotification {
    fn into_event(self) -> Option<StoreEvent> {
        let kind = match self.op.as_str() {
            "INSERT" => ChangeKind::Added,
            "UPDATE" => ChangeKind::Modified,
            "DELETE" => ChangeKind::Removed,
            _ => return None,
        };
        Some(StoreEvent {
            collection: self.collection,
            id: self.id,
            kind,
        })
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
    events: broadcast::Sender<StoreEvent>,
}

impl PgStore {
    /// Create the store and start forwarding change notifications
    pub async fn new(pool: Pool<Postgres>) -> AppResult<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let mut listener = PgListener::connect_with(&pool).await?;
        listener.listen(CHANGE_CHANNEL).await?;
        tokio::spawn(forward_notifications(listener, events.clone()));

        Ok(Self { pool, events })
    }
}

async fn forward_notifications(mut listener: PgListener, events: broadcast::Sender<StoreEvent>) {
    loop {
        match listener.recv().await {
            Ok(notification) => {
                match serde_json::from_str::<ChangeNotification>(notification.payload()) {
                    Ok(change) => {
                        if let Some(event) = change.into_event() {
                            let _ = events.send(event);
                        }
                    }
                    Err(e) => tracing::warn!("Ignoring malformed change notification: {}", e),
                }
            }
            Err(e) => {
                tracing::error!("Change listener error: {}", e);
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }
}

type Row = (String, Json<DocumentData>);

fn into_document((id, Json(data)): Row) -> Document {
    Document::new(id, data)
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        let row = sqlx::query_as::<_, Row>(
            "SELECT id, data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(into_document))
    }

    async fn list(&self, query: &CollectionQuery) -> AppResult<Vec<Document>> {
        let sql = format!(
            "SELECT id, data FROM documents WHERE collection = $1 ORDER BY data -> $2 {}, id",
            query.direction.as_sql()
        );
        let rows = sqlx::query_as::<_, Row>(&sql)
            .bind(&query.collection)
            .bind(&query.order_by)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(into_document).collect())
    }

    async fn insert(&self, collection: &str, data: DocumentData) -> AppResult<Document> {
        let row = sqlx::query_as::<_, Row>(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            RETURNING id, data
            "#,
        )
        .bind(collection)
        .bind(new_id())
        .bind(Json(&data))
        .fetch_one(&self.pool)
        .await?;
        Ok(into_document(row))
    }

    async fn set(&self, collection: &str, id: &str, data: DocumentData) -> AppResult<Document> {
        let row = sqlx::query_as::<_, Row>(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            RETURNING id, data
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(&data))
        .fetch_one(&self.pool)
        .await?;
        Ok(into_document(row))
    }

    async fn update(&self, collection: &str, id: &str, data: DocumentData) -> AppResult<Document> {
        sqlx::query_as::<_, Row>(
            r#"
            UPDATE documents SET data = data || $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            RETURNING id, data
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(&data))
        .fetch_optional(&self.pool)
        .await?
        .map(into_document)
        .ok_or_else(|| AppError::NotFound(format!("Document {}/{} not found", collection, id)))
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn events(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_payload() {
        let change: ChangeNotification =
            serde_json::from_str(r#"{"collection":"repairRequests","id":"abc","op":"INSERT"}"#)
                .unwrap();
        let event = change.into_event().unwrap();
        assert_eq!(event.collection, "repairRequests");
        assert_eq!(event.kind, ChangeKind::Added);

        let truncate: ChangeNotification =
            serde_json::from_str(r#"{"collection":"x","id":"y","op":"TRUNCATE"}"#).unwrap();
        assert!(truncate.into_event().is_none());
    }
}
