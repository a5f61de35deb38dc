//! Activity log browsing

use crate::{
    error::AppResult,
    models::log_entry::{ActionType, LogEntry, LogQuery, ACTIVITY_LOGS},
    repository::SharedStore,
    session::Session,
};

use super::delete_entity;

const ENTITY: &str = "Activity Log";

#[derive(Clone)]
pub struct ActivityService {
    store: SharedStore,
}

impl ActivityService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Log entries, newest first, optionally filtered
    pub async fn list(&self, session: &Session, query: &LogQuery) -> Vec<LogEntry> {
        let entries: Vec<LogEntry> = session.mirror().list(ACTIVITY_LOGS).await;
        match query.filter.as_deref().map(str::trim) {
            Some(filter) if !filter.is_empty() => {
                let needle = filter.to_lowercase();
                entries.into_iter().filter(|e| e.matches(&needle)).collect()
            }
            _ => entries,
        }
    }

    /// Delete one entry; the deletion is itself logged
    pub async fn delete(&self, session: &Session, id: &str) -> AppResult<()> {
        session.require_admin()?;
        session
            .perform(
                ActionType::Delete,
                ENTITY,
                delete_entity(&self.store, ACTIVITY_LOGS, id),
                |_| format!("Deleted log entry {}", id),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::contact::ContactInput,
        services::tests::{admin_session, fixture, settle},
    };

    fn filter(text: &str) -> LogQuery {
        LogQuery {
            filter: Some(text.to_string()),
        }
    }

    #[tokio::test]
    async fn test_filter_is_case_insensitive() {
        let (services, _) = fixture().await;
        let session = admin_session(&services).await;
        for name in ["Bob", "Carla"] {
            services
                .contacts
                .create(
                    &session,
                    ContactInput {
                        full_name: name.into(),
                        email: String::new(),
                        phone: "555".into(),
                        address: String::new(),
                        notes: None,
                    },
                )
                .await
                .unwrap();
        }
        settle(session.mirror(), ACTIVITY_LOGS, |docs| docs.len() == 2).await;

        let all = services.activity.list(&session, &LogQuery::default()).await;
        assert_eq!(all.len(), 2);
        assert_eq!(services.activity.list(&session, &filter("CARLA")).await.len(), 1);
        assert_eq!(services.activity.list(&session, &filter("create")).await.len(), 2);
        assert_eq!(services.activity.list(&session, &filter("ada admin")).await.len(), 2);
        assert!(services.activity.list(&session, &filter("vendor")).await.is_empty());
    }

    #[tokio::test]
    async fn test_deleting_an_entry_is_logged() {
        let (services, _) = fixture().await;
        let session = admin_session(&services).await;
        services
            .contacts
            .create(
                &session,
                ContactInput {
                    full_name: "Bob".into(),
                    email: String::new(),
                    phone: "555".into(),
                    address: String::new(),
                    notes: None,
                },
            )
            .await
            .unwrap();
        settle(session.mirror(), ACTIVITY_LOGS, |docs| docs.len() == 1).await;
        let entry = services.activity.list(&session, &LogQuery::default()).await[0].clone();

        services.activity.delete(&session, &entry.id).await.unwrap();
        let expected = format!("Deleted log entry {}", entry.id);
        settle(session.mirror(), ACTIVITY_LOGS, |docs| {
            docs.len() == 1 && docs[0].str_field("details") == Some(expected.as_str())
        })
        .await;
    }
}
