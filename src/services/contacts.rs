//! Client (contact) service

use chrono::Utc;
use serde_json::Value;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        contact::{Contact, ContactInput, CONTACTS},
        document::{to_document_data, Document},
        log_entry::ActionType,
    },
    repository::SharedStore,
    session::Session,
};

use super::{delete_entity, insert_entity, update_entity};

const ENTITY: &str = "Client";

#[derive(Clone)]
pub struct ContactsService {
    store: SharedStore,
}

impl ContactsService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Clients, newest first
    pub async fn list(&self, session: &Session) -> Vec<Contact> {
        session.mirror().list(CONTACTS).await
    }

    pub async fn get(&self, session: &Session, id: &str) -> AppResult<Contact> {
        session.mirror().get(CONTACTS, id).await
    }

    pub async fn create(&self, session: &Session, input: ContactInput) -> AppResult<Contact> {
        let contact: Contact = session
            .perform(
                ActionType::Create,
                ENTITY,
                async {
                    input.validate()?;
                    let mut data = to_document_data(&input)?;
                    data.insert("createdAt".to_string(), serde_json::to_value(Utc::now())?);
                    insert_entity(&self.store, CONTACTS, data).await
                },
                |c: &Contact| format!("Created client {}", c.full_name),
            )
            .await?;

        session
            .toasts
            .success(
                "New Manual Submission",
                format!("Client \"{}\" created.", contact.full_name),
            )
            .await;
        Ok(contact)
    }

    pub async fn update(&self, session: &Session, id: &str, input: ContactInput) -> AppResult<Contact> {
        session
            .perform(
                ActionType::Update,
                ENTITY,
                async {
                    input.validate()?;
                    update_entity(&self.store, CONTACTS, id, to_document_data(&input)?).await
                },
                |c: &Contact| format!("Updated client {}", c.full_name),
            )
            .await
    }

    pub async fn delete(&self, session: &Session, id: &str) -> AppResult<()> {
        session.require_admin()?;
        session
            .perform(
                ActionType::Delete,
                ENTITY,
                delete_entity(&self.store, CONTACTS, id),
                |removed: &Document| {
                    let name = removed.str_field("fullName").unwrap_or(id);
                    format!("Deleted client {}", name)
                },
            )
            .await?;
        Ok(())
    }
}

/// Display name of a client for audit texts
pub(crate) async fn client_name(session: &Session, contact_id: &str) -> String {
    session
        .mirror()
        .find(CONTACTS, contact_id)
        .await
        .and_then(|d| d.field("fullName").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| "Unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        models::{log_entry::{LogEntry, ACTIVITY_LOGS}, user::Role},
        services::tests::{admin_session, fixture, session_for, settle},
        session::{dispatch::GENERIC_ERROR, tests::user},
    };

    fn input(name: &str) -> ContactInput {
        ContactInput {
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "555-0100".to_string(),
            address: "1 Main St".to_string(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_mirrors_audits_and_toasts() {
        let (services, _) = fixture().await;
        let session = admin_session(&services).await;

        let contact = services.contacts.create(&session, input("Bob")).await.unwrap();
        settle(session.mirror(), CONTACTS, |docs| docs.len() == 1).await;
        assert_eq!(services.contacts.get(&session, &contact.id).await.unwrap(), contact);

        settle(session.mirror(), ACTIVITY_LOGS, |docs| !docs.is_empty()).await;
        let logs: Vec<LogEntry> = session.mirror().list(ACTIVITY_LOGS).await;
        assert_eq!(logs[0].entity, "Client");
        assert_eq!(logs[0].details, "Created client Bob");

        let toasts = session.toasts.list().await;
        assert!(toasts
            .iter()
            .any(|t| t.title == "New Manual Submission" && t.message == "Client \"Bob\" created."));
    }

    #[tokio::test]
    async fn test_validation_happens_before_write() {
        let (services, store) = fixture().await;
        let session = admin_session(&services).await;

        let mut missing_phone = input("Bob");
        missing_phone.phone.clear();
        let err = services.contacts.create(&session, missing_phone).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let stored = store
            .list(&crate::models::document::CollectionQuery::new(
                CONTACTS,
                "createdAt",
                crate::models::document::Direction::Desc,
            ))
            .await
            .unwrap();
        assert!(stored.is_empty());
        let toasts = session.toasts.list().await;
        assert_eq!(toasts.last().unwrap().title, "Error");
        assert_ne!(toasts.last().unwrap().message, GENERIC_ERROR);
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let (services, _) = fixture().await;
        let session = admin_session(&services).await;
        let contact = services.contacts.create(&session, input("Bob")).await.unwrap();

        let mut changed = input("Robert");
        changed.notes = Some("prefers mornings".into());
        let updated = services
            .contacts
            .update(&session, &contact.id, changed)
            .await
            .unwrap();
        assert_eq!(updated.full_name, "Robert");
        assert_eq!(updated.created_at, contact.created_at);
    }

    #[tokio::test]
    async fn test_delete_requires_admin_and_stays_deleted() {
        let (services, _) = fixture().await;
        let admin = admin_session(&services).await;
        let contact = services.contacts.create(&admin, input("Bob")).await.unwrap();

        let staff = session_for(&services, user("Sam", Role::User)).await;
        assert!(matches!(
            services.contacts.delete(&staff, &contact.id).await,
            Err(AppError::Authorization(_))
        ));

        services.contacts.delete(&admin, &contact.id).await.unwrap();
        settle(admin.mirror(), CONTACTS, |docs| docs.is_empty()).await;
        services.contacts.create(&admin, input("Other")).await.unwrap();
        settle(admin.mirror(), CONTACTS, |docs| docs.len() == 1).await;
        assert!(services.contacts.get(&admin, &contact.id).await.is_err());
    }
}
