//! Repair ticket service

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        document::to_document_data,
        log_entry::ActionType,
        repair::{Repair, RepairInput, REPAIRS},
    },
    repository::SharedStore,
    session::Session,
};

use super::{contacts::client_name, delete_entity, insert_entity, update_entity};

const ENTITY: &str = "Repair";

#[derive(Clone)]
pub struct RepairsService {
    store: SharedStore,
}

impl RepairsService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn list(&self, session: &Session) -> Vec<Repair> {
        session.mirror().list(REPAIRS).await
    }

    pub async fn get(&self, session: &Session, id: &str) -> AppResult<Repair> {
        session.mirror().get(REPAIRS, id).await
    }

    pub async fn create(&self, session: &Session, input: RepairInput) -> AppResult<Repair> {
        let contact_name = client_name(session, &input.contact_id).await;
        let repair = session
            .perform(
                ActionType::Create,
                ENTITY,
                async {
                    input.validate()?;
                    insert_entity(&self.store, REPAIRS, to_document_data(&input)?).await
                },
                |_: &Repair| format!("Created repair request for {}", contact_name),
            )
            .await?;

        session
            .toasts
            .success("New Manual Submission", "New repair request created.")
            .await;
        Ok(repair)
    }

    pub async fn update(&self, session: &Session, id: &str, input: RepairInput) -> AppResult<Repair> {
        session
            .perform(
                ActionType::Update,
                ENTITY,
                async {
                    input.validate()?;
                    update_entity(&self.store, REPAIRS, id, to_document_data(&input)?).await
                },
                |r: &Repair| format!("Updated repair {}", r.id),
            )
            .await
    }

    pub async fn delete(&self, session: &Session, id: &str) -> AppResult<()> {
        session.require_admin()?;
        session
            .perform(
                ActionType::Delete,
                ENTITY,
                delete_entity(&self.store, REPAIRS, id),
                |_| format!("Deleted repair {}", id),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        models::{log_entry::ACTIVITY_LOGS, repair::RepairStatus},
        services::tests::{admin_session, fixture, settle},
    };
    use chrono::NaiveDate;

    fn input(description: &str) -> RepairInput {
        RepairInput {
            contact_id: "c-unknown".into(),
            appliance_type: "Washer".into(),
            issue_description: description.to_string(),
            status: RepairStatus::Open,
            reported_date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            technician_notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let (services, _) = fixture().await;
        let session = admin_session(&services).await;

        let repair = services.repairs.create(&session, input("Leaks")).await.unwrap();
        settle(session.mirror(), ACTIVITY_LOGS, |docs| {
            docs.iter()
                .any(|d| d.str_field("details") == Some("Created repair request for Unknown"))
        })
        .await;

        let mut done = input("Leaks");
        done.status = RepairStatus::Completed;
        done.technician_notes = Some("Replaced hose".into());
        let updated = services.repairs.update(&session, &repair.id, done).await.unwrap();
        assert_eq!(updated.status, RepairStatus::Completed);

        services.repairs.delete(&session, &repair.id).await.unwrap();
        settle(session.mirror(), REPAIRS, |docs| docs.is_empty()).await;
        let expected = format!("Deleted repair {}", repair.id);
        settle(session.mirror(), ACTIVITY_LOGS, |docs| {
            docs.iter().any(|d| d.str_field("details") == Some(expected.as_str()))
        })
        .await;
    }

    #[tokio::test]
    async fn test_description_required() {
        let (services, _) = fixture().await;
        let session = admin_session(&services).await;
        let err = services.repairs.create(&session, input("")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_missing_repair() {
        let (services, _) = fixture().await;
        let session = admin_session(&services).await;
        let err = services
            .repairs
            .update(&session, "nope", input("Noise"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
