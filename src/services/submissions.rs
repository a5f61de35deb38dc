//! Public-site submissions (contact forms, rental agreements, repair requests)

use serde_json::Value;

use crate::{
    error::AppResult,
    models::{
        document::DocumentData,
        log_entry::ActionType,
        submission::{
            SiteContact, SiteRental, SiteRepair, SubmissionKind, SubmissionOverview,
            SubmissionStatus,
        },
    },
    repository::SharedStore,
    session::Session,
};

use super::delete_entity;

const ENTITY: &str = "Site Submission";

#[derive(Clone)]
pub struct SubmissionsService {
    store: SharedStore,
}

impl SubmissionsService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// All three feeds, newest first
    pub async fn overview(&self, session: &Session) -> SubmissionOverview {
        let mirror = session.mirror();
        let contacts: Vec<SiteContact> = mirror.list(SubmissionKind::Contact.collection()).await;
        let rentals: Vec<SiteRental> = mirror.list(SubmissionKind::Rental.collection()).await;
        let repairs: Vec<SiteRepair> = mirror.list(SubmissionKind::Repair.collection()).await;
        SubmissionOverview {
            total: contacts.len() + rentals.len() + repairs.len(),
            contacts,
            rentals,
            repairs,
        }
    }

    /// One feed as stored, unknown fields included
    pub async fn list(&self, session: &Session, kind: SubmissionKind) -> Vec<Value> {
        session
            .mirror()
            .documents(kind.collection())
            .await
            .into_iter()
            .map(|document| {
                let mut data = document.data;
                data.insert("id".to_string(), Value::String(document.id));
                data.insert("type".to_string(), Value::String(kind.as_str().to_string()));
                Value::Object(data)
            })
            .collect()
    }

    pub async fn update_status(
        &self,
        session: &Session,
        kind: SubmissionKind,
        id: &str,
        status: SubmissionStatus,
    ) -> AppResult<()> {
        let mut data = DocumentData::new();
        data.insert("status".to_string(), Value::String(status.as_str().to_string()));
        session
            .perform(
                ActionType::Update,
                ENTITY,
                self.store.update(kind.collection(), id, data),
                |_| format!("Updated status of {} (ID: {}) to {}", kind, id, status),
            )
            .await?;
        session
            .toasts
            .success("Success", format!("Status updated to {}.", status))
            .await;
        Ok(())
    }

    pub async fn delete(&self, session: &Session, kind: SubmissionKind, id: &str) -> AppResult<()> {
        session.require_admin()?;
        session
            .perform(
                ActionType::Delete,
                ENTITY,
                delete_entity(&self.store, kind.collection(), id),
                |_| format!("Deleted {} submission (ID: {})", kind, id),
            )
            .await?;
        session
            .toasts
            .success("Success", "Submission deleted successfully.")
            .await;
        Ok(())
    }
}
