//! Inventory service

use serde_json::Value;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        document::{to_document_data, Document, DocumentData},
        inventory::{InventoryInput, InventoryItem, InventoryStatus, INVENTORY},
        log_entry::ActionType,
    },
    repository::SharedStore,
    session::Session,
};

use super::{delete_entity, insert_entity, update_entity};

const ENTITY: &str = "Inventory";

#[derive(Clone)]
pub struct InventoryService {
    store: SharedStore,
}

fn item_data(input: &InventoryInput) -> AppResult<DocumentData> {
    input.validate()?;
    let mut data = to_document_data(input)?;
    if input.status.is_none() {
        data.remove("status");
    }
    Ok(data)
}

/// Set an item's status. A missing item is skipped, not an error.
pub(crate) async fn set_item_status(
    store: &SharedStore,
    item_id: &str,
    status: InventoryStatus,
) -> AppResult<()> {
    let mut data = DocumentData::new();
    data.insert("status".to_string(), Value::String(status.as_str().to_string()));
    match store.update(INVENTORY, item_id, data).await {
        Ok(_) => {
            tracing::debug!(item = item_id, status = status.as_str(), "Inventory status set");
            Ok(())
        }
        Err(AppError::NotFound(_)) => {
            tracing::warn!(item = item_id, "Inventory item not found, status left unchanged");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

impl InventoryService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn list(&self, session: &Session) -> Vec<InventoryItem> {
        session.mirror().list(INVENTORY).await
    }

    pub async fn get(&self, session: &Session, id: &str) -> AppResult<InventoryItem> {
        session.mirror().get(INVENTORY, id).await
    }

    /// Items that can still be sold
    pub async fn available(&self, session: &Session) -> Vec<InventoryItem> {
        self.list(session)
            .await
            .into_iter()
            .filter(|item| item.status == InventoryStatus::Available)
            .collect()
    }

    pub async fn create(&self, session: &Session, input: InventoryInput) -> AppResult<InventoryItem> {
        let item: InventoryItem = session
            .perform(
                ActionType::Create,
                ENTITY,
                async {
                    let mut data = item_data(&input)?;
                    data.entry("status").or_insert_with(|| {
                        Value::String(InventoryStatus::Available.as_str().to_string())
                    });
                    insert_entity(&self.store, INVENTORY, data).await
                },
                |i: &InventoryItem| {
                    format!("Added {}: {} (SN: {})", i.item_type, i.make_model, i.serial_number)
                },
            )
            .await?;

        session
            .toasts
            .success(
                "New Manual Submission",
                format!("Inventory item \"{}\" added.", item.make_model),
            )
            .await;
        Ok(item)
    }

    pub async fn update(
        &self,
        session: &Session,
        id: &str,
        input: InventoryInput,
    ) -> AppResult<InventoryItem> {
        session
            .perform(
                ActionType::Update,
                ENTITY,
                async { update_entity(&self.store, INVENTORY, id, item_data(&input)?).await },
                |i: &InventoryItem| {
                    format!("Updated item {} (SN: {})", i.make_model, i.serial_number)
                },
            )
            .await
    }

    pub async fn delete(&self, session: &Session, id: &str) -> AppResult<()> {
        session.require_admin()?;
        session
            .perform(
                ActionType::Delete,
                ENTITY,
                delete_entity(&self.store, INVENTORY, id),
                |removed: &Document| {
                    format!("Deleted item {}", removed.str_field("makeModel").unwrap_or(id))
                },
            )
            .await?;
        Ok(())
    }
}
