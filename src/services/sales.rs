//! Sales service
//!
//! A sale and the status of the item it sold are written one after the
//! other, never in one transaction: the sale first, then the item.

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        document::{to_document_data, Document},
        inventory::InventoryStatus,
        log_entry::ActionType,
        sale::{Sale, SaleInput, SALES},
    },
    repository::SharedStore,
    session::Session,
};

use super::{delete_entity, insert_entity, inventory::set_item_status, update_entity};

const ENTITY: &str = "Sale";

#[derive(Clone)]
pub struct SalesService {
    store: SharedStore,
}

impl SalesService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn list(&self, session: &Session) -> Vec<Sale> {
        session.mirror().list(SALES).await
    }

    pub async fn get(&self, session: &Session, id: &str) -> AppResult<Sale> {
        session.mirror().get(SALES, id).await
    }

    /// Record a sale, then mark its item sold
    pub async fn create(&self, session: &Session, input: SaleInput) -> AppResult<Sale> {
        session
            .perform(
                ActionType::Create,
                ENTITY,
                async {
                    input.validate()?;
                    let sale: Sale =
                        insert_entity(&self.store, SALES, to_document_data(&input)?).await?;
                    session
                        .toasts
                        .success(
                            "New Manual Submission",
                            format!("Sale to \"{}\" recorded.", sale.buyer_name),
                        )
                        .await;
                    set_item_status(&self.store, &sale.item_id, InventoryStatus::Sold).await?;
                    Ok::<_, AppError>(sale)
                },
                |s: &Sale| format!("Recorded sale {} to {}", s.sale_id, s.buyer_name),
            )
            .await
    }

    /// Persist a sale; moving it to another item frees the previous one
    pub async fn update(&self, session: &Session, id: &str, input: SaleInput) -> AppResult<Sale> {
        session
            .perform(
                ActionType::Update,
                ENTITY,
                async {
                    input.validate()?;
                    let previous: Sale = self
                        .store
                        .get(SALES, id)
                        .await?
                        .ok_or_else(|| AppError::NotFound(format!("Sale {} not found", id)))?
                        .to_entity()?;

                    let sale: Sale =
                        update_entity(&self.store, SALES, id, to_document_data(&input)?).await?;

                    if previous.item_id != sale.item_id {
                        set_item_status(&self.store, &previous.item_id, InventoryStatus::Available)
                            .await?;
                        set_item_status(&self.store, &sale.item_id, InventoryStatus::Sold).await?;
                    }
                    Ok::<_, AppError>(sale)
                },
                |s: &Sale| format!("Updated sale {}", s.sale_id),
            )
            .await
    }

    /// Delete a sale, then put its item back on sale
    pub async fn delete(&self, session: &Session, id: &str) -> AppResult<()> {
        session.require_admin()?;
        session
            .perform(
                ActionType::Delete,
                ENTITY,
                async {
                    let removed = delete_entity(&self.store, SALES, id).await?;
                    if let Some(item_id) = removed.str_field("itemId") {
                        set_item_status(&self.store, item_id, InventoryStatus::Available).await?;
                    }
                    Ok::<_, AppError>(removed)
                },
                |removed: &Document| {
                    format!("Deleted sale {}", removed.str_field("saleId").unwrap_or(id))
                },
            )
            .await?;
        Ok(())
    }
}
