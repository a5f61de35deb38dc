//! Vendor service

use serde_json::Value;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        document::{to_document_data, CollectionQuery, Direction, Document, DocumentData},
        inventory::INVENTORY,
        log_entry::ActionType,
        vendor::{next_vendor_id, summarize, Vendor, VendorInput, VendorSummary, VENDORS},
    },
    repository::SharedStore,
    session::Session,
};

use super::{delete_entity, insert_entity, update_entity};

const ENTITY: &str = "Vendor";

#[derive(Clone)]
pub struct VendorsService {
    store: SharedStore,
}

fn vendor_data(input: &VendorInput) -> AppResult<DocumentData> {
    input.validate()?;
    let mut data = to_document_data(input)?;
    if input.vendor_id.as_deref().map_or(true, |id| id.trim().is_empty()) {
        data.remove("vendorId");
    }
    Ok(data)
}

impl VendorsService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Vendors by name
    pub async fn list(&self, session: &Session) -> Vec<Vendor> {
        session.mirror().list(VENDORS).await
    }

    /// Vendors with their purchased-item counts
    pub async fn summaries(&self, session: &Session) -> Vec<VendorSummary> {
        let vendors = self.list(session).await;
        let inventory = session.mirror().list(INVENTORY).await;
        summarize(vendors, &inventory)
    }

    pub async fn get(&self, session: &Session, id: &str) -> AppResult<Vendor> {
        session.mirror().get(VENDORS, id).await
    }

    async fn next_id(&self) -> AppResult<String> {
        let vendors: Vec<Vendor> = self
            .store
            .list(&CollectionQuery::new(VENDORS, "vendorName", Direction::Asc))
            .await?
            .iter()
            .filter_map(|document| document.to_entity().ok())
            .collect();
        Ok(next_vendor_id(&vendors))
    }

    pub async fn create(&self, session: &Session, input: VendorInput) -> AppResult<Vendor> {
        let vendor: Vendor = session
            .perform(
                ActionType::Create,
                ENTITY,
                async {
                    let mut data = vendor_data(&input)?;
                    if !data.contains_key("vendorId") {
                        data.insert("vendorId".to_string(), Value::String(self.next_id().await?));
                    }
                    insert_entity(&self.store, VENDORS, data).await
                },
                |v: &Vendor| format!("Created vendor {}", v.vendor_name),
            )
            .await?;

        session
            .toasts
            .success(
                "New Manual Submission",
                format!("Vendor \"{}\" added.", vendor.vendor_name),
            )
            .await;
        Ok(vendor)
    }

    pub async fn update(&self, session: &Session, id: &str, input: VendorInput) -> AppResult<Vendor> {
        session
            .perform(
                ActionType::Update,
                ENTITY,
                async { update_entity(&self.store, VENDORS, id, vendor_data(&input)?).await },
                |v: &Vendor| format!("Updated vendor {}", v.vendor_name),
            )
            .await
    }

    pub async fn delete(&self, session: &Session, id: &str) -> AppResult<()> {
        session.require_admin()?;
        session
            .perform(
                ActionType::Delete,
                ENTITY,
                delete_entity(&self.store, VENDORS, id),
                |removed: &Document| {
                    format!("Deleted vendor {}", removed.str_field("vendorName").unwrap_or(id))
                },
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{
        inventory::tests::input as item_input,
        tests::{admin_session, fixture, settle},
    };

    fn input(name: &str, vendor_id: Option<&str>) -> VendorInput {
        VendorInput {
            vendor_id: vendor_id.map(str::to_string),
            vendor_name: name.to_string(),
            contact_person: "Pat".into(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_vendor_ids_are_generated() {
        let (services, _) = fixture().await;
        let session = admin_session(&services).await;

        let first = services.vendors.create(&session, input("Acme", None)).await.unwrap();
        assert_eq!(first.vendor_id, "V-1001");

        services
            .vendors
            .create(&session, input("Bolt", Some("V-1010")))
            .await
            .unwrap();
        let third = services.vendors.create(&session, input("Crest", None)).await.unwrap();
        assert_eq!(third.vendor_id, "V-1011");
    }

    #[tokio::test]
    async fn test_update_keeps_vendor_id() {
        let (services, _) = fixture().await;
        let session = admin_session(&services).await;
        let vendor = services.vendors.create(&session, input("Acme", None)).await.unwrap();

        let renamed = services
            .vendors
            .update(&session, &vendor.id, input("Acme Supply", None))
            .await
            .unwrap();
        assert_eq!(renamed.vendor_id, vendor.vendor_id);
        assert_eq!(renamed.vendor_name, "Acme Supply");
    }

    #[tokio::test]
    async fn test_summaries_count_items_by_name() {
        let (services, _) = fixture().await;
        let session = admin_session(&services).await;
        services.vendors.create(&session, input("Acme", None)).await.unwrap();
        services.inventory.create(&session, item_input("A")).await.unwrap();
        services.inventory.create(&session, item_input("B")).await.unwrap();

        settle(session.mirror(), INVENTORY, |docs| docs.len() == 2).await;
        settle(session.mirror(), VENDORS, |docs| docs.len() == 1).await;
        let summaries = services.vendors.summaries(&session).await;
        assert_eq!(summaries[0].items_purchased, 2);
    }
}
