//! Vendor model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::inventory::InventoryItem;

pub const VENDORS: &str = "vendors";

/// First vendor number handed out is one above this
const VENDOR_ID_FLOOR: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    /// Human readable vendor number, `V-<n>`
    pub vendor_id: String,
    pub vendor_name: String,
    pub contact_person: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Create / update vendor request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorInput {
    /// Generated when omitted on creation
    pub vendor_id: Option<String>,
    #[validate(length(min = 1, message = "Vendor Name is required"))]
    pub vendor_name: String,
    #[validate(length(min = 1, message = "Contact Person is required"))]
    pub contact_person: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Vendor with the number of inventory items bought from it
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorSummary {
    #[serde(flatten)]
    pub vendor: Vendor,
    pub items_purchased: usize,
}

/// Next free `V-<n>` number; unparsable ids are ignored and the number
/// saturates at `u64::MAX`
pub fn next_vendor_id(vendors: &[Vendor]) -> String {
    let highest = vendors
        .iter()
        .filter_map(|v| v.vendor_id.strip_prefix("V-")?.parse::<u64>().ok())
        .fold(VENDOR_ID_FLOOR, u64::max);
    format!("V-{}", highest.saturating_add(1))
}

/// Count inventory items per vendor, matched by vendor name
pub fn summarize(vendors: Vec<Vendor>, inventory: &[InventoryItem]) -> Vec<VendorSummary> {
    vendors
        .into_iter()
        .map(|vendor| {
            let items_purchased = inventory
                .iter()
                .filter(|item| item.vendor == vendor.vendor_name)
                .count();
            VendorSummary {
                vendor,
                items_purchased,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::inventory::InventoryStatus;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn vendor(vendor_id: &str, name: &str) -> Vendor {
        Vendor {
            id: vendor_id.to_lowercase(),
            vendor_id: vendor_id.to_string(),
            vendor_name: name.to_string(),
            contact_person: "Pat".to_string(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            notes: None,
        }
    }

    fn item(vendor: &str) -> InventoryItem {
        InventoryItem {
            id: format!("item-{}", vendor),
            item_type: "Washer".into(),
            make_model: "LG WM3400".into(),
            serial_number: "SN1".into(),
            condition: String::new(),
            purchase_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            purchase_price: Decimal::ZERO,
            vendor: vendor.to_string(),
            status: InventoryStatus::Available,
            notes: None,
        }
    }

    #[test]
    fn test_next_vendor_id() {
        assert_eq!(next_vendor_id(&[]), "V-1001");
        let vendors = vec![vendor("V-1004", "A"), vendor("bogus", "B"), vendor("V-1002", "C")];
        assert_eq!(next_vendor_id(&vendors), "V-1005");
    }

    #[test]
    fn test_next_vendor_id_with_huge_numbers() {
        let vendors = vec![vendor("V-4294967295", "A")];
        assert_eq!(next_vendor_id(&vendors), "V-4294967296");

        let vendors = vec![vendor(&format!("V-{}", u64::MAX), "A")];
        assert_eq!(next_vendor_id(&vendors), format!("V-{}", u64::MAX));

        // Too large for any number: ignored
        let vendors = vec![vendor("V-99999999999999999999999", "A")];
        assert_eq!(next_vendor_id(&vendors), "V-1001");
    }

    #[test]
    fn test_items_purchased_by_name() {
        let vendors = vec![vendor("V-1001", "Acme"), vendor("V-1002", "Bolt")];
        let inventory = vec![item("Acme"), item("Acme"), item("Other")];
        let summary = summarize(vendors, &inventory);
        assert_eq!(summary[0].items_purchased, 2);
        assert_eq!(summary[1].items_purchased, 0);
    }
}
