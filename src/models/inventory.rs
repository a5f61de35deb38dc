//! Inventory item model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub const INVENTORY: &str = "inventory";

/// Whether an item is on hand or has been sold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum InventoryStatus {
    Available,
    Sold,
}

impl InventoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryStatus::Available => "Available",
            InventoryStatus::Sold => "Sold",
        }
    }
}

/// Inventory item document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub item_type: String,
    pub make_model: String,
    pub serial_number: String,
    #[serde(default)]
    pub condition: String,
    pub purchase_date: NaiveDate,
    #[serde(default, with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub purchase_price: Decimal,
    /// Vendor name (not id)
    #[serde(default)]
    pub vendor: String,
    pub status: InventoryStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Create / update inventory request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryInput {
    #[validate(length(min = 1, message = "Item type is required"))]
    pub item_type: String,
    #[validate(length(min = 1, message = "Make/model is required"))]
    pub make_model: String,
    #[validate(length(min = 1, message = "Serial number is required"))]
    pub serial_number: String,
    #[serde(default)]
    pub condition: String,
    pub purchase_date: NaiveDate,
    #[serde(default, with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub purchase_price: Decimal,
    #[serde(default)]
    pub vendor: String,
    /// Defaults to `Available` on creation
    pub status: Option<InventoryStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}
