//! Sale model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub const SALES: &str = "sales";

/// Sale of one inventory item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    /// Human readable sale number
    pub sale_id: String,
    pub item_id: String,
    pub buyer_name: String,
    #[serde(default)]
    pub buyer_contact: String,
    pub sale_date: NaiveDate,
    #[serde(default, with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub sale_price: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Create / update sale request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleInput {
    #[validate(length(min = 1, message = "Sale ID is required"))]
    pub sale_id: String,
    #[validate(length(min = 1, message = "Item is required"))]
    pub item_id: String,
    #[validate(length(min = 1, message = "Buyer name is required"))]
    pub buyer_name: String,
    #[serde(default)]
    pub buyer_contact: String,
    pub sale_date: NaiveDate,
    #[serde(default, with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub sale_price: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}
