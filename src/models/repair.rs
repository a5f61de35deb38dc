//! Repair ticket model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub const REPAIRS: &str = "repairs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RepairStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl RepairStatus {
    /// Open or in progress
    pub fn is_open(&self) -> bool {
        matches!(self, RepairStatus::Open | RepairStatus::InProgress)
    }
}

/// Repair ticket document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Repair {
    pub id: String,
    pub contact_id: String,
    #[serde(default)]
    pub appliance_type: String,
    pub issue_description: String,
    pub status: RepairStatus,
    pub reported_date: NaiveDate,
    #[serde(default)]
    pub technician_notes: Option<String>,
}

/// Create / update repair request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepairInput {
    #[validate(length(min = 1, message = "Client is required"))]
    pub contact_id: String,
    #[serde(default)]
    pub appliance_type: String,
    #[validate(length(min = 1, message = "Issue description is required"))]
    pub issue_description: String,
    pub status: RepairStatus,
    pub reported_date: NaiveDate,
    #[serde(default)]
    pub technician_notes: Option<String>,
}
