//! Public-site submissions.
//!
//! These documents are written by the marketing website, so every field is
//! optional and the field names follow what the website sends.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const CONTACT_SUBMISSIONS: &str = "contactSubmissions";
pub const RENTAL_AGREEMENTS: &str = "rentalAgreements";
pub const REPAIR_REQUESTS: &str = "repairRequests";

/// Which site form a submission came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
    Contact,
    Rental,
    Repair,
}

impl SubmissionKind {
    pub const ALL: [SubmissionKind; 3] = [
        SubmissionKind::Contact,
        SubmissionKind::Rental,
        SubmissionKind::Repair,
    ];

    pub fn collection(&self) -> &'static str {
        match self {
            SubmissionKind::Contact => CONTACT_SUBMISSIONS,
            SubmissionKind::Rental => RENTAL_AGREEMENTS,
            SubmissionKind::Repair => REPAIR_REQUESTS,
        }
    }

    pub fn from_collection(collection: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.collection() == collection)
    }

    /// Field holding the submitter's display name
    pub fn name_field(&self) -> &'static str {
        match self {
            SubmissionKind::Contact => "name",
            SubmissionKind::Rental => "renter_name",
            SubmissionKind::Repair => "customerName",
        }
    }

    /// Field holding the submission time, also the live ordering field
    pub fn timestamp_field(&self) -> &'static str {
        match self {
            SubmissionKind::Contact | SubmissionKind::Rental => "timestamp",
            SubmissionKind::Repair => "submissionDate",
        }
    }

    /// Toast text for a freshly arrived submission
    pub fn arrival_message(&self, name: &str) -> String {
        match self {
            SubmissionKind::Contact => format!("Contact form from {}", name),
            SubmissionKind::Rental => format!("Rental agreement from {}", name),
            SubmissionKind::Repair => format!("Repair request from {}", name),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::Contact => "contact",
            SubmissionKind::Rental => "rental",
            SubmissionKind::Repair => "repair",
        }
    }
}

impl std::fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Processing status set from the dashboard; absent means `new`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    New,
    Pending,
    Completed,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::New => "new",
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Contact form submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SiteContact {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub plan: Option<String>,
    pub hookups: Option<String>,
    pub message: Option<String>,
    pub timestamp: Option<String>,
    pub status: SubmissionStatus,
}

/// Rental agreement signed on the website
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SiteRental {
    pub id: String,
    pub renter_name: Option<String>,
    #[serde(rename = "Renter_Verified_Email")]
    pub renter_verified_email: Option<String>,
    pub property_address: Option<String>,
    pub selected_plan: Option<String>,
    pub maintenance_option: Option<String>,
    pub emergency_name: Option<String>,
    pub emergency_phone: Option<String>,
    pub signature_name: Option<String>,
    pub signature_date: Option<String>,
    pub timestamp: Option<String>,
    pub status: SubmissionStatus,
}

/// Repair request form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteRepair {
    pub id: String,
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service_address: Option<String>,
    pub appliance_type: Option<String>,
    pub issue_type: Option<String>,
    pub urgency: Option<String>,
    pub image_count: u32,
    pub issue_description: Option<String>,
    pub submission_date: Option<String>,
    pub status: SubmissionStatus,
}

/// Status change request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSubmissionStatus {
    pub status: SubmissionStatus,
}

/// All three submission feeds
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOverview {
    pub total: usize,
    pub contacts: Vec<SiteContact>,
    pub rentals: Vec<SiteRental>,
    pub repairs: Vec<SiteRepair>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lenient_decoding() {
        let repair: SiteRepair = serde_json::from_value(json!({
            "id": "r1",
            "customerName": "Dana",
            "imageCount": 2,
            "unexpected": true
        }))
        .unwrap();
        assert_eq!(repair.customer_name.as_deref(), Some("Dana"));
        assert_eq!(repair.status, SubmissionStatus::New);

        let rental: SiteRental = serde_json::from_value(json!({
            "id": "x",
            "renter_name": "Sam",
            "Renter_Verified_Email": "sam@example.com",
            "status": "completed"
        }))
        .unwrap();
        assert_eq!(rental.renter_verified_email.as_deref(), Some("sam@example.com"));
        assert_eq!(rental.status, SubmissionStatus::Completed);
    }

    #[test]
    fn test_collection_lookup() {
        assert_eq!(
            SubmissionKind::from_collection("repairRequests"),
            Some(SubmissionKind::Repair)
        );
        assert_eq!(SubmissionKind::from_collection("contacts"), None);
    }
}
