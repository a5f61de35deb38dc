//! Rental agreement model and the fixed plan price table

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub const RENTALS: &str = "rentals";

/// Rental plan; each plan has one fixed monthly price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum RentalPlan {
    #[serde(rename = "Month-to-Month Plan")]
    MonthToMonth,
    #[serde(rename = "6-Month Plan")]
    SixMonth,
    #[serde(rename = "12-Month Smart Plan")]
    TwelveMonthSmart,
    #[serde(rename = "Premium Appliance Plan")]
    PremiumAppliance,
}

impl RentalPlan {
    pub const ALL: [RentalPlan; 4] = [
        RentalPlan::MonthToMonth,
        RentalPlan::SixMonth,
        RentalPlan::TwelveMonthSmart,
        RentalPlan::PremiumAppliance,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RentalPlan::MonthToMonth => "Month-to-Month Plan",
            RentalPlan::SixMonth => "6-Month Plan",
            RentalPlan::TwelveMonthSmart => "12-Month Smart Plan",
            RentalPlan::PremiumAppliance => "Premium Appliance Plan",
        }
    }

    /// Fixed monthly price of the plan
    pub fn monthly_rate(&self) -> Decimal {
        match self {
            RentalPlan::MonthToMonth => Decimal::new(6999, 2),
            RentalPlan::SixMonth => Decimal::new(5999, 2),
            RentalPlan::TwelveMonthSmart => Decimal::new(4999, 2),
            RentalPlan::PremiumAppliance => Decimal::new(8999, 2),
        }
    }
}

impl std::fmt::Display for RentalPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Rental agreement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RentalStatus {
    #[serde(rename = "Pending Signature")]
    PendingSignature,
    Active,
    Terminated,
}

/// Rental agreement document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: String,
    pub contact_id: String,
    pub plan: RentalPlan,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub monthly_rate: Decimal,
    #[serde(default)]
    pub maintenance_option: String,
    #[serde(default)]
    pub delivery_payment_option: String,
    pub status: RentalStatus,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub rental_property_address: String,
    pub emergency_contact_full_name: String,
    #[serde(default)]
    pub emergency_contact_relationship: String,
    #[serde(default)]
    pub emergency_contact_address: String,
    #[serde(default)]
    pub emergency_contact_email: String,
    #[serde(default)]
    pub emergency_contact_phone: String,
    pub ack_payment_terms: bool,
    pub ack_relocation_terms: bool,
    pub ack_additional_terms: bool,
    pub renter_printed_name: String,
    pub digital_signature: String,
}

/// Create / update rental request.
///
/// `monthly_rate` is accepted for form compatibility but never trusted: the
/// persisted rate is always recomputed from `plan`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RentalInput {
    #[validate(length(min = 1, message = "Client is required"))]
    pub contact_id: String,
    pub plan: RentalPlan,
    #[serde(default, skip_serializing, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub monthly_rate: Option<Decimal>,
    #[serde(default)]
    pub maintenance_option: String,
    #[serde(default)]
    pub delivery_payment_option: String,
    pub status: RentalStatus,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub rental_property_address: String,
    #[validate(length(min = 1, message = "Emergency contact name is required"))]
    pub emergency_contact_full_name: String,
    #[serde(default)]
    pub emergency_contact_relationship: String,
    #[serde(default)]
    pub emergency_contact_address: String,
    #[serde(default)]
    pub emergency_contact_email: String,
    #[serde(default)]
    pub emergency_contact_phone: String,
    #[serde(default)]
    pub ack_payment_terms: bool,
    #[serde(default)]
    pub ack_relocation_terms: bool,
    #[serde(default)]
    pub ack_additional_terms: bool,
    #[validate(length(min = 1, message = "Renter printed name is required"))]
    pub renter_printed_name: String,
    #[validate(length(min = 1, message = "Digital signature is required"))]
    pub digital_signature: String,
}

impl RentalInput {
    pub fn all_terms_acknowledged(&self) -> bool {
        self.ack_payment_terms && self.ack_relocation_terms && self.ack_additional_terms
    }
}
