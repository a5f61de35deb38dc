//! Dashboard counters and period reports

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Reporting window, relative to the server's local date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Daily,
    Monthly,
    Yearly,
    #[default]
    All,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ReportQuery {
    #[serde(default)]
    pub period: ReportPeriod,
}

/// Headline counters of the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_clients: usize,
    pub active_rentals: usize,
    pub open_repairs: usize,
    pub system_users: usize,
}

/// New records per source within a period
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReport {
    pub period: ReportPeriod,
    pub new_contacts: usize,
    pub new_rentals: usize,
    pub new_repairs: usize,
    pub completed_repairs: usize,
    pub new_site_contacts: usize,
    pub new_site_rentals: usize,
    pub new_site_repairs: usize,
}
