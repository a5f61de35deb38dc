//! Activity log (audit trail) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const ACTIVITY_LOGS: &str = "activity_logs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionType {
    Create,
    Update,
    Delete,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Create => "CREATE",
            ActionType::Update => "UPDATE",
            ActionType::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Audit record of an administrative action. Never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub admin_name: String,
    pub admin_email: String,
    pub action_type: ActionType,
    pub entity: String,
    pub details: String,
}

/// Log entry before it is stored
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLogEntry {
    pub timestamp: DateTime<Utc>,
    pub admin_name: String,
    pub admin_email: String,
    pub action_type: ActionType,
    pub entity: String,
    pub details: String,
}

/// Activity log search
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct LogQuery {
    /// Case-insensitive match on admin name, action, entity or details
    pub filter: Option<String>,
}

impl LogEntry {
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.admin_name.to_lowercase().contains(needle_lower)
            || self.action_type.as_str().to_lowercase().contains(needle_lower)
            || self.entity.to_lowercase().contains(needle_lower)
            || self.details.to_lowercase().contains(needle_lower)
    }
}
