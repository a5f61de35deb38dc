//! Data models for SpinCity

pub mod contact;
pub mod document;
pub mod inventory;
pub mod log_entry;
pub mod rental;
pub mod repair;
pub mod report;
pub mod sale;
pub mod settings;
pub mod submission;
pub mod user;
pub mod vendor;

// Re-export commonly used types
pub use contact::Contact;
pub use document::{CollectionQuery, Direction, Document, DocumentData, Snapshot};
pub use inventory::{InventoryItem, InventoryStatus};
pub use log_entry::{ActionType, LogEntry};
pub use rental::{Rental, RentalPlan, RentalStatus};
pub use repair::{Repair, RepairStatus};
pub use report::{DashboardStats, PeriodReport, ReportPeriod};
pub use sale::Sale;
pub use settings::AppSettings;
pub use submission::{SiteContact, SiteRental, SiteRepair, SubmissionKind, SubmissionStatus};
pub use user::{Role, User};
pub use vendor::Vendor;
