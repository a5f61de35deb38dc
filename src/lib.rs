//! SpinCity back-office server
//!
//! REST JSON API for a washer/dryer rental, repair and sales business:
//! clients, rental agreements, repair tickets, machine inventory, sales,
//! vendors, an audit log, public website submissions and reports. Each
//! signed-in user gets a session with live collection mirrors, toasts,
//! an inactivity sign-out and an admin-key gate for destructive actions.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod session;
pub mod sync;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
