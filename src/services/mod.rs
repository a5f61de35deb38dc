//! Business logic services

pub mod activity;
pub mod auth;
pub mod contacts;
pub mod email;
pub mod inventory;
pub mod rentals;
pub mod reports;
pub mod repairs;
pub mod sales;
pub mod settings;
pub mod submissions;
pub mod users;
pub mod vendors;

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    models::document::{Document, DocumentData},
    repository::SharedStore,
    session::SessionManager,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub store: SharedStore,
    pub sessions: SessionManager,
    pub settings: settings::SettingsService,
    pub auth: auth::AuthService,
    pub users: users::UsersService,
    pub contacts: contacts::ContactsService,
    pub rentals: rentals::RentalsService,
    pub repairs: repairs::RepairsService,
    pub inventory: inventory::InventoryService,
    pub sales: sales::SalesService,
    pub vendors: vendors::VendorsService,
    pub activity: activity::ActivityService,
    pub submissions: submissions::SubmissionsService,
    pub reports: reports::ReportsService,
}

impl Services {
    /// Create all services on top of the given document store
    pub async fn new(
        store: SharedStore,
        config: &AppConfig,
        email: Arc<dyn email::EmailSender>,
    ) -> AppResult<Self> {
        let settings = settings::SettingsService::new(store.clone()).await?;
        let sessions = SessionManager::new(
            store.clone(),
            settings.clone(),
            email,
            config.email.clone(),
            config.session.clone(),
        );

        Ok(Self {
            auth: auth::AuthService::new(
                store.clone(),
                settings.clone(),
                sessions.clone(),
                config.auth.clone(),
            ),
            users: users::UsersService::new(store.clone()),
            contacts: contacts::ContactsService::new(store.clone()),
            rentals: rentals::RentalsService::new(store.clone()),
            repairs: repairs::RepairsService::new(store.clone()),
            inventory: inventory::InventoryService::new(store.clone()),
            sales: sales::SalesService::new(store.clone()),
            vendors: vendors::VendorsService::new(store.clone()),
            activity: activity::ActivityService::new(store.clone()),
            submissions: submissions::SubmissionsService::new(store.clone()),
            reports: reports::ReportsService::new(),
            settings,
            sessions,
            store,
        })
    }
}

/// Insert a document and decode the stored entity
pub(crate) async fn insert_entity<T: DeserializeOwned>(
    store: &SharedStore,
    collection: &str,
    data: DocumentData,
) -> AppResult<T> {
    store.insert(collection, data).await?.to_entity()
}

/// Merge fields into an existing document and decode the result
pub(crate) async fn update_entity<T: DeserializeOwned>(
    store: &SharedStore,
    collection: &str,
    id: &str,
    data: DocumentData,
) -> AppResult<T> {
    store.update(collection, id, data).await?.to_entity()
}

/// Delete an existing document, returning what was removed
pub(crate) async fn delete_entity(
    store: &SharedStore,
    collection: &str,
    id: &str,
) -> AppResult<Document> {
    let document = store
        .get(collection, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {}/{} not found", collection, id)))?;
    store.delete(collection, id).await?;
    Ok(document)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        config::{EmailConfig, SessionConfig},
        models::user::{RegisterUser, User},
        repository::MemoryStore,
        services::email::MockEmailSender,
        session::Session,
    };

    pub(crate) use crate::sync::tests::{data, settle};

    pub(crate) async fn fixture() -> (Services, SharedStore) {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let config = AppConfig {
            email: EmailConfig::default(),
            session: SessionConfig {
                inactivity_timeout_secs: 300,
                action_delay_ms: 0,
            },
            ..AppConfig::default()
        };
        let services = Services::new(store.clone(), &config, Arc::new(MockEmailSender::new()))
            .await
            .unwrap();
        (services, store)
    }

    /// Register the first account (Admin) and return its session
    pub(crate) async fn admin_session(services: &Services) -> Arc<Session> {
        let response = services
            .auth
            .register(RegisterUser {
                name: "Ada Admin".into(),
                email: "ada@example.com".into(),
                password: "secret".into(),
                admin_key: Some("open-sesame".into()),
            })
            .await
            .unwrap();
        services.sessions.get(&response.session_id).await.unwrap()
    }

    pub(crate) async fn session_for(services: &Services, user: User) -> Arc<Session> {
        services.sessions.open(user).await
    }
}
