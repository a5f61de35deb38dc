//! Settings service
//!
//! The `settings/main` document is shared by every session. Its decoded form
//! is cached in a `watch` channel that is refreshed by a live subscription,
//! so changes made elsewhere are picked up without polling.

use std::sync::Arc;

use tokio::sync::watch;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        document::{to_document_data, CollectionQuery, Direction, Document, DocumentData},
        log_entry::ActionType,
        settings::{
            AppSettings, NotificationSettings, SettingsView, SmsSettings, UpdateAdminKey,
            SETTINGS, SETTINGS_DOC,
        },
    },
    repository::{subscribe, SharedStore},
    session::Session,
};

const ENTITY: &str = "Settings";

/// Which logo an update targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoKind {
    App,
    Splash,
}

impl LogoKind {
    fn field(&self) -> &'static str {
        match self {
            LogoKind::App => "appLogo",
            LogoKind::Splash => "splashLogo",
        }
    }

    fn audit_details(&self) -> &'static str {
        match self {
            LogoKind::App => "Updated Application Logo",
            LogoKind::Splash => "Updated Splash Screen Logo",
        }
    }
}

#[derive(Clone)]
pub struct SettingsService {
    store: SharedStore,
    cache: Arc<watch::Sender<AppSettings>>,
}

fn decode(document: Option<&Document>) -> AppSettings {
    match document.map(|d| d.to_entity::<AppSettings>()) {
        Some(Ok(settings)) => settings,
        Some(Err(e)) => {
            tracing::warn!("Invalid settings document, using defaults: {}", e);
            AppSettings::default()
        }
        None => AppSettings::default(),
    }
}

impl SettingsService {
    /// Load the settings and start watching them
    pub async fn new(store: SharedStore) -> AppResult<Self> {
        let mut subscription = subscribe(
            &store,
            CollectionQuery::new(SETTINGS, "adminKey", Direction::Asc),
        );
        let initial = subscription.next().await?;
        let current = decode(initial.documents.iter().find(|d| d.id == SETTINGS_DOC));

        let (cache, _) = watch::channel(current);
        let cache = Arc::new(cache);

        let watcher = cache.clone();
        tokio::spawn(async move {
            loop {
                match subscription.next().await {
                    Ok(snapshot) => {
                        let settings =
                            decode(snapshot.documents.iter().find(|d| d.id == SETTINGS_DOC));
                        watcher.send_if_modified(|cached| {
                            if *cached == settings {
                                false
                            } else {
                                *cached = settings;
                                true
                            }
                        });
                        tracing::debug!("Settings refreshed");
                    }
                    Err(e) => {
                        tracing::error!("Settings watcher stopped: {}", e);
                        break;
                    }
                }
            }
        });

        Ok(Self { store, cache })
    }

    /// Current settings
    pub fn current(&self) -> AppSettings {
        self.cache.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<AppSettings> {
        self.cache.subscribe()
    }

    pub fn admin_key(&self) -> String {
        self.cache.borrow().admin_key.clone()
    }

    pub fn email_enabled(&self) -> bool {
        self.cache.borrow().notification_settings.email_enabled
    }

    /// Public settings view
    pub fn view(&self) -> SettingsView {
        SettingsView::from(&*self.cache.borrow())
    }

    /// Merge fields into the settings document, creating it with defaults if missing
    pub async fn save(&self, fields: DocumentData) -> AppResult<AppSettings> {
        let document = match self.store.update(SETTINGS, SETTINGS_DOC, fields.clone()).await {
            Ok(document) => document,
            Err(AppError::NotFound(_)) => {
                let mut data = to_document_data(&AppSettings::default())?;
                data.extend(fields);
                self.store.set(SETTINGS, SETTINGS_DOC, data).await?
            }
            Err(e) => return Err(e),
        };
        let settings = decode(Some(&document));
        self.cache.send_replace(settings.clone());
        Ok(settings)
    }

    async fn save_field<T: serde::Serialize>(&self, field: &str, value: &T) -> AppResult<AppSettings> {
        let mut fields = DocumentData::new();
        fields.insert(field.to_string(), serde_json::to_value(value)?);
        self.save(fields).await
    }

    /// Set the shared admin key without auditing (first registration)
    pub async fn store_admin_key(&self, key: &str) -> AppResult<AppSettings> {
        self.save_field("adminKey", &key).await
    }

    /// Update or reset (`None`) a logo
    pub async fn update_logo(
        &self,
        session: &Session,
        kind: LogoKind,
        logo: Option<String>,
    ) -> AppResult<SettingsView> {
        session.require_admin()?;
        let settings = session
            .perform(
                ActionType::Update,
                ENTITY,
                self.save_field(kind.field(), &logo),
                |_| kind.audit_details().to_string(),
            )
            .await?;
        Ok(SettingsView::from(&settings))
    }

    pub async fn update_sms_settings(
        &self,
        session: &Session,
        sms: SmsSettings,
    ) -> AppResult<SettingsView> {
        session.require_admin()?;
        let settings = session
            .perform(
                ActionType::Update,
                ENTITY,
                self.save_field("smsSettings", &sms),
                |_| "Updated Twilio SMS Settings".to_string(),
            )
            .await?;
        Ok(SettingsView::from(&settings))
    }

    pub async fn update_admin_key(
        &self,
        session: &Session,
        request: UpdateAdminKey,
    ) -> AppResult<()> {
        session.require_admin()?;
        session
            .perform(
                ActionType::Update,
                ENTITY,
                async {
                    request.validate()?;
                    self.store_admin_key(&request.admin_key).await?;
                    session
                        .toasts
                        .success("Success", "Admin Key updated successfully.")
                        .await;
                    Ok::<_, AppError>(())
                },
                |_| "Updated Admin Registration Key".to_string(),
            )
            .await
    }

    /// Notification toggles are saved without an audit entry
    pub async fn update_notification_settings(
        &self,
        session: &Session,
        notifications: NotificationSettings,
    ) -> AppResult<SettingsView> {
        session.require_admin()?;
        let settings = session
            .dispatcher
            .run(self.save_field("notificationSettings", &notifications))
            .await?;
        Ok(SettingsView::from(&settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;
    use crate::sync::tests::data;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_defaults_when_document_missing() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let settings = SettingsService::new(store).await.unwrap();
        assert_eq!(settings.admin_key(), "admin");
        assert!(settings.email_enabled());
    }

    #[tokio::test]
    async fn test_save_creates_then_merges() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let settings = SettingsService::new(store.clone()).await.unwrap();

        settings.store_admin_key("s3cret").await.unwrap();
        settings
            .save_field("appLogo", &Some("data:image/png;base64,AA"))
            .await
            .unwrap();

        let current = settings.current();
        assert_eq!(current.admin_key, "s3cret");
        assert_eq!(current.app_logo.as_deref(), Some("data:image/png;base64,AA"));

        let stored = store.get(SETTINGS, SETTINGS_DOC).await.unwrap().unwrap();
        assert_eq!(stored.str_field("adminKey"), Some("s3cret"));
    }

    #[tokio::test]
    async fn test_external_change_refreshes_cache() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let settings = SettingsService::new(store.clone()).await.unwrap();
        let mut watch = settings.watch();

        store
            .set(SETTINGS, SETTINGS_DOC, data(json!({ "adminKey": "from-elsewhere" })))
            .await
            .unwrap();

        tokio::time::timeout(Duration::from_secs(5), watch.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(settings.admin_key(), "from-elsewhere");
    }
}
