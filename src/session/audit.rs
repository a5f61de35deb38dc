//! Audit trail: activity log entries plus best-effort email notification

use std::sync::Arc;

use chrono::Utc;

use super::toast::ToastCenter;
use crate::{
    config::EmailConfig,
    error::AppError,
    models::{
        document::to_document_data,
        log_entry::{ActionType, NewLogEntry, ACTIVITY_LOGS},
        user::User,
    },
    repository::SharedStore,
    services::{
        email::{AuditEmail, EmailSender},
        settings::SettingsService,
    },
};

#[derive(Clone)]
pub struct AuditTrail {
    store: SharedStore,
    email: Arc<dyn EmailSender>,
    email_config: Arc<EmailConfig>,
    settings: SettingsService,
    toasts: ToastCenter,
}

impl AuditTrail {
    pub fn new(
        store: SharedStore,
        email: Arc<dyn EmailSender>,
        email_config: Arc<EmailConfig>,
        settings: SettingsService,
        toasts: ToastCenter,
    ) -> Self {
        Self {
            store,
            email,
            email_config,
            settings,
            toasts,
        }
    }

    /// Record a completed action. Failures are reported as toasts only.
    pub async fn record(&self, actor: &User, action_type: ActionType, entity: &str, details: &str) {
        let entry = NewLogEntry {
            timestamp: Utc::now(),
            admin_name: actor.name.clone(),
            admin_email: actor.email.clone(),
            action_type,
            entity: entity.to_string(),
            details: details.to_string(),
        };

        let written = match to_document_data(&entry) {
            Ok(data) => self.store.insert(ACTIVITY_LOGS, data).await.map(|_| ()),
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            tracing::error!("Error logging action: {}", e);
            self.toasts
                .error("Action Failed", "The database operation could not be completed.")
                .await;
            return;
        }
        tracing::info!(
            admin = %actor.email,
            action = %action_type,
            entity,
            "{}",
            details
        );

        if !self.email_config.enabled || !self.settings.email_enabled() {
            return;
        }

        let email = AuditEmail::new(
            &self.email_config,
            &actor.name,
            &actor.email,
            action_type,
            entity,
            details,
        );
        if let Err(e) = self.email.send_audit(&email).await {
            tracing::error!("Audit email failed: {}", e);
            let reason = match e {
                AppError::Notification(reason) => reason,
                other => other.to_string(),
            };
            self.toasts
                .error("Email Log Failed", format!("Log saved, but email failed: {}", reason))
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            document::{CollectionQuery, Direction},
            log_entry::LogEntry,
            user::Role,
        },
        repository::MemoryStore,
        services::email::MockEmailSender,
    };

    fn admin() -> User {
        User {
            id: "u1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: Role::Admin,
            avatar: String::new(),
        }
    }

    async fn trail(email: MockEmailSender, enabled: bool) -> (AuditTrail, SharedStore, ToastCenter) {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let settings = SettingsService::new(store.clone()).await.unwrap();
        let toasts = ToastCenter::new();
        let config = EmailConfig {
            enabled,
            ..EmailConfig::default()
        };
        let trail = AuditTrail::new(
            store.clone(),
            Arc::new(email),
            Arc::new(config),
            settings,
            toasts.clone(),
        );
        (trail, store, toasts)
    }

    async fn logs(store: &SharedStore) -> Vec<LogEntry> {
        store
            .list(&CollectionQuery::new(ACTIVITY_LOGS, "timestamp", Direction::Desc))
            .await
            .unwrap()
            .iter()
            .map(|d| d.to_entity().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_entry_written_and_email_sent() {
        let mut email = MockEmailSender::new();
        email
            .expect_send_audit()
            .withf(|e| e.subject == "[CMS Log] CREATE Client" && e.details == "Created client Bob")
            .times(1)
            .returning(|_| Ok(()));

        let (trail, store, toasts) = trail(email, true).await;
        trail
            .record(&admin(), ActionType::Create, "Client", "Created client Bob")
            .await;

        let entries = logs(&store).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].admin_name, "Ada");
        assert_eq!(entries[0].action_type, ActionType::Create);
        assert!(toasts.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_email_failure_keeps_log() {
        let mut email = MockEmailSender::new();
        email
            .expect_send_audit()
            .returning(|_| Err(AppError::Notification("quota exceeded".into())));

        let (trail, store, toasts) = trail(email, true).await;
        trail
            .record(&admin(), ActionType::Delete, "Rental", "Deleted rental r1")
            .await;

        assert_eq!(logs(&store).await.len(), 1);
        let queued = toasts.list().await;
        assert_eq!(queued[0].title, "Email Log Failed");
        assert_eq!(queued[0].message, "Log saved, but email failed: quota exceeded");
    }

    #[tokio::test]
    async fn test_email_disabled_sends_nothing() {
        let mut email = MockEmailSender::new();
        email.expect_send_audit().times(0);

        let (trail, store, _) = trail(email, false).await;
        trail
            .record(&admin(), ActionType::Update, "Vendor", "Updated vendor Acme")
            .await;
        assert_eq!(logs(&store).await.len(), 1);
    }
}
