//! Per-session workspace
//!
//! A [`Session`] is created on sign-in and holds everything one dashboard
//! session owns: mirrored collections, toasts, the loading indicator, the
//! inactivity timer and the admin-key gate. The [`SessionManager`] creates
//! and ends sessions and publishes sign-in / sign-out changes.

pub mod audit;
pub mod dispatch;
pub mod gate;
pub mod inactivity;
pub mod toast;

use std::{collections::HashMap, future::Future, sync::Arc};

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Serialize;
use tokio::sync::{watch, Mutex, RwLock};
use utoipa::ToSchema;

use crate::{
    config::{EmailConfig, SessionConfig},
    error::{AppError, AppResult},
    models::{log_entry::ActionType, user::User},
    repository::SharedStore,
    services::{email::EmailSender, settings::SettingsService},
    sync::{Mirror, SubmissionMonitor, SyncEngine},
};

use self::{
    audit::AuditTrail,
    dispatch::ActionDispatcher,
    gate::AdminKeyGate,
    inactivity::{ActivityEvent, InactivityTimer},
    toast::ToastCenter,
};

pub const INACTIVITY_MESSAGE: &str = "You have been logged out due to inactivity.";

/// Ended sessions are remembered this long to explain a rejected token
const ENDED_RETENTION_HOURS: i64 = 24;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    SignedOut,
    Inactivity,
    ProfileMissing,
}

impl EndReason {
    pub fn message(&self) -> &'static str {
        match self {
            EndReason::SignedOut => "Session signed out",
            EndReason::Inactivity => INACTIVITY_MESSAGE,
            EndReason::ProfileMissing => {
                "Your user account was not found in the database. Please register or contact an administrator."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    SignedIn,
    SignedOut,
}

/// Published on every sign-in and sign-out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthChange {
    pub session_id: String,
    pub user_id: String,
    pub state: AuthState,
}

/// Session status as reported to the client
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub session_id: String,
    pub user: User,
    pub started_at: DateTime<Utc>,
    pub loading: bool,
    pub admin_key_verified: bool,
    pub inactivity_timeout_secs: u64,
}

pub struct Session {
    pub id: String,
    pub user: User,
    pub started_at: DateTime<Utc>,
    pub toasts: ToastCenter,
    pub dispatcher: ActionDispatcher,
    pub audit: AuditTrail,
    pub gate: AdminKeyGate,
    sync: SyncEngine,
    inactivity: Mutex<Option<InactivityTimer>>,
    inactivity_timeout_secs: u64,
}

impl Session {
    pub fn mirror(&self) -> &Mirror {
        self.sync.mirror()
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if self.user.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Admin role required".to_string()))
        }
    }

    /// Run an action through the dispatcher and audit it on success
    pub async fn perform<T, Fut, D>(
        &self,
        action_type: ActionType,
        entity: &str,
        action: Fut,
        describe: D,
    ) -> AppResult<T>
    where
        Fut: Future<Output = AppResult<T>>,
        D: FnOnce(&T) -> String,
    {
        let value = self.dispatcher.run(action).await?;
        let details = describe(&value);
        self.audit
            .record(&self.user, action_type, entity, &details)
            .await;
        Ok(value)
    }

    /// Client-reported activity resets the inactivity countdown
    pub async fn touch(&self, event: ActivityEvent) {
        if let Some(timer) = self.inactivity.lock().await.as_ref() {
            timer.touch(event);
        }
    }

    pub async fn status(&self) -> SessionStatus {
        SessionStatus {
            session_id: self.id.clone(),
            user: self.user.clone(),
            started_at: self.started_at,
            loading: self.dispatcher.is_loading(),
            admin_key_verified: self.gate.is_verified().await,
            inactivity_timeout_secs: self.inactivity_timeout_secs,
        }
    }

    async fn shutdown(&self) {
        if let Some(timer) = self.inactivity.lock().await.take() {
            timer.stop();
        }
        self.sync.stop().await;
    }
}

struct EndedSession {
    reason: EndReason,
    ended_at: DateTime<Utc>,
}

struct ManagerInner {
    store: SharedStore,
    settings: SettingsService,
    email: Arc<dyn EmailSender>,
    email_config: Arc<EmailConfig>,
    config: SessionConfig,
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    ended: RwLock<HashMap<String, EndedSession>>,
    auth_changes: watch::Sender<Option<AuthChange>>,
}

/// Registry of live sessions
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<ManagerInner>,
}

impl SessionManager {
    pub fn new(
        store: SharedStore,
        settings: SettingsService,
        email: Arc<dyn EmailSender>,
        email_config: EmailConfig,
        config: SessionConfig,
    ) -> Self {
        let (auth_changes, _) = watch::channel(None);
        Self {
            inner: Arc::new(ManagerInner {
                store,
                settings,
                email,
                email_config: Arc::new(email_config),
                config,
                sessions: RwLock::new(HashMap::new()),
                ended: RwLock::new(HashMap::new()),
                auth_changes,
            }),
        }
    }

    /// Sign-in / sign-out notifications
    pub fn auth_changes(&self) -> watch::Receiver<Option<AuthChange>> {
        self.inner.auth_changes.subscribe()
    }

    /// Create a session for a signed-in user and start its live mirrors
    pub async fn open(&self, user: User) -> Arc<Session> {
        let inner = &self.inner;
        let id = uuid::Uuid::new_v4().to_string();
        let toasts = ToastCenter::new();

        let session = Arc::new(Session {
            id: id.clone(),
            user,
            started_at: Utc::now(),
            dispatcher: ActionDispatcher::new(inner.config.action_delay(), toasts.clone()),
            audit: AuditTrail::new(
                inner.store.clone(),
                inner.email.clone(),
                inner.email_config.clone(),
                inner.settings.clone(),
                toasts.clone(),
            ),
            gate: AdminKeyGate::new(inner.settings.clone(), toasts.clone()),
            sync: SyncEngine::new(
                inner.store.clone(),
                Mirror::new(),
                SubmissionMonitor::new(toasts.clone()),
            ),
            toasts,
            inactivity: Mutex::new(None),
            inactivity_timeout_secs: inner.config.inactivity_timeout_secs,
        });

        session.sync.start().await;

        let manager = self.clone();
        let expired_id = id.clone();
        let timer = InactivityTimer::start(inner.config.inactivity_timeout(), move || async move {
            manager.expire(&expired_id).await;
        });
        *session.inactivity.lock().await = Some(timer);

        inner.sessions.write().await.insert(id.clone(), session.clone());
        tracing::info!(session = %id, user = %session.user.email, "Session opened");
        inner.auth_changes.send_replace(Some(AuthChange {
            session_id: id,
            user_id: session.user.id.clone(),
            state: AuthState::SignedIn,
        }));

        session
    }

    /// Resolve a live session; ended sessions explain why they are gone
    pub async fn get(&self, id: &str) -> AppResult<Arc<Session>> {
        if let Some(session) = self.inner.sessions.read().await.get(id) {
            return Ok(session.clone());
        }
        match self.inner.ended.read().await.get(id) {
            Some(ended) => Err(AppError::Authentication(ended.reason.message().to_string())),
            None => Err(AppError::Authentication("Session not found".to_string())),
        }
    }

    /// End a session: stop its timer, abort its subscriptions, clear its mirrors
    pub async fn end(&self, id: &str, reason: EndReason) -> AppResult<()> {
        let session = self
            .inner
            .sessions
            .write()
            .await
            .remove(id)
            .ok_or_else(|| AppError::Authentication("Session not found".to_string()))?;

        session.shutdown().await;

        let now = Utc::now();
        {
            let mut ended = self.inner.ended.write().await;
            ended.retain(|_, e| now - e.ended_at < ChronoDuration::hours(ENDED_RETENTION_HOURS));
            ended.insert(
                id.to_string(),
                EndedSession {
                    reason,
                    ended_at: now,
                },
            );
        }

        tracing::info!(session = %id, ?reason, "Session ended");
        self.inner.auth_changes.send_replace(Some(AuthChange {
            session_id: id.to_string(),
            user_id: session.user.id.clone(),
            state: AuthState::SignedOut,
        }));
        Ok(())
    }

    async fn expire(&self, id: &str) {
        if let Ok(session) = self.get(id).await {
            session.toasts.info("Session Expired", INACTIVITY_MESSAGE).await;
        }
        if let Err(e) = self.end(id, EndReason::Inactivity).await {
            tracing::debug!("Expired session already gone: {}", e);
        }
    }

    pub async fn active_count(&self) -> usize {
        self.inner.sessions.read().await.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        models::user::Role,
        repository::MemoryStore,
        services::email::MockEmailSender,
    };
    use std::time::Duration;

    pub(crate) fn user(name: &str, role: Role) -> User {
        User {
            id: format!("uid-{}", name.to_lowercase()),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            role,
            avatar: User::avatar_for(name),
        }
    }

    pub(crate) async fn manager_with(store: SharedStore, config: SessionConfig) -> SessionManager {
        let settings = SettingsService::new(store.clone()).await.unwrap();
        SessionManager::new(
            store,
            settings,
            Arc::new(MockEmailSender::new()),
            EmailConfig::default(),
            config,
        )
    }

    pub(crate) fn quick_config() -> SessionConfig {
        SessionConfig {
            inactivity_timeout_secs: 300,
            action_delay_ms: 0,
        }
    }

    #[tokio::test]
    async fn test_open_get_end() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let manager = manager_with(store, quick_config()).await;
        let mut changes = manager.auth_changes();

        let session = manager.open(user("Ada", Role::Admin)).await;
        assert_eq!(manager.active_count().await, 1);
        assert!(manager.get(&session.id).await.is_ok());
        changes.changed().await.unwrap();
        assert_eq!(changes.borrow().as_ref().unwrap().state, AuthState::SignedIn);

        manager.end(&session.id, EndReason::SignedOut).await.unwrap();
        assert_eq!(manager.active_count().await, 0);
        assert!(matches!(
            manager.get(&session.id).await,
            Err(AppError::Authentication(_))
        ));
        assert_eq!(changes.borrow().as_ref().unwrap().state, AuthState::SignedOut);
        assert!(!session.mirror().is_loaded("contacts").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_inactivity_signs_out() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let manager = manager_with(store, quick_config()).await;
        let session = manager.open(user("Ada", Role::Admin)).await;
        let mut toasts = session.toasts.stream();

        tokio::time::sleep(Duration::from_secs(301)).await;
        let toast = toasts.recv().await.unwrap();
        assert_eq!(toast.title, "Session Expired");
        assert_eq!(toast.message, INACTIVITY_MESSAGE);

        let message = loop {
            match manager.get(&session.id).await {
                Err(AppError::Authentication(msg)) => break msg,
                _ => tokio::task::yield_now().await,
            }
        };
        assert_eq!(message, INACTIVITY_MESSAGE);
    }

    #[tokio::test]
    async fn test_require_admin() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let manager = manager_with(store, quick_config()).await;
        let session = manager.open(user("Bo", Role::User)).await;
        assert!(matches!(session.require_admin(), Err(AppError::Authorization(_))));
    }
}
