//! Admin-key confirmation gate for destructive actions

use tokio::sync::Mutex;

use super::toast::ToastCenter;
use crate::{
    error::{AppError, AppResult},
    services::settings::SettingsService,
};

pub const VERIFIED_MESSAGE: &str = "Admin key verified successfully.";
pub const INCORRECT_MESSAGE: &str = "Incorrect Admin Key.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum GateState {
    Locked,
    Verified { token: String },
}

/// Two-step confirmation: verify the shared admin key, then spend the
/// single-use token on exactly one destructive action
pub struct AdminKeyGate {
    state: Mutex<GateState>,
    pending_action: Mutex<Option<String>>,
    settings: SettingsService,
    toasts: ToastCenter,
}

impl AdminKeyGate {
    pub fn new(settings: SettingsService, toasts: ToastCenter) -> Self {
        Self {
            state: Mutex::new(GateState::Locked),
            pending_action: Mutex::new(None),
            settings,
            toasts,
        }
    }

    /// Start a confirmation for `action`, discarding any earlier one
    pub async fn open(&self, action: Option<String>) {
        *self.state.lock().await = GateState::Locked;
        *self.pending_action.lock().await = action;
    }

    pub async fn pending_action(&self) -> Option<String> {
        self.pending_action.lock().await.clone()
    }

    pub async fn is_verified(&self) -> bool {
        matches!(*self.state.lock().await, GateState::Verified { .. })
    }

    /// Compare the entered key with the current admin key
    pub async fn verify(&self, entered: &str) -> AppResult<String> {
        let mut state = self.state.lock().await;
        if entered == self.settings.admin_key() {
            let token = uuid::Uuid::new_v4().to_string();
            *state = GateState::Verified {
                token: token.clone(),
            };
            self.toasts.success("Admin Key", VERIFIED_MESSAGE).await;
            Ok(token)
        } else {
            *state = GateState::Locked;
            self.toasts.error("Admin Key", INCORRECT_MESSAGE).await;
            Err(AppError::Confirmation(INCORRECT_MESSAGE.to_string()))
        }
    }

    /// Spend the confirmation token; the gate locks again either way
    pub async fn confirm(&self, token: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let previous = std::mem::replace(&mut *state, GateState::Locked);
        *self.pending_action.lock().await = None;
        match previous {
            GateState::Verified { token: expected } if expected == token => Ok(()),
            _ => Err(AppError::Confirmation(
                "Verify the admin key before confirming this action".to_string(),
            )),
        }
    }
}
