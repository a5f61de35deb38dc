//! Email service for audit notifications
//!
//! Messages go through a transactional email HTTP API (EmailJS-compatible):
//! the server posts a template id plus template parameters and the provider
//! renders and delivers the email.

use async_trait::async_trait;
use serde::Serialize;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
    models::log_entry::ActionType,
};

/// Template parameters of an audit notification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEmail {
    pub to_email: String,
    /// Same as `to_email`, some templates read this one
    pub email: String,
    pub to_name: String,
    pub from_name: String,
    pub from_email: String,
    pub subject: String,
    pub action_type: ActionType,
    pub entity: String,
    pub admin_name: String,
    pub admin_email: String,
    pub timestamp: String,
    pub details: String,
    /// Same as `details`
    pub message: String,
}

impl AuditEmail {
    pub fn new(
        config: &EmailConfig,
        admin_name: &str,
        admin_email: &str,
        action_type: ActionType,
        entity: &str,
        details: &str,
    ) -> Self {
        Self {
            to_email: config.recipient.clone(),
            email: config.recipient.clone(),
            to_name: config.recipient_name.clone(),
            from_name: admin_name.to_string(),
            from_email: admin_email.to_string(),
            subject: format!("[CMS Log] {} {}", action_type, entity),
            action_type,
            entity: entity.to_string(),
            admin_name: admin_name.to_string(),
            admin_email: admin_email.to_string(),
            timestamp: chrono::Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
            details: details.to_string(),
            message: details.to_string(),
        }
    }
}

/// Outgoing email transport
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_audit(&self, email: &AuditEmail) -> AppResult<()>;
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a AuditEmail,
}

/// Email service backed by the provider's HTTP API
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
    client: reqwest::Client,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EmailSender for EmailService {
    async fn send_audit(&self, email: &AuditEmail) -> AppResult<()> {
        let request = SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            template_params: email,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Notification(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Notification(format!(
                "Email API error: {} (Status: {})",
                text,
                status.as_u16()
            )));
        }

        tracing::debug!("Audit email sent: {}", email.subject);
        Ok(())
    }
}
