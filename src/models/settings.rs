//! Shared settings document read by every session

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub const SETTINGS: &str = "settings";
pub const SETTINGS_DOC: &str = "main";
pub const DEFAULT_ADMIN_KEY: &str = "admin";

/// `null` decodes like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_enabled<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// A `null` or empty key falls back to [`DEFAULT_ADMIN_KEY`]
fn admin_key_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|key| !key.is_empty())
        .unwrap_or_else(|| DEFAULT_ADMIN_KEY.to_string()))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SmsSettings {
    #[serde(deserialize_with = "null_as_default")]
    pub account_sid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub auth_token: String,
    #[serde(deserialize_with = "null_as_default")]
    pub twilio_phone_number: String,
}

impl SmsSettings {
    pub fn is_configured(&self) -> bool {
        !self.account_sid.is_empty()
            && !self.auth_token.is_empty()
            && !self.twilio_phone_number.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationSettings {
    #[serde(deserialize_with = "null_as_enabled")]
    pub sms_enabled: bool,
    #[serde(deserialize_with = "null_as_enabled")]
    pub email_enabled: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            sms_enabled: true,
            email_enabled: true,
        }
    }
}

/// The `settings/main` document; missing or `null` fields fall back to
/// defaults one by one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    pub app_logo: Option<String>,
    pub splash_logo: Option<String>,
    #[serde(deserialize_with = "admin_key_or_default")]
    pub admin_key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sms_settings: SmsSettings,
    #[serde(deserialize_with = "null_as_default")]
    pub notification_settings: NotificationSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            app_logo: None,
            splash_logo: None,
            admin_key: DEFAULT_ADMIN_KEY.to_string(),
            sms_settings: SmsSettings::default(),
            notification_settings: NotificationSettings::default(),
        }
    }
}

/// Public view of the settings (never exposes the admin key or SMS token)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub app_logo: Option<String>,
    pub splash_logo: Option<String>,
    pub sms_configured: bool,
    pub sms_phone_number: String,
    pub notification_settings: NotificationSettings,
}

impl From<&AppSettings> for SettingsView {
    fn from(settings: &AppSettings) -> Self {
        Self {
            app_logo: settings.app_logo.clone(),
            splash_logo: settings.splash_logo.clone(),
            sms_configured: settings.sms_settings.is_configured(),
            sms_phone_number: settings.sms_settings.twilio_phone_number.clone(),
            notification_settings: settings.notification_settings.clone(),
        }
    }
}

/// Logo update; `null` resets to the default logo
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLogo {
    pub logo: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdminKey {
    #[validate(length(min = 4, message = "Admin Key must be at least 4 characters long."))]
    pub admin_key: String,
}
