//! Settings endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::settings::{
        NotificationSettings, SettingsView, SmsSettings, UpdateAdminKey, UpdateLogo,
    },
    services::settings::LogoKind,
};

use super::AuthenticatedSession;

/// Logos shown before sign-in
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    pub app_logo: Option<String>,
    pub splash_logo: Option<String>,
}

/// Logos for the splash and login screens
#[utoipa::path(
    get,
    path = "/settings/branding",
    tag = "settings",
    responses(
        (status = 200, description = "Current logos", body = Branding)
    )
)]
pub async fn get_branding(State(state): State<crate::AppState>) -> Json<Branding> {
    let settings = state.services.settings.current();
    Json(Branding {
        app_logo: settings.app_logo,
        splash_logo: settings.splash_logo,
    })
}

/// Get current settings
#[utoipa::path(
    get,
    path = "/settings",
    tag = "settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current settings", body = SettingsView)
    )
)]
pub async fn get_settings(
    State(state): State<crate::AppState>,
    AuthenticatedSession(_session): AuthenticatedSession,
) -> Json<SettingsView> {
    Json(state.services.settings.view())
}

/// Update or reset the application logo
#[utoipa::path(
    put,
    path = "/settings/app-logo",
    tag = "settings",
    security(("bearer_auth" = [])),
    request_body = UpdateLogo,
    responses(
        (status = 200, description = "Settings updated", body = SettingsView),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn update_app_logo(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Json(request): Json<UpdateLogo>,
) -> AppResult<Json<SettingsView>> {
    let view = state
        .services
        .settings
        .update_logo(&session, LogoKind::App, request.logo)
        .await?;
    Ok(Json(view))
}

/// Update or reset the splash screen logo
#[utoipa::path(
    put,
    path = "/settings/splash-logo",
    tag = "settings",
    security(("bearer_auth" = [])),
    request_body = UpdateLogo,
    responses(
        (status = 200, description = "Settings updated", body = SettingsView),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn update_splash_logo(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Json(request): Json<UpdateLogo>,
) -> AppResult<Json<SettingsView>> {
    let view = state
        .services
        .settings
        .update_logo(&session, LogoKind::Splash, request.logo)
        .await?;
    Ok(Json(view))
}

/// Store Twilio SMS credentials (no SMS is ever sent)
#[utoipa::path(
    put,
    path = "/settings/sms",
    tag = "settings",
    security(("bearer_auth" = [])),
    request_body = SmsSettings,
    responses(
        (status = 200, description = "Settings updated", body = SettingsView),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn update_sms_settings(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Json(request): Json<SmsSettings>,
) -> AppResult<Json<SettingsView>> {
    let view = state
        .services
        .settings
        .update_sms_settings(&session, request)
        .await?;
    Ok(Json(view))
}

/// Change the shared admin key
#[utoipa::path(
    put,
    path = "/settings/admin-key",
    tag = "settings",
    security(("bearer_auth" = [])),
    request_body = UpdateAdminKey,
    responses(
        (status = 204, description = "Admin key updated"),
        (status = 400, description = "Admin key too short"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn update_admin_key(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Json(request): Json<UpdateAdminKey>,
) -> AppResult<StatusCode> {
    state
        .services
        .settings
        .update_admin_key(&session, request)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Toggle SMS and email notifications
#[utoipa::path(
    put,
    path = "/settings/notifications",
    tag = "settings",
    security(("bearer_auth" = [])),
    request_body = NotificationSettings,
    responses(
        (status = 200, description = "Settings updated", body = SettingsView),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn update_notification_settings(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Json(request): Json<NotificationSettings>,
) -> AppResult<Json<SettingsView>> {
    let view = state
        .services
        .settings
        .update_notification_settings(&session, request)
        .await?;
    Ok(Json(view))
}
