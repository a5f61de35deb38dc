//! API handlers for SpinCity REST endpoints

pub mod activity;
pub mod auth;
pub mod contacts;
pub mod health;
pub mod inventory;
pub mod openapi;
pub mod rentals;
pub mod repairs;
pub mod reports;
pub mod sales;
pub mod session;
pub mod settings;
pub mod submissions;
pub mod users;
pub mod vendors;

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{delete, get, post, put},
    Router,
};

use crate::{error::AppError, session::Session, AppState};

/// All v1 routes, relative to the `/api/v1` prefix
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // Session workspace
        .route("/session", get(session::status))
        .route("/session/activity", post(session::activity))
        .route("/session/toasts", get(session::list_toasts))
        .route("/session/toasts/:id", delete(session::dismiss_toast))
        .route("/session/events", get(session::events))
        .route("/session/admin-key/open", post(session::open_gate))
        .route("/session/admin-key/verify", post(session::verify_admin_key))
        // Users
        .route("/users", get(users::list_users))
        .route("/users/:id", get(users::get_user))
        .route("/users/:id", put(users::update_user))
        .route("/users/:id", delete(users::delete_user))
        // Clients
        .route("/contacts", get(contacts::list_contacts))
        .route("/contacts", post(contacts::create_contact))
        .route("/contacts/:id", get(contacts::get_contact))
        .route("/contacts/:id", put(contacts::update_contact))
        .route("/contacts/:id", delete(contacts::delete_contact))
        // Rentals
        .route("/rentals/plans", get(rentals::list_plans))
        .route("/rentals", get(rentals::list_rentals))
        .route("/rentals", post(rentals::create_rental))
        .route("/rentals/:id", get(rentals::get_rental))
        .route("/rentals/:id", put(rentals::update_rental))
        .route("/rentals/:id", delete(rentals::delete_rental))
        // Repairs
        .route("/repairs", get(repairs::list_repairs))
        .route("/repairs", post(repairs::create_repair))
        .route("/repairs/:id", get(repairs::get_repair))
        .route("/repairs/:id", put(repairs::update_repair))
        .route("/repairs/:id", delete(repairs::delete_repair))
        // Inventory
        .route("/inventory", get(inventory::list_inventory))
        .route("/inventory", post(inventory::create_item))
        .route("/inventory/available", get(inventory::list_available))
        .route("/inventory/:id", get(inventory::get_item))
        .route("/inventory/:id", put(inventory::update_item))
        .route("/inventory/:id", delete(inventory::delete_item))
        // Sales
        .route("/sales", get(sales::list_sales))
        .route("/sales", post(sales::create_sale))
        .route("/sales/:id", get(sales::get_sale))
        .route("/sales/:id", put(sales::update_sale))
        .route("/sales/:id", delete(sales::delete_sale))
        // Vendors
        .route("/vendors", get(vendors::list_vendors))
        .route("/vendors", post(vendors::create_vendor))
        .route("/vendors/:id", get(vendors::get_vendor))
        .route("/vendors/:id", put(vendors::update_vendor))
        .route("/vendors/:id", delete(vendors::delete_vendor))
        // Activity log
        .route("/activity-logs", get(activity::list_logs))
        .route("/activity-logs/:id", delete(activity::delete_log))
        // Website submissions
        .route("/submissions", get(submissions::overview))
        .route("/submissions/:kind", get(submissions::list_submissions))
        .route("/submissions/:kind/:id", delete(submissions::delete_submission))
        .route("/submissions/:kind/:id/status", put(submissions::update_status))
        // Reports
        .route("/dashboard", get(reports::dashboard))
        .route("/reports", get(reports::period_report))
        // Settings
        .route("/settings", get(settings::get_settings))
        .route("/settings/branding", get(settings::get_branding))
        .route("/settings/app-logo", put(settings::update_app_logo))
        .route("/settings/splash-logo", put(settings::update_splash_logo))
        .route("/settings/sms", put(settings::update_sms_settings))
        .route("/settings/admin-key", put(settings::update_admin_key))
        .route("/settings/notifications", put(settings::update_notification_settings))
        .with_state(state)
}

/// Header carrying the token issued by a successful admin-key verification
pub const CONFIRMATION_HEADER: &str = "x-confirmation-token";

/// Extractor for the session behind a bearer token
pub struct AuthenticatedSession(pub Arc<Session>);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let session = state.services.auth.authenticate(token).await?;
        Ok(AuthenticatedSession(session))
    }
}

/// Extractor for destructive actions: an Admin session that has just passed
/// the admin-key gate. The confirmation token is spent by extraction.
pub struct AdminConfirmed(pub Arc<Session>);

#[async_trait]
impl FromRequestParts<AppState> for AdminConfirmed {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthenticatedSession(session) =
            AuthenticatedSession::from_request_parts(parts, state).await?;
        session.require_admin()?;

        let token = parts
            .headers
            .get(CONFIRMATION_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::Confirmation("Admin key confirmation required".to_string())
            })?;
        session.gate.confirm(token).await?;

        Ok(AdminConfirmed(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        models::user::RegisterUser,
        services::tests::fixture,
    };
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app() -> (Router, String) {
        let (services, _) = fixture().await;
        let admin = services
            .auth
            .register(RegisterUser {
                name: "Ada Admin".into(),
                email: "ada@example.com".into(),
                password: "secret".into(),
                admin_key: Some("open-sesame".into()),
            })
            .await
            .unwrap();
        let state = AppState {
            config: Arc::new(AppConfig::default()),
            services: Arc::new(services),
        };
        (router(state), admin.token)
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        headers: &[(&str, &str)],
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let (app, _) = app().await;
        let (status, body) = call(&app, Method::GET, "/contacts", &[], None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Missing authorization header");
    }

    #[tokio::test]
    async fn test_branding_is_public() {
        let (app, _) = app().await;
        let (status, body) = call(&app, Method::GET, "/settings/branding", &[], None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("appLogo").is_some());
    }

    #[tokio::test]
    async fn test_delete_requires_admin_key_confirmation() {
        let (app, token) = app().await;
        let bearer = format!("Bearer {}", token);
        let auth = [("authorization", bearer.as_str())];

        let (status, created) = call(
            &app,
            Method::POST,
            "/contacts",
            &auth,
            Some(json!({ "fullName": "Jane Client", "phone": "555-0100" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let uri = format!("/contacts/{}", created["id"].as_str().unwrap());

        let (status, _) = call(&app, Method::DELETE, &uri, &auth, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call(
            &app,
            Method::POST,
            "/session/admin-key/open",
            &auth,
            Some(json!({ "action": "Delete client" })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = call(
            &app,
            Method::POST,
            "/session/admin-key/verify",
            &auth,
            Some(json!({ "adminKey": "wrong" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, verified) = call(
            &app,
            Method::POST,
            "/session/admin-key/verify",
            &auth,
            Some(json!({ "adminKey": "open-sesame" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(verified["action"], "Delete client");
        let confirmation = verified["confirmationToken"].as_str().unwrap().to_string();

        let confirmed = [
            ("authorization", bearer.as_str()),
            (CONFIRMATION_HEADER, confirmation.as_str()),
        ];
        let (status, _) = call(&app, Method::DELETE, &uri, &confirmed, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        // Tokens are single use
        let (status, _) = call(&app, Method::DELETE, &uri, &confirmed, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_update_settings() {
        let (app, _) = app().await;
        let (status, registered) = call(
            &app,
            Method::POST,
            "/auth/register",
            &[],
            Some(json!({ "name": "Bo", "email": "bo@example.com", "password": "secret" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(registered["user"]["role"], "User");

        let bearer = format!("Bearer {}", registered["token"].as_str().unwrap());
        let (status, _) = call(
            &app,
            Method::PUT,
            "/settings/admin-key",
            &[("authorization", bearer.as_str())],
            Some(json!({ "adminKey": "hijack" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
