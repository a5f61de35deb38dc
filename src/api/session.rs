//! Session workspace endpoints: status, toasts, activity and the admin-key gate

use std::{convert::Infallible, time::Duration};

use axum::{
    extract::Path,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    session::{inactivity::ActivityEvent, toast::Toast, SessionStatus},
};

use super::AuthenticatedSession;

/// Client activity report
#[derive(Deserialize, ToSchema)]
pub struct ActivityRequest {
    pub event: ActivityEvent,
}

/// Start an admin-key confirmation
#[derive(Deserialize, ToSchema)]
pub struct OpenGateRequest {
    /// Description of the destructive action awaiting confirmation
    pub action: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyAdminKeyRequest {
    pub admin_key: String,
}

/// Single-use token to send as `X-Confirmation-Token`
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyAdminKeyResponse {
    pub confirmation_token: String,
    pub action: Option<String>,
}

/// Session status
#[utoipa::path(
    get,
    path = "/session",
    tag = "session",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Session status", body = SessionStatus),
        (status = 401, description = "Not authenticated or signed out")
    )
)]
pub async fn status(AuthenticatedSession(session): AuthenticatedSession) -> Json<SessionStatus> {
    Json(session.status().await)
}

/// Report user activity, resetting the inactivity countdown
#[utoipa::path(
    post,
    path = "/session/activity",
    tag = "session",
    security(("bearer_auth" = [])),
    request_body = ActivityRequest,
    responses(
        (status = 204, description = "Countdown reset")
    )
)]
pub async fn activity(
    AuthenticatedSession(session): AuthenticatedSession,
    Json(request): Json<ActivityRequest>,
) -> StatusCode {
    session.touch(request.event).await;
    StatusCode::NO_CONTENT
}

/// Queued toasts
#[utoipa::path(
    get,
    path = "/session/toasts",
    tag = "session",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Queued toasts, oldest first", body = Vec<Toast>)
    )
)]
pub async fn list_toasts(AuthenticatedSession(session): AuthenticatedSession) -> Json<Vec<Toast>> {
    Json(session.toasts.list().await)
}

/// Dismiss a toast
#[utoipa::path(
    delete,
    path = "/session/toasts/{id}",
    tag = "session",
    security(("bearer_auth" = [])),
    params(
        ("id" = u64, Path, description = "Toast ID")
    ),
    responses(
        (status = 204, description = "Toast dismissed"),
        (status = 404, description = "No such toast")
    )
)]
pub async fn dismiss_toast(
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<u64>,
) -> AppResult<StatusCode> {
    if session.toasts.dismiss(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Toast {} not found", id)))
    }
}

/// Live toast stream (Server-Sent Events, event name `toast`)
#[utoipa::path(
    get,
    path = "/session/events",
    tag = "session",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "text/event-stream of toasts")
    )
)]
pub async fn events(
    AuthenticatedSession(session): AuthenticatedSession,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!(session = %session.id, "Toast stream opened");
    let stream = BroadcastStream::new(session.toasts.stream()).filter_map(|received| {
        let toast = received.ok()?;
        match Event::default().event("toast").json_data(&toast) {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                tracing::warn!("Could not encode toast {}: {}", toast.id, e);
                None
            }
        }
    });
    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

/// Open the admin-key gate for a destructive action
#[utoipa::path(
    post,
    path = "/session/admin-key/open",
    tag = "session",
    security(("bearer_auth" = [])),
    request_body = OpenGateRequest,
    responses(
        (status = 204, description = "Gate reset and awaiting the key")
    )
)]
pub async fn open_gate(
    AuthenticatedSession(session): AuthenticatedSession,
    Json(request): Json<OpenGateRequest>,
) -> StatusCode {
    session.gate.open(request.action).await;
    StatusCode::NO_CONTENT
}

/// Verify the admin key
#[utoipa::path(
    post,
    path = "/session/admin-key/verify",
    tag = "session",
    security(("bearer_auth" = [])),
    request_body = VerifyAdminKeyRequest,
    responses(
        (status = 200, description = "Key accepted", body = VerifyAdminKeyResponse),
        (status = 403, description = "Incorrect Admin Key")
    )
)]
pub async fn verify_admin_key(
    AuthenticatedSession(session): AuthenticatedSession,
    Json(request): Json<VerifyAdminKeyRequest>,
) -> AppResult<Json<VerifyAdminKeyResponse>> {
    let action = session.gate.pending_action().await;
    let confirmation_token = session.gate.verify(&request.admin_key).await?;
    Ok(Json(VerifyAdminKeyResponse {
        confirmation_token,
        action,
    }))
}
