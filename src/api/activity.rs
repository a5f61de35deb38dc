//! Activity log endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::log_entry::{LogEntry, LogQuery},
};

use super::{AdminConfirmed, AuthenticatedSession};

/// Activity log, newest first
#[utoipa::path(
    get,
    path = "/activity-logs",
    tag = "activity",
    security(("bearer_auth" = [])),
    params(LogQuery),
    responses(
        (status = 200, description = "Log entries", body = Vec<LogEntry>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_logs(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Query(query): Query<LogQuery>,
) -> Json<Vec<LogEntry>> {
    Json(state.services.activity.list(&session, &query).await)
}

/// Delete a log entry
#[utoipa::path(
    delete,
    path = "/activity-logs/{id}",
    tag = "activity",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Log entry ID"),
        ("X-Confirmation-Token" = String, Header, description = "Token from admin-key verification")
    ),
    responses(
        (status = 204, description = "Log entry deleted"),
        (status = 403, description = "Admin role or admin-key confirmation missing"),
        (status = 404, description = "Log entry not found")
    )
)]
pub async fn delete_log(
    State(state): State<crate::AppState>,
    AdminConfirmed(session): AdminConfirmed,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.activity.delete(&session, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
