//! Public-site submission endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::{
    error::AppResult,
    models::submission::{SubmissionKind, SubmissionOverview, UpdateSubmissionStatus},
};

use super::{AdminConfirmed, AuthenticatedSession};

/// All site submissions grouped by form
#[utoipa::path(
    get,
    path = "/submissions",
    tag = "submissions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Contact forms, rental agreements and repair requests", body = SubmissionOverview)
    )
)]
pub async fn overview(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
) -> Json<SubmissionOverview> {
    Json(state.services.submissions.overview(&session).await)
}

/// Submissions of one form, as stored
#[utoipa::path(
    get,
    path = "/submissions/{kind}",
    tag = "submissions",
    security(("bearer_auth" = [])),
    params(
        ("kind" = SubmissionKind, Path, description = "contact, rental or repair")
    ),
    responses(
        (status = 200, description = "Raw submissions, newest first", body = Vec<Object>)
    )
)]
pub async fn list_submissions(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(kind): Path<SubmissionKind>,
) -> Json<Vec<Value>> {
    Json(state.services.submissions.list(&session, kind).await)
}

/// Change the processing status of a submission
#[utoipa::path(
    put,
    path = "/submissions/{kind}/{id}/status",
    tag = "submissions",
    security(("bearer_auth" = [])),
    params(
        ("kind" = SubmissionKind, Path, description = "contact, rental or repair"),
        ("id" = String, Path, description = "Submission ID")
    ),
    request_body = UpdateSubmissionStatus,
    responses(
        (status = 204, description = "Status updated"),
        (status = 404, description = "Submission not found")
    )
)]
pub async fn update_status(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path((kind, id)): Path<(SubmissionKind, String)>,
    Json(request): Json<UpdateSubmissionStatus>,
) -> AppResult<StatusCode> {
    state
        .services
        .submissions
        .update_status(&session, kind, &id, request.status)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a submission
#[utoipa::path(
    delete,
    path = "/submissions/{kind}/{id}",
    tag = "submissions",
    security(("bearer_auth" = [])),
    params(
        ("kind" = SubmissionKind, Path, description = "contact, rental or repair"),
        ("id" = String, Path, description = "Submission ID"),
        ("X-Confirmation-Token" = String, Header, description = "Token from admin-key verification")
    ),
    responses(
        (status = 204, description = "Submission deleted"),
        (status = 403, description = "Admin role or admin-key confirmation missing"),
        (status = 404, description = "Submission not found")
    )
)]
pub async fn delete_submission(
    State(state): State<crate::AppState>,
    AdminConfirmed(session): AdminConfirmed,
    Path((kind, id)): Path<(SubmissionKind, String)>,
) -> AppResult<StatusCode> {
    state.services.submissions.delete(&session, kind, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
