//! Repair ticket endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::repair::{Repair, RepairInput},
};

use super::{AdminConfirmed, AuthenticatedSession};

/// List repair tickets, latest reported first
#[utoipa::path(
    get,
    path = "/repairs",
    tag = "repairs",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of repair tickets", body = Vec<Repair>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_repairs(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
) -> Json<Vec<Repair>> {
    Json(state.services.repairs.list(&session).await)
}

/// Get repair details by ID
#[utoipa::path(
    get,
    path = "/repairs/{id}",
    tag = "repairs",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Repair ID")
    ),
    responses(
        (status = 200, description = "Repair details", body = Repair),
        (status = 404, description = "Repair not found")
    )
)]
pub async fn get_repair(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<String>,
) -> AppResult<Json<Repair>> {
    let repair = state.services.repairs.get(&session, &id).await?;
    Ok(Json(repair))
}

/// Create a repair ticket
#[utoipa::path(
    post,
    path = "/repairs",
    tag = "repairs",
    security(("bearer_auth" = [])),
    request_body = RepairInput,
    responses(
        (status = 201, description = "Repair created", body = Repair),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_repair(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Json(input): Json<RepairInput>,
) -> AppResult<(StatusCode, Json<Repair>)> {
    let created = state.services.repairs.create(&session, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a repair ticket
#[utoipa::path(
    put,
    path = "/repairs/{id}",
    tag = "repairs",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Repair ID")
    ),
    request_body = RepairInput,
    responses(
        (status = 200, description = "Repair updated", body = Repair),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Repair not found")
    )
)]
pub async fn update_repair(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<String>,
    Json(input): Json<RepairInput>,
) -> AppResult<Json<Repair>> {
    let updated = state.services.repairs.update(&session, &id, input).await?;
    Ok(Json(updated))
}

/// Delete a repair ticket
#[utoipa::path(
    delete,
    path = "/repairs/{id}",
    tag = "repairs",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Repair ID"),
        ("X-Confirmation-Token" = String, Header, description = "Token from admin-key verification")
    ),
    responses(
        (status = 204, description = "Repair deleted"),
        (status = 403, description = "Admin role or admin-key confirmation missing"),
        (status = 404, description = "Repair not found")
    )
)]
pub async fn delete_repair(
    State(state): State<crate::AppState>,
    AdminConfirmed(session): AdminConfirmed,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.repairs.delete(&session, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
