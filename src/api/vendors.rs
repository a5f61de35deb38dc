//! Vendor endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::vendor::{Vendor, VendorInput, VendorSummary},
};

use super::{AdminConfirmed, AuthenticatedSession};

/// List vendors with their purchased-item counts
#[utoipa::path(
    get,
    path = "/vendors",
    tag = "vendors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of vendors", body = Vec<VendorSummary>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_vendors(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
) -> Json<Vec<VendorSummary>> {
    Json(state.services.vendors.summaries(&session).await)
}

/// Get vendor details by ID
#[utoipa::path(
    get,
    path = "/vendors/{id}",
    tag = "vendors",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Vendor ID")
    ),
    responses(
        (status = 200, description = "Vendor details", body = Vendor),
        (status = 404, description = "Vendor not found")
    )
)]
pub async fn get_vendor(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<String>,
) -> AppResult<Json<Vendor>> {
    let vendor = state.services.vendors.get(&session, &id).await?;
    Ok(Json(vendor))
}

/// Create a vendor (vendorId generated when omitted)
#[utoipa::path(
    post,
    path = "/vendors",
    tag = "vendors",
    security(("bearer_auth" = [])),
    request_body = VendorInput,
    responses(
        (status = 201, description = "Vendor created", body = Vendor),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_vendor(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Json(input): Json<VendorInput>,
) -> AppResult<(StatusCode, Json<Vendor>)> {
    let created = state.services.vendors.create(&session, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a vendor
#[utoipa::path(
    put,
    path = "/vendors/{id}",
    tag = "vendors",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Vendor ID")
    ),
    request_body = VendorInput,
    responses(
        (status = 200, description = "Vendor updated", body = Vendor),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Vendor not found")
    )
)]
pub async fn update_vendor(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<String>,
    Json(input): Json<VendorInput>,
) -> AppResult<Json<Vendor>> {
    let updated = state.services.vendors.update(&session, &id, input).await?;
    Ok(Json(updated))
}

/// Delete a vendor
#[utoipa::path(
    delete,
    path = "/vendors/{id}",
    tag = "vendors",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Vendor ID"),
        ("X-Confirmation-Token" = String, Header, description = "Token from admin-key verification")
    ),
    responses(
        (status = 204, description = "Vendor deleted"),
        (status = 403, description = "Admin role or admin-key confirmation missing"),
        (status = 404, description = "Vendor not found")
    )
)]
pub async fn delete_vendor(
    State(state): State<crate::AppState>,
    AdminConfirmed(session): AdminConfirmed,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.vendors.delete(&session, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
