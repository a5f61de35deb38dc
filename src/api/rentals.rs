//! Rental agreement endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::rental::{Rental, RentalInput, RentalPlan},
};

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use super::{AdminConfirmed, AuthenticatedSession};

/// One row of the plan price table
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanPrice {
    pub plan: RentalPlan,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub monthly_rate: Decimal,
}

/// Rental plans and their fixed monthly prices
#[utoipa::path(
    get,
    path = "/rentals/plans",
    tag = "rentals",
    responses(
        (status = 200, description = "Plan price table", body = Vec<PlanPrice>)
    )
)]
pub async fn list_plans() -> Json<Vec<PlanPrice>> {
    Json(
        RentalPlan::ALL
            .into_iter()
            .map(|plan| PlanPrice {
                plan,
                monthly_rate: plan.monthly_rate(),
            })
            .collect(),
    )
}

/// List rental agreements, latest start first
#[utoipa::path(
    get,
    path = "/rentals",
    tag = "rentals",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of rental agreements", body = Vec<Rental>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_rentals(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
) -> Json<Vec<Rental>> {
    Json(state.services.rentals.list(&session).await)
}

/// Get rental details by ID
#[utoipa::path(
    get,
    path = "/rentals/{id}",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Rental ID")
    ),
    responses(
        (status = 200, description = "Rental details", body = Rental),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn get_rental(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<String>,
) -> AppResult<Json<Rental>> {
    let rental = state.services.rentals.get(&session, &id).await?;
    Ok(Json(rental))
}

/// Create a rental agreement
///
/// The monthly rate is always taken from the plan price table.
#[utoipa::path(
    post,
    path = "/rentals",
    tag = "rentals",
    security(("bearer_auth" = [])),
    request_body = RentalInput,
    responses(
        (status = 201, description = "Rental created", body = Rental),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_rental(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Json(input): Json<RentalInput>,
) -> AppResult<(StatusCode, Json<Rental>)> {
    let created = state.services.rentals.create(&session, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a rental agreement
#[utoipa::path(
    put,
    path = "/rentals/{id}",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Rental ID")
    ),
    request_body = RentalInput,
    responses(
        (status = 200, description = "Rental updated", body = Rental),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn update_rental(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<String>,
    Json(input): Json<RentalInput>,
) -> AppResult<Json<Rental>> {
    let updated = state.services.rentals.update(&session, &id, input).await?;
    Ok(Json(updated))
}

/// Delete a rental agreement
#[utoipa::path(
    delete,
    path = "/rentals/{id}",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Rental ID"),
        ("X-Confirmation-Token" = String, Header, description = "Token from admin-key verification")
    ),
    responses(
        (status = 204, description = "Rental deleted"),
        (status = 403, description = "Admin role or admin-key confirmation missing"),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn delete_rental(
    State(state): State<crate::AppState>,
    AdminConfirmed(session): AdminConfirmed,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.rentals.delete(&session, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
