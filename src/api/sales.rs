//! Sales endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::sale::{Sale, SaleInput},
};

use super::{AdminConfirmed, AuthenticatedSession};

/// List sales, latest first
#[utoipa::path(
    get,
    path = "/sales",
    tag = "sales",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of sales", body = Vec<Sale>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_sales(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
) -> Json<Vec<Sale>> {
    Json(state.services.sales.list(&session).await)
}

/// Get sale details by ID
#[utoipa::path(
    get,
    path = "/sales/{id}",
    tag = "sales",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Sale ID")
    ),
    responses(
        (status = 200, description = "Sale details", body = Sale),
        (status = 404, description = "Sale not found")
    )
)]
pub async fn get_sale(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<String>,
) -> AppResult<Json<Sale>> {
    let sale = state.services.sales.get(&session, &id).await?;
    Ok(Json(sale))
}

/// Record a sale and mark its item Sold
#[utoipa::path(
    post,
    path = "/sales",
    tag = "sales",
    security(("bearer_auth" = [])),
    request_body = SaleInput,
    responses(
        (status = 201, description = "Sale created", body = Sale),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_sale(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Json(input): Json<SaleInput>,
) -> AppResult<(StatusCode, Json<Sale>)> {
    let created = state.services.sales.create(&session, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a sale; moving it to another item frees the previous item
#[utoipa::path(
    put,
    path = "/sales/{id}",
    tag = "sales",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Sale ID")
    ),
    request_body = SaleInput,
    responses(
        (status = 200, description = "Sale updated", body = Sale),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Sale not found")
    )
)]
pub async fn update_sale(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<String>,
    Json(input): Json<SaleInput>,
) -> AppResult<Json<Sale>> {
    let updated = state.services.sales.update(&session, &id, input).await?;
    Ok(Json(updated))
}

/// Delete a sale and put its item back to Available
#[utoipa::path(
    delete,
    path = "/sales/{id}",
    tag = "sales",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Sale ID"),
        ("X-Confirmation-Token" = String, Header, description = "Token from admin-key verification")
    ),
    responses(
        (status = 204, description = "Sale deleted"),
        (status = 403, description = "Admin role or admin-key confirmation missing"),
        (status = 404, description = "Sale not found")
    )
)]
pub async fn delete_sale(
    State(state): State<crate::AppState>,
    AdminConfirmed(session): AdminConfirmed,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.sales.delete(&session, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
