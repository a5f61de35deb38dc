//! Inventory endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::inventory::{InventoryItem, InventoryInput},
};

use super::{AdminConfirmed, AuthenticatedSession};

/// List inventory items, latest purchase first
#[utoipa::path(
    get,
    path = "/inventory",
    tag = "inventory",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of inventory items", body = Vec<InventoryItem>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_inventory(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
) -> Json<Vec<InventoryItem>> {
    Json(state.services.inventory.list(&session).await)
}

/// Items that can still be sold
#[utoipa::path(
    get,
    path = "/inventory/available",
    tag = "inventory",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Available inventory items", body = Vec<InventoryItem>)
    )
)]
pub async fn list_available(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
) -> Json<Vec<InventoryItem>> {
    Json(state.services.inventory.available(&session).await)
}

/// Get item details by ID
#[utoipa::path(
    get,
    path = "/inventory/{id}",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item details", body = InventoryItem),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_item(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<String>,
) -> AppResult<Json<InventoryItem>> {
    let item = state.services.inventory.get(&session, &id).await?;
    Ok(Json(item))
}

/// Add an inventory item (status defaults to Available)
#[utoipa::path(
    post,
    path = "/inventory",
    tag = "inventory",
    security(("bearer_auth" = [])),
    request_body = InventoryInput,
    responses(
        (status = 201, description = "Item created", body = InventoryItem),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_item(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Json(input): Json<InventoryInput>,
) -> AppResult<(StatusCode, Json<InventoryItem>)> {
    let created = state.services.inventory.create(&session, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an inventory item
#[utoipa::path(
    put,
    path = "/inventory/{id}",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Item ID")
    ),
    request_body = InventoryInput,
    responses(
        (status = 200, description = "Item updated", body = InventoryItem),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn update_item(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<String>,
    Json(input): Json<InventoryInput>,
) -> AppResult<Json<InventoryItem>> {
    let updated = state.services.inventory.update(&session, &id, input).await?;
    Ok(Json(updated))
}

/// Delete an inventory item
#[utoipa::path(
    delete,
    path = "/inventory/{id}",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Item ID"),
        ("X-Confirmation-Token" = String, Header, description = "Token from admin-key verification")
    ),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 403, description = "Admin role or admin-key confirmation missing"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn delete_item(
    State(state): State<crate::AppState>,
    AdminConfirmed(session): AdminConfirmed,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.inventory.delete(&session, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
