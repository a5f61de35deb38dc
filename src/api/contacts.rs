//! Client endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::contact::{Contact, ContactInput},
};

use super::{AdminConfirmed, AuthenticatedSession};

/// List clients, newest first
#[utoipa::path(
    get,
    path = "/contacts",
    tag = "contacts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of clients", body = Vec<Contact>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_contacts(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
) -> Json<Vec<Contact>> {
    Json(state.services.contacts.list(&session).await)
}

/// Get client details by ID
#[utoipa::path(
    get,
    path = "/contacts/{id}",
    tag = "contacts",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Client ID")
    ),
    responses(
        (status = 200, description = "Client details", body = Contact),
        (status = 404, description = "Client not found")
    )
)]
pub async fn get_contact(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<String>,
) -> AppResult<Json<Contact>> {
    let contact = state.services.contacts.get(&session, &id).await?;
    Ok(Json(contact))
}

/// Create a client
#[utoipa::path(
    post,
    path = "/contacts",
    tag = "contacts",
    security(("bearer_auth" = [])),
    request_body = ContactInput,
    responses(
        (status = 201, description = "Client created", body = Contact),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_contact(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Json(input): Json<ContactInput>,
) -> AppResult<(StatusCode, Json<Contact>)> {
    let created = state.services.contacts.create(&session, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a client
#[utoipa::path(
    put,
    path = "/contacts/{id}",
    tag = "contacts",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Client ID")
    ),
    request_body = ContactInput,
    responses(
        (status = 200, description = "Client updated", body = Contact),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Client not found")
    )
)]
pub async fn update_contact(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<String>,
    Json(input): Json<ContactInput>,
) -> AppResult<Json<Contact>> {
    let updated = state.services.contacts.update(&session, &id, input).await?;
    Ok(Json(updated))
}

/// Delete a client
#[utoipa::path(
    delete,
    path = "/contacts/{id}",
    tag = "contacts",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Client ID"),
        ("X-Confirmation-Token" = String, Header, description = "Token from admin-key verification")
    ),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 403, description = "Admin role or admin-key confirmation missing"),
        (status = 404, description = "Client not found")
    )
)]
pub async fn delete_contact(
    State(state): State<crate::AppState>,
    AdminConfirmed(session): AdminConfirmed,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.contacts.delete(&session, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
