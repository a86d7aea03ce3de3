use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use eventdesk_database::{
    Communication, CommunicationRepository, CreateCommunicationRequest,
    UpdateCommunicationRequest,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{routes::load_event, util::ApiJson, ApiError, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct CommunicationsResponse {
    pub communications: Vec<Communication>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommunicationResponse {
    pub communication: Communication,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecipientsResponse {
    pub recipients: Vec<String>,
    pub count: usize,
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/communications",
    tag = "Communications",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Communications of the event, newest first", body = CommunicationsResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_communications(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CommunicationsResponse>, ApiError> {
    state.authorize(&headers)?;
    let event = load_event(&state, &event_id).await?;

    let communications = CommunicationRepository::new(state.db_pool().clone())
        .list_for_event(&event.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list communications: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(CommunicationsResponse { communications }))
}

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/communications",
    tag = "Communications",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    request_body = CreateCommunicationRequest,
    responses(
        (status = 201, description = "Draft or scheduled communication created", body = CommunicationResponse),
        (status = 400, description = "Invalid payload or unknown template", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_communication(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateCommunicationRequest>,
) -> Result<(StatusCode, Json<CommunicationResponse>), ApiError> {
    state.authorize(&headers)?;
    let event = load_event(&state, &event_id).await?;

    let communication = CommunicationRepository::new(state.db_pool().clone())
        .create(&event, req)
        .await?;
    state.revalidate_event(&event.id).await;

    Ok((
        StatusCode::CREATED,
        Json(CommunicationResponse { communication }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/communications/{communication_id}",
    tag = "Communications",
    security(("bearerAuth" = [])),
    params(("communication_id" = String, Path, description = "Communication identifier")),
    responses(
        (status = 200, description = "Communication fetched", body = CommunicationResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Communication not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_communication(
    State(state): State<AppState>,
    Path(communication_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CommunicationResponse>, ApiError> {
    state.authorize(&headers)?;

    let communication = CommunicationRepository::new(state.db_pool().clone())
        .get(&communication_id)
        .await?;

    Ok(Json(CommunicationResponse { communication }))
}

#[utoipa::path(
    put,
    path = "/api/communications/{communication_id}",
    tag = "Communications",
    security(("bearerAuth" = [])),
    params(("communication_id" = String, Path, description = "Communication identifier")),
    request_body = UpdateCommunicationRequest,
    responses(
        (status = 200, description = "Communication updated", body = CommunicationResponse),
        (status = 400, description = "Invalid update payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Communication not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Communication was already sent", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_communication(
    State(state): State<AppState>,
    Path(communication_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<UpdateCommunicationRequest>,
) -> Result<Json<CommunicationResponse>, ApiError> {
    state.authorize(&headers)?;

    let communication = CommunicationRepository::new(state.db_pool().clone())
        .update(&communication_id, req)
        .await?;
    state.revalidate_event(&communication.event_id).await;

    Ok(Json(CommunicationResponse { communication }))
}

#[utoipa::path(
    get,
    path = "/api/communications/{communication_id}/recipients",
    tag = "Communications",
    security(("bearerAuth" = [])),
    params(("communication_id" = String, Path, description = "Communication identifier")),
    responses(
        (status = 200, description = "Addresses the communication would reach now", body = RecipientsResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Communication not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn preview_recipients(
    State(state): State<AppState>,
    Path(communication_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<RecipientsResponse>, ApiError> {
    state.authorize(&headers)?;

    let repo = CommunicationRepository::new(state.db_pool().clone());
    let communication = repo.get(&communication_id).await?;
    let recipients: Vec<String> = repo
        .resolve_recipients(&communication.event_id, communication.audience)
        .await?
        .into_iter()
        .collect();

    Ok(Json(RecipientsResponse {
        count: recipients.len(),
        recipients,
    }))
}

#[utoipa::path(
    post,
    path = "/api/communications/{communication_id}/send",
    tag = "Communications",
    security(("bearerAuth" = [])),
    params(("communication_id" = String, Path, description = "Communication identifier")),
    responses(
        (status = 200, description = "Communication sent to its audience", body = CommunicationResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Communication not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Already sent or cancelled", body = crate::error::ErrorResponse)
    )
)]
pub async fn send_communication(
    State(state): State<AppState>,
    Path(communication_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CommunicationResponse>, ApiError> {
    state.authorize(&headers)?;

    let communication = CommunicationRepository::new(state.db_pool().clone())
        .send(&communication_id)
        .await
        .map_err(|e| {
            tracing::warn!("Failed to send communication {}: {}", communication_id, e);
            ApiError::from(e)
        })?;
    state.revalidate_event(&communication.event_id).await;

    Ok(Json(CommunicationResponse { communication }))
}

#[utoipa::path(
    delete,
    path = "/api/communications/{communication_id}",
    tag = "Communications",
    security(("bearerAuth" = [])),
    params(("communication_id" = String, Path, description = "Communication identifier")),
    responses(
        (status = 204, description = "Communication deleted"),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Communication not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_communication(
    State(state): State<AppState>,
    Path(communication_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state.authorize(&headers)?;

    let repo = CommunicationRepository::new(state.db_pool().clone());
    let communication = repo.get(&communication_id).await?;
    repo.delete(&communication.id).await?;
    state.revalidate_event(&communication.event_id).await;

    Ok(StatusCode::NO_CONTENT)
}
