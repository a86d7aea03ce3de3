use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use eventdesk_database::{
    CreateParticipantRequest, Participant, ParticipantRepository, ParticipantStatus,
    UpdateParticipantRequest,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    routes::load_event,
    util::{ApiJson, ApiQuery},
    ApiError, AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ParticipantsResponse {
    pub participants: Vec<Participant>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ParticipantResponse {
    pub participant: Participant,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ParticipantsQuery {
    pub status: Option<ParticipantStatus>,
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/participants",
    tag = "Participants",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier"), ParticipantsQuery),
    responses(
        (status = 200, description = "Participants ordered by name", body = ParticipantsResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_participants(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
    ApiQuery(query): ApiQuery<ParticipantsQuery>,
) -> Result<Json<ParticipantsResponse>, ApiError> {
    state.authorize(&headers)?;
    let event = load_event(&state, &event_id).await?;

    let participants = ParticipantRepository::new(state.db_pool().clone())
        .list_for_event(&event.id, query.status)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list participants: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(ParticipantsResponse { participants }))
}

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/participants",
    tag = "Participants",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    request_body = CreateParticipantRequest,
    responses(
        (status = 201, description = "Participant registered, waitlisted when the event is full", body = ParticipantResponse),
        (status = 400, description = "Invalid participant payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered for the event", body = crate::error::ErrorResponse)
    )
)]
pub async fn register_participant(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateParticipantRequest>,
) -> Result<(StatusCode, Json<ParticipantResponse>), ApiError> {
    state.authorize(&headers)?;
    let event = load_event(&state, &event_id).await?;

    let participant = ParticipantRepository::new(state.db_pool().clone())
        .register(&event, req)
        .await?;
    state.revalidate_event(&event.id).await;

    Ok((StatusCode::CREATED, Json(ParticipantResponse { participant })))
}

#[utoipa::path(
    get,
    path = "/api/participants/{participant_id}",
    tag = "Participants",
    security(("bearerAuth" = [])),
    params(("participant_id" = String, Path, description = "Participant identifier")),
    responses(
        (status = 200, description = "Participant fetched", body = ParticipantResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Participant not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_participant(
    State(state): State<AppState>,
    Path(participant_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ParticipantResponse>, ApiError> {
    state.authorize(&headers)?;

    let participant = ParticipantRepository::new(state.db_pool().clone())
        .get(&participant_id)
        .await?;

    Ok(Json(ParticipantResponse { participant }))
}

#[utoipa::path(
    put,
    path = "/api/participants/{participant_id}",
    tag = "Participants",
    security(("bearerAuth" = [])),
    params(("participant_id" = String, Path, description = "Participant identifier")),
    request_body = UpdateParticipantRequest,
    responses(
        (status = 200, description = "Participant updated", body = ParticipantResponse),
        (status = 400, description = "Invalid update payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Participant not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered for the event", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_participant(
    State(state): State<AppState>,
    Path(participant_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<UpdateParticipantRequest>,
) -> Result<Json<ParticipantResponse>, ApiError> {
    state.authorize(&headers)?;

    let participant = ParticipantRepository::new(state.db_pool().clone())
        .update(&participant_id, req)
        .await?;
    state.revalidate_event(&participant.event_id).await;

    Ok(Json(ParticipantResponse { participant }))
}

#[utoipa::path(
    post,
    path = "/api/participants/{participant_id}/check-in",
    tag = "Participants",
    security(("bearerAuth" = [])),
    params(("participant_id" = String, Path, description = "Participant identifier")),
    responses(
        (status = 200, description = "Participant marked as attended", body = ParticipantResponse),
        (status = 400, description = "Cancelled or waitlisted participant", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Participant not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn check_in_participant(
    State(state): State<AppState>,
    Path(participant_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ParticipantResponse>, ApiError> {
    state.authorize(&headers)?;

    let participant = ParticipantRepository::new(state.db_pool().clone())
        .check_in(&participant_id)
        .await?;
    state.revalidate_event(&participant.event_id).await;

    Ok(Json(ParticipantResponse { participant }))
}

#[utoipa::path(
    delete,
    path = "/api/participants/{participant_id}",
    tag = "Participants",
    security(("bearerAuth" = [])),
    params(("participant_id" = String, Path, description = "Participant identifier")),
    responses(
        (status = 204, description = "Participant deleted"),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Participant not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_participant(
    State(state): State<AppState>,
    Path(participant_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state.authorize(&headers)?;

    let repo = ParticipantRepository::new(state.db_pool().clone());
    let participant = repo.get(&participant_id).await?;
    repo.delete(&participant.id).await?;
    state.revalidate_event(&participant.event_id).await;

    Ok(StatusCode::NO_CONTENT)
}
