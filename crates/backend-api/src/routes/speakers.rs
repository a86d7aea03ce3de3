use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use eventdesk_database::{CreateSpeakerRequest, Speaker, SpeakerRepository, UpdateSpeakerRequest};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{routes::load_event, util::ApiJson, ApiError, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct SpeakersResponse {
    pub speakers: Vec<Speaker>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SpeakerResponse {
    pub speaker: Speaker,
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/speakers",
    tag = "Speakers",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Speakers of the event", body = SpeakersResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_speakers(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<SpeakersResponse>, ApiError> {
    state.authorize(&headers)?;
    let event = load_event(&state, &event_id).await?;

    let speakers = SpeakerRepository::new(state.db_pool().clone())
        .list_for_event(&event.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list speakers: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(SpeakersResponse { speakers }))
}

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/speakers",
    tag = "Speakers",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    request_body = CreateSpeakerRequest,
    responses(
        (status = 201, description = "Speaker created", body = SpeakerResponse),
        (status = 400, description = "Invalid speaker payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_speaker(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateSpeakerRequest>,
) -> Result<(StatusCode, Json<SpeakerResponse>), ApiError> {
    state.authorize(&headers)?;
    let event = load_event(&state, &event_id).await?;

    let speaker = SpeakerRepository::new(state.db_pool().clone())
        .create(&event.id, req)
        .await?;
    state.revalidate_event(&event.id).await;

    Ok((StatusCode::CREATED, Json(SpeakerResponse { speaker })))
}

#[utoipa::path(
    get,
    path = "/api/speakers/{speaker_id}",
    tag = "Speakers",
    security(("bearerAuth" = [])),
    params(("speaker_id" = String, Path, description = "Speaker identifier")),
    responses(
        (status = 200, description = "Speaker fetched", body = SpeakerResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Speaker not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_speaker(
    State(state): State<AppState>,
    Path(speaker_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<SpeakerResponse>, ApiError> {
    state.authorize(&headers)?;

    let speaker = SpeakerRepository::new(state.db_pool().clone())
        .get(&speaker_id)
        .await?;

    Ok(Json(SpeakerResponse { speaker }))
}

#[utoipa::path(
    put,
    path = "/api/speakers/{speaker_id}",
    tag = "Speakers",
    security(("bearerAuth" = [])),
    params(("speaker_id" = String, Path, description = "Speaker identifier")),
    request_body = UpdateSpeakerRequest,
    responses(
        (status = 200, description = "Speaker updated", body = SpeakerResponse),
        (status = 400, description = "Invalid update payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Speaker not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_speaker(
    State(state): State<AppState>,
    Path(speaker_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<UpdateSpeakerRequest>,
) -> Result<Json<SpeakerResponse>, ApiError> {
    state.authorize(&headers)?;

    let speaker = SpeakerRepository::new(state.db_pool().clone())
        .update(&speaker_id, req)
        .await?;
    state.revalidate_event(&speaker.event_id).await;

    Ok(Json(SpeakerResponse { speaker }))
}

#[utoipa::path(
    delete,
    path = "/api/speakers/{speaker_id}",
    tag = "Speakers",
    security(("bearerAuth" = [])),
    params(("speaker_id" = String, Path, description = "Speaker identifier")),
    responses(
        (status = 204, description = "Speaker deleted"),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Speaker not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_speaker(
    State(state): State<AppState>,
    Path(speaker_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state.authorize(&headers)?;

    let repo = SpeakerRepository::new(state.db_pool().clone());
    let speaker = repo.get(&speaker_id).await?;
    repo.delete(&speaker.id).await?;
    state.revalidate_event(&speaker.event_id).await;

    Ok(StatusCode::NO_CONTENT)
}
