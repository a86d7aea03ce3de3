use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use eventdesk_database::{
    AgendaRepository, AgendaSession, CreateSessionRequest, UpdateSessionRequest,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{routes::load_event, util::ApiJson, ApiError, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionsResponse {
    pub sessions: Vec<AgendaSession>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub session: AgendaSession,
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/sessions",
    tag = "Agenda",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Agenda in start order", body = SessionsResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_sessions(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<SessionsResponse>, ApiError> {
    state.authorize(&headers)?;
    let event = load_event(&state, &event_id).await?;

    let sessions = AgendaRepository::new(state.db_pool().clone())
        .list_for_event(&event.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list agenda sessions: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(SessionsResponse { sessions }))
}

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/sessions",
    tag = "Agenda",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session scheduled", body = SessionResponse),
        (status = 400, description = "Invalid times, unknown speaker or room already booked", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_session(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    state.authorize(&headers)?;
    let event = load_event(&state, &event_id).await?;

    let session = AgendaRepository::new(state.db_pool().clone())
        .create(&event, req)
        .await?;
    state.revalidate_event(&event.id).await;

    Ok((StatusCode::CREATED, Json(SessionResponse { session })))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{session_id}",
    tag = "Agenda",
    security(("bearerAuth" = [])),
    params(("session_id" = String, Path, description = "Agenda session identifier")),
    responses(
        (status = 200, description = "Session fetched", body = SessionResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Session not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, ApiError> {
    state.authorize(&headers)?;

    let session = AgendaRepository::new(state.db_pool().clone())
        .get(&session_id)
        .await?;

    Ok(Json(SessionResponse { session }))
}

#[utoipa::path(
    put,
    path = "/api/sessions/{session_id}",
    tag = "Agenda",
    security(("bearerAuth" = [])),
    params(("session_id" = String, Path, description = "Agenda session identifier")),
    request_body = UpdateSessionRequest,
    responses(
        (status = 200, description = "Session updated", body = SessionResponse),
        (status = 400, description = "Invalid times, unknown speaker or room already booked", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Session not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<UpdateSessionRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    state.authorize(&headers)?;

    let repo = AgendaRepository::new(state.db_pool().clone());
    let current = repo.get(&session_id).await?;
    let event = load_event(&state, &current.event_id).await?;
    let session = repo.update(&event, &current.id, req).await?;
    state.revalidate_event(&event.id).await;

    Ok(Json(SessionResponse { session }))
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{session_id}",
    tag = "Agenda",
    security(("bearerAuth" = [])),
    params(("session_id" = String, Path, description = "Agenda session identifier")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Session not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state.authorize(&headers)?;

    let repo = AgendaRepository::new(state.db_pool().clone());
    let session = repo.get(&session_id).await?;
    repo.delete(&session.id).await?;
    state.revalidate_event(&session.event_id).await;

    Ok(StatusCode::NO_CONTENT)
}
