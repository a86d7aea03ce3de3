use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use eventdesk_database::{
    CreateDeadlineRequest, Deadline, DeadlineRepository, UpdateDeadlineRequest,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    routes::load_event,
    util::{today, ApiJson},
    ApiError, AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct DeadlinesResponse {
    pub deadlines: Vec<Deadline>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeadlineResponse {
    pub deadline: Deadline,
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/deadlines",
    tag = "Deadlines",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Deadlines by due date, overdue ones flagged", body = DeadlinesResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_deadlines(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<DeadlinesResponse>, ApiError> {
    state.authorize(&headers)?;
    let event = load_event(&state, &event_id).await?;

    let deadlines = DeadlineRepository::new(state.db_pool().clone())
        .list_for_event(&event.id, today())
        .await
        .map_err(|e| {
            tracing::error!("Failed to list deadlines: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(DeadlinesResponse { deadlines }))
}

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/deadlines",
    tag = "Deadlines",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    request_body = CreateDeadlineRequest,
    responses(
        (status = 201, description = "Deadline created", body = DeadlineResponse),
        (status = 400, description = "Invalid deadline payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_deadline(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateDeadlineRequest>,
) -> Result<(StatusCode, Json<DeadlineResponse>), ApiError> {
    state.authorize(&headers)?;
    let event = load_event(&state, &event_id).await?;

    let repo = DeadlineRepository::new(state.db_pool().clone());
    let created = repo.create(&event.id, req).await?;
    let deadline = repo.get(&created.id, today()).await?;
    state.revalidate_event(&event.id).await;

    Ok((StatusCode::CREATED, Json(DeadlineResponse { deadline })))
}

#[utoipa::path(
    get,
    path = "/api/deadlines/{deadline_id}",
    tag = "Deadlines",
    security(("bearerAuth" = [])),
    params(("deadline_id" = String, Path, description = "Deadline identifier")),
    responses(
        (status = 200, description = "Deadline fetched", body = DeadlineResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Deadline not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_deadline(
    State(state): State<AppState>,
    Path(deadline_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<DeadlineResponse>, ApiError> {
    state.authorize(&headers)?;

    let deadline = DeadlineRepository::new(state.db_pool().clone())
        .get(&deadline_id, today())
        .await?;

    Ok(Json(DeadlineResponse { deadline }))
}

#[utoipa::path(
    put,
    path = "/api/deadlines/{deadline_id}",
    tag = "Deadlines",
    security(("bearerAuth" = [])),
    params(("deadline_id" = String, Path, description = "Deadline identifier")),
    request_body = UpdateDeadlineRequest,
    responses(
        (status = 200, description = "Deadline updated", body = DeadlineResponse),
        (status = 400, description = "Invalid update payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Deadline not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_deadline(
    State(state): State<AppState>,
    Path(deadline_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<UpdateDeadlineRequest>,
) -> Result<Json<DeadlineResponse>, ApiError> {
    state.authorize(&headers)?;

    let repo = DeadlineRepository::new(state.db_pool().clone());
    let updated = repo.update(&deadline_id, req).await?;
    let deadline = repo.get(&updated.id, today()).await?;
    state.revalidate_event(&deadline.event_id).await;

    Ok(Json(DeadlineResponse { deadline }))
}

#[utoipa::path(
    post,
    path = "/api/deadlines/{deadline_id}/complete",
    tag = "Deadlines",
    security(("bearerAuth" = [])),
    params(("deadline_id" = String, Path, description = "Deadline identifier")),
    responses(
        (status = 200, description = "Deadline completed", body = DeadlineResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Deadline not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn complete_deadline(
    State(state): State<AppState>,
    Path(deadline_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<DeadlineResponse>, ApiError> {
    state.authorize(&headers)?;

    let deadline = DeadlineRepository::new(state.db_pool().clone())
        .complete(&deadline_id)
        .await?;
    state.revalidate_event(&deadline.event_id).await;

    Ok(Json(DeadlineResponse { deadline }))
}

#[utoipa::path(
    delete,
    path = "/api/deadlines/{deadline_id}",
    tag = "Deadlines",
    security(("bearerAuth" = [])),
    params(("deadline_id" = String, Path, description = "Deadline identifier")),
    responses(
        (status = 204, description = "Deadline deleted"),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Deadline not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_deadline(
    State(state): State<AppState>,
    Path(deadline_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state.authorize(&headers)?;

    let repo = DeadlineRepository::new(state.db_pool().clone());
    let deadline = repo.get(&deadline_id, today()).await?;
    repo.delete(&deadline.id).await?;
    state.revalidate_event(&deadline.event_id).await;

    Ok(StatusCode::NO_CONTENT)
}
