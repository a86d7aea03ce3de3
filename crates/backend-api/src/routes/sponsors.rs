use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use eventdesk_database::{CreateSponsorRequest, Sponsor, SponsorRepository, UpdateSponsorRequest};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{routes::load_event, util::ApiJson, ApiError, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct SponsorsResponse {
    pub sponsors: Vec<Sponsor>,
    /// Sum of confirmed and paid contributions
    pub secured_contributions_cents: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SponsorResponse {
    pub sponsor: Sponsor,
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/sponsors",
    tag = "Sponsors",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Sponsors by tier", body = SponsorsResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_sponsors(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<SponsorsResponse>, ApiError> {
    state.authorize(&headers)?;
    let event = load_event(&state, &event_id).await?;

    let repo = SponsorRepository::new(state.db_pool().clone());
    let sponsors = repo.list_for_event(&event.id).await.map_err(|e| {
        tracing::error!("Failed to list sponsors: {}", e);
        ApiError::from(e)
    })?;
    let secured_contributions_cents = repo.secured_contributions(&event.id).await?;

    Ok(Json(SponsorsResponse {
        sponsors,
        secured_contributions_cents,
    }))
}

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/sponsors",
    tag = "Sponsors",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    request_body = CreateSponsorRequest,
    responses(
        (status = 201, description = "Sponsor created", body = SponsorResponse),
        (status = 400, description = "Invalid sponsor payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_sponsor(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateSponsorRequest>,
) -> Result<(StatusCode, Json<SponsorResponse>), ApiError> {
    state.authorize(&headers)?;
    let event = load_event(&state, &event_id).await?;

    let sponsor = SponsorRepository::new(state.db_pool().clone())
        .create(&event.id, req)
        .await?;
    state.revalidate_event(&event.id).await;

    Ok((StatusCode::CREATED, Json(SponsorResponse { sponsor })))
}

#[utoipa::path(
    get,
    path = "/api/sponsors/{sponsor_id}",
    tag = "Sponsors",
    security(("bearerAuth" = [])),
    params(("sponsor_id" = String, Path, description = "Sponsor identifier")),
    responses(
        (status = 200, description = "Sponsor fetched", body = SponsorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Sponsor not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_sponsor(
    State(state): State<AppState>,
    Path(sponsor_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<SponsorResponse>, ApiError> {
    state.authorize(&headers)?;

    let sponsor = SponsorRepository::new(state.db_pool().clone())
        .get(&sponsor_id)
        .await?;

    Ok(Json(SponsorResponse { sponsor }))
}

#[utoipa::path(
    put,
    path = "/api/sponsors/{sponsor_id}",
    tag = "Sponsors",
    security(("bearerAuth" = [])),
    params(("sponsor_id" = String, Path, description = "Sponsor identifier")),
    request_body = UpdateSponsorRequest,
    responses(
        (status = 200, description = "Sponsor updated", body = SponsorResponse),
        (status = 400, description = "Invalid update payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Sponsor not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_sponsor(
    State(state): State<AppState>,
    Path(sponsor_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<UpdateSponsorRequest>,
) -> Result<Json<SponsorResponse>, ApiError> {
    state.authorize(&headers)?;

    let sponsor = SponsorRepository::new(state.db_pool().clone())
        .update(&sponsor_id, req)
        .await?;
    state.revalidate_event(&sponsor.event_id).await;

    Ok(Json(SponsorResponse { sponsor }))
}

#[utoipa::path(
    delete,
    path = "/api/sponsors/{sponsor_id}",
    tag = "Sponsors",
    security(("bearerAuth" = [])),
    params(("sponsor_id" = String, Path, description = "Sponsor identifier")),
    responses(
        (status = 204, description = "Sponsor deleted"),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Sponsor not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_sponsor(
    State(state): State<AppState>,
    Path(sponsor_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state.authorize(&headers)?;

    let repo = SponsorRepository::new(state.db_pool().clone());
    let sponsor = repo.get(&sponsor_id).await?;
    repo.delete(&sponsor.id).await?;
    state.revalidate_event(&sponsor.event_id).await;

    Ok(StatusCode::NO_CONTENT)
}
