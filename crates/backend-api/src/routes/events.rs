use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use eventdesk_database::{
    load_overview, rules, BudgetRepository, CreateEventRequest, Event, EventFilter,
    EventOverview, EventRepository, EventStatus, Page, UpdateEventRequest,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::{
    state::ViewCache,
    util::{today, ApiJson, ApiQuery},
    ApiError, AppState,
};

/// An event as stored plus its status for today.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventView {
    #[serde(flatten)]
    pub event: Event,
    pub effective_status: EventStatus,
}

impl EventView {
    fn for_today(event: Event) -> Self {
        let effective_status = rules::event::effective_status(&event, today());
        Self {
            event,
            effective_status,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventsResponse {
    pub events: Vec<EventView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventResponse {
    pub event: EventView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OverviewResponse {
    pub overview: EventOverview,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BudgetSummaryResponse {
    pub budget: eventdesk_database::BudgetSummary,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventsQuery {
    /// Status as of today (the `effective_status` each event reports)
    pub status: Option<EventStatus>,
    /// Case-insensitive match on name or venue
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    security(("bearerAuth" = [])),
    params(EventsQuery),
    responses(
        (status = 200, description = "Events ordered by start date", body = EventsResponse),
        (status = 400, description = "Invalid query", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(query): ApiQuery<EventsQuery>,
) -> Result<Json<EventsResponse>, ApiError> {
    state.authorize(&headers)?;

    let filter = EventFilter {
        status: query.status,
        today: Some(today()),
        search: query.search,
        page: Page::new(query.limit, query.offset),
    };
    let events = EventRepository::new(state.db_pool().clone())
        .list(&filter)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list events: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(EventsResponse {
        events: events.into_iter().map(EventView::for_today).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Events",
    security(("bearerAuth" = [])),
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Invalid event payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    state.authorize(&headers)?;

    let event = EventRepository::new(state.db_pool().clone())
        .create(req)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(EventResponse {
            event: EventView::for_today(event),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}",
    tag = "Events",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Event fetched", body = EventResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<EventResponse>, ApiError> {
    state.authorize(&headers)?;

    let event = EventRepository::new(state.db_pool().clone())
        .get(&event_id)
        .await?;

    Ok(Json(EventResponse {
        event: EventView::for_today(event),
    }))
}

#[utoipa::path(
    put,
    path = "/api/events/{event_id}",
    tag = "Events",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 400, description = "Invalid update payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<UpdateEventRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    state.authorize(&headers)?;

    let event = EventRepository::new(state.db_pool().clone())
        .update(&event_id, req)
        .await?;
    state.revalidate_event(&event.id).await;

    Ok(Json(EventResponse {
        event: EventView::for_today(event),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/events/{event_id}",
    tag = "Events",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    responses(
        (status = 204, description = "Event and all of its records deleted"),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state.authorize(&headers)?;

    EventRepository::new(state.db_pool().clone())
        .delete(&event_id)
        .await?;
    state.revalidate_event(&event_id).await;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/overview",
    tag = "Events",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Dashboard view of the event", body = OverviewResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_overview(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    state.authorize(&headers)?;

    let key = ViewCache::overview_key(&event_id);
    if let Some(cached) = state.views().get(&key).await {
        return Ok(Json(cached));
    }
    let generation = state.views().generation().await;

    let event = EventRepository::new(state.db_pool().clone())
        .get(&event_id)
        .await?;
    let overview = load_overview(state.db_pool(), event, today())
        .await
        .map_err(|e| {
            tracing::error!("Failed to load overview for event {}: {}", event_id, e);
            ApiError::from(e)
        })?;

    let body = serde_json::to_value(OverviewResponse { overview })?;
    state.views().insert(key, body.clone(), generation).await;
    Ok(Json(body))
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/budget",
    tag = "Budget",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Budget totals per category", body = BudgetSummaryResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_budget_summary(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    state.authorize(&headers)?;

    let key = ViewCache::budget_key(&event_id);
    if let Some(cached) = state.views().get(&key).await {
        return Ok(Json(cached));
    }
    let generation = state.views().generation().await;

    let event = EventRepository::new(state.db_pool().clone())
        .get(&event_id)
        .await?;
    let budget = BudgetRepository::new(state.db_pool().clone())
        .summary(&event)
        .await?;

    let body = serde_json::to_value(BudgetSummaryResponse { budget })?;
    state.views().insert(key, body.clone(), generation).await;
    Ok(Json(body))
}
