use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use eventdesk_database::{
    AssignmentPayment, CreateAssignmentRequest, StaffAssignmentRepository, StaffCostSummary,
    UpdateAssignmentRequest,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    routes::load_event,
    util::{today, ApiJson},
    ApiError, AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignmentsResponse {
    pub assignments: Vec<AssignmentPayment>,
    pub costs: StaffCostSummary,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignmentResponse {
    pub assignment: AssignmentPayment,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshStatusesResponse {
    pub updated: u64,
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/assignments",
    tag = "Assignments",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Assignments with payment status for today", body = AssignmentsResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_assignments(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<AssignmentsResponse>, ApiError> {
    state.authorize(&headers)?;
    let event = load_event(&state, &event_id).await?;

    let today = today();
    let repo = StaffAssignmentRepository::new(state.db_pool().clone());
    let assignments = repo.list_for_event(&event.id, today).await.map_err(|e| {
        tracing::error!("Failed to list staff assignments: {}", e);
        ApiError::from(e)
    })?;
    let costs = repo.cost_summary(&event.id, today).await?;

    Ok(Json(AssignmentsResponse { assignments, costs }))
}

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/assignments",
    tag = "Assignments",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    request_body = CreateAssignmentRequest,
    responses(
        (status = 201, description = "Staff member assigned", body = AssignmentResponse),
        (status = 400, description = "Invalid assignment or inactive staff member", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_assignment(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<AssignmentResponse>), ApiError> {
    state.authorize(&headers)?;
    let event = load_event(&state, &event_id).await?;

    let assignment = StaffAssignmentRepository::new(state.db_pool().clone())
        .create(&event.id, req)
        .await?;
    state.revalidate_event(&event.id).await;

    Ok((
        StatusCode::CREATED,
        Json(AssignmentResponse {
            assignment: AssignmentPayment::evaluate(assignment, today()),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/assignments/{assignment_id}",
    tag = "Assignments",
    security(("bearerAuth" = [])),
    params(("assignment_id" = String, Path, description = "Assignment identifier")),
    responses(
        (status = 200, description = "Assignment fetched", body = AssignmentResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Assignment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_assignment(
    State(state): State<AppState>,
    Path(assignment_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<AssignmentResponse>, ApiError> {
    state.authorize(&headers)?;

    let assignment = StaffAssignmentRepository::new(state.db_pool().clone())
        .get(&assignment_id)
        .await?;

    Ok(Json(AssignmentResponse {
        assignment: AssignmentPayment::evaluate(assignment, today()),
    }))
}

#[utoipa::path(
    put,
    path = "/api/assignments/{assignment_id}",
    tag = "Assignments",
    security(("bearerAuth" = [])),
    params(("assignment_id" = String, Path, description = "Assignment identifier")),
    request_body = UpdateAssignmentRequest,
    responses(
        (status = 200, description = "Assignment updated", body = AssignmentResponse),
        (status = 400, description = "Invalid update or status transition", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Assignment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_assignment(
    State(state): State<AppState>,
    Path(assignment_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<UpdateAssignmentRequest>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    state.authorize(&headers)?;

    let assignment = StaffAssignmentRepository::new(state.db_pool().clone())
        .update(&assignment_id, req)
        .await?;
    state.revalidate_event(&assignment.event_id).await;

    Ok(Json(AssignmentResponse {
        assignment: AssignmentPayment::evaluate(assignment, today()),
    }))
}

#[utoipa::path(
    post,
    path = "/api/assignments/{assignment_id}/mark-paid",
    tag = "Assignments",
    security(("bearerAuth" = [])),
    params(("assignment_id" = String, Path, description = "Assignment identifier")),
    responses(
        (status = 200, description = "Payment recorded", body = AssignmentResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Assignment not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Assignment is cancelled or already paid", body = crate::error::ErrorResponse)
    )
)]
pub async fn mark_assignment_paid(
    State(state): State<AppState>,
    Path(assignment_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<AssignmentResponse>, ApiError> {
    state.authorize(&headers)?;

    let assignment = StaffAssignmentRepository::new(state.db_pool().clone())
        .mark_paid(&assignment_id)
        .await?;
    state.revalidate_event(&assignment.event_id).await;

    Ok(Json(AssignmentResponse {
        assignment: AssignmentPayment::evaluate(assignment, today()),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/assignments/{assignment_id}",
    tag = "Assignments",
    security(("bearerAuth" = [])),
    params(("assignment_id" = String, Path, description = "Assignment identifier")),
    responses(
        (status = 204, description = "Assignment deleted"),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Assignment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_assignment(
    State(state): State<AppState>,
    Path(assignment_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state.authorize(&headers)?;

    let repo = StaffAssignmentRepository::new(state.db_pool().clone());
    let assignment = repo.get(&assignment_id).await?;
    repo.delete(&assignment.id).await?;
    state.revalidate_event(&assignment.event_id).await;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/assignments/refresh-statuses",
    tag = "Assignments",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Stored payment statuses brought up to date", body = RefreshStatusesResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn refresh_statuses(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RefreshStatusesResponse>, ApiError> {
    state.authorize(&headers)?;

    let updated = StaffAssignmentRepository::new(state.db_pool().clone())
        .refresh_statuses(today())
        .await
        .map_err(|e| {
            tracing::error!("Failed to refresh payment statuses: {}", e);
            ApiError::from(e)
        })?;
    if updated > 0 {
        state.views().clear().await;
    }

    Ok(Json(RefreshStatusesResponse { updated }))
}
