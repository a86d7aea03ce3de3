use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use eventdesk_database::{
    AssignmentPayment, CreateStaffRequest, Staff, StaffAssignmentRepository, StaffRepository,
    UpdateStaffRequest,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    util::{today, ApiJson, ApiQuery},
    ApiError, AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct StaffListResponse {
    pub staff: Vec<Staff>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StaffResponse {
    pub staff: Staff,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StaffAssignmentsResponse {
    pub assignments: Vec<AssignmentPayment>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StaffQuery {
    pub active: Option<bool>,
    /// Case-insensitive match on name or role
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/staff",
    tag = "Staff",
    security(("bearerAuth" = [])),
    params(StaffQuery),
    responses(
        (status = 200, description = "Staff directory", body = StaffListResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_staff(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(query): ApiQuery<StaffQuery>,
) -> Result<Json<StaffListResponse>, ApiError> {
    state.authorize(&headers)?;

    let staff = StaffRepository::new(state.db_pool().clone())
        .list(query.active, query.search.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("Failed to list staff: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(StaffListResponse { staff }))
}

#[utoipa::path(
    post,
    path = "/api/staff",
    tag = "Staff",
    security(("bearerAuth" = [])),
    request_body = CreateStaffRequest,
    responses(
        (status = 201, description = "Staff member created", body = StaffResponse),
        (status = 400, description = "Invalid staff payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_staff(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateStaffRequest>,
) -> Result<(StatusCode, Json<StaffResponse>), ApiError> {
    state.authorize(&headers)?;

    let staff = StaffRepository::new(state.db_pool().clone())
        .create(req)
        .await?;

    Ok((StatusCode::CREATED, Json(StaffResponse { staff })))
}

#[utoipa::path(
    get,
    path = "/api/staff/{staff_id}",
    tag = "Staff",
    security(("bearerAuth" = [])),
    params(("staff_id" = String, Path, description = "Staff member identifier")),
    responses(
        (status = 200, description = "Staff member fetched", body = StaffResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Staff member not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_staff(
    State(state): State<AppState>,
    Path(staff_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<StaffResponse>, ApiError> {
    state.authorize(&headers)?;

    let staff = StaffRepository::new(state.db_pool().clone())
        .get(&staff_id)
        .await?;

    Ok(Json(StaffResponse { staff }))
}

#[utoipa::path(
    put,
    path = "/api/staff/{staff_id}",
    tag = "Staff",
    security(("bearerAuth" = [])),
    params(("staff_id" = String, Path, description = "Staff member identifier")),
    request_body = UpdateStaffRequest,
    responses(
        (status = 200, description = "Staff member updated", body = StaffResponse),
        (status = 400, description = "Invalid update payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Staff member not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_staff(
    State(state): State<AppState>,
    Path(staff_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<UpdateStaffRequest>,
) -> Result<Json<StaffResponse>, ApiError> {
    state.authorize(&headers)?;

    let staff = StaffRepository::new(state.db_pool().clone())
        .update(&staff_id, req)
        .await?;

    Ok(Json(StaffResponse { staff }))
}

#[utoipa::path(
    delete,
    path = "/api/staff/{staff_id}",
    tag = "Staff",
    security(("bearerAuth" = [])),
    params(("staff_id" = String, Path, description = "Staff member identifier")),
    responses(
        (status = 204, description = "Staff member and their assignments deleted"),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Staff member not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_staff(
    State(state): State<AppState>,
    Path(staff_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state.authorize(&headers)?;

    StaffRepository::new(state.db_pool().clone())
        .delete(&staff_id)
        .await?;
    // assignments of any event may have gone with the staff member
    state.views().clear().await;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/staff/{staff_id}/assignments",
    tag = "Staff",
    security(("bearerAuth" = [])),
    params(("staff_id" = String, Path, description = "Staff member identifier")),
    responses(
        (status = 200, description = "Assignments of the staff member across events", body = StaffAssignmentsResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Staff member not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_staff_assignments(
    State(state): State<AppState>,
    Path(staff_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<StaffAssignmentsResponse>, ApiError> {
    state.authorize(&headers)?;

    let staff = StaffRepository::new(state.db_pool().clone())
        .get(&staff_id)
        .await?;
    let assignments = StaffAssignmentRepository::new(state.db_pool().clone())
        .list_for_staff(&staff.id, today())
        .await?;

    Ok(Json(StaffAssignmentsResponse { assignments }))
}
