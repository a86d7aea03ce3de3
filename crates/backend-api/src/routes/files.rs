use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use eventdesk_database::{CreateFileRequest, FileRecord, FileRepository};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{routes::load_event, util::ApiJson, ApiError, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct FilesResponse {
    pub files: Vec<FileRecord>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FileResponse {
    pub file: FileRecord,
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/files",
    tag = "Files",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "File records, newest first", body = FilesResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_files(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<FilesResponse>, ApiError> {
    state.authorize(&headers)?;
    let event = load_event(&state, &event_id).await?;

    let files = FileRepository::new(state.db_pool().clone())
        .list_for_event(&event.id)
        .await?;

    Ok(Json(FilesResponse { files }))
}

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/files",
    tag = "Files",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    request_body = CreateFileRequest,
    responses(
        (status = 201, description = "File record stored", body = FileResponse),
        (status = 400, description = "Invalid file record", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_file(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateFileRequest>,
) -> Result<(StatusCode, Json<FileResponse>), ApiError> {
    state.authorize(&headers)?;
    let event = load_event(&state, &event_id).await?;

    let file = FileRepository::new(state.db_pool().clone())
        .create(&event.id, req)
        .await?;
    state.revalidate_event(&event.id).await;

    Ok((StatusCode::CREATED, Json(FileResponse { file })))
}

#[utoipa::path(
    get,
    path = "/api/files/{file_id}",
    tag = "Files",
    security(("bearerAuth" = [])),
    params(("file_id" = String, Path, description = "File record identifier")),
    responses(
        (status = 200, description = "File record fetched", body = FileResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "File not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<FileResponse>, ApiError> {
    state.authorize(&headers)?;

    let file = FileRepository::new(state.db_pool().clone())
        .get(&file_id)
        .await?;

    Ok(Json(FileResponse { file }))
}

#[utoipa::path(
    delete,
    path = "/api/files/{file_id}",
    tag = "Files",
    security(("bearerAuth" = [])),
    params(("file_id" = String, Path, description = "File record identifier")),
    responses(
        (status = 204, description = "File record deleted"),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "File not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state.authorize(&headers)?;

    let repo = FileRepository::new(state.db_pool().clone());
    let file = repo.get(&file_id).await?;
    repo.delete(&file.id).await?;
    state.revalidate_event(&file.event_id).await;

    Ok(StatusCode::NO_CONTENT)
}
