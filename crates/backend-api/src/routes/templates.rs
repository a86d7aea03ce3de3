use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use eventdesk_database::{
    CreateEmailTemplateRequest, EmailTemplate, EmailTemplateRepository, RenderedTemplate,
    UpdateEmailTemplateRequest,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    routes::load_event,
    util::{ApiJson, ApiQuery},
    ApiError, AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct TemplatesResponse {
    pub templates: Vec<EmailTemplate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TemplateResponse {
    pub template: EmailTemplate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PreviewResponse {
    pub preview: RenderedTemplate,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TemplatesQuery {
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PreviewTemplateRequest {
    /// Event whose name, venue and dates fill the `event_*` placeholders
    pub event_id: Option<String>,
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

#[utoipa::path(
    get,
    path = "/api/email-templates",
    tag = "Email templates",
    security(("bearerAuth" = [])),
    params(TemplatesQuery),
    responses(
        (status = 200, description = "Templates ordered by name", body = TemplatesResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_templates(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(query): ApiQuery<TemplatesQuery>,
) -> Result<Json<TemplatesResponse>, ApiError> {
    state.authorize(&headers)?;

    let templates = EmailTemplateRepository::new(state.db_pool().clone())
        .list(query.category.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("Failed to list email templates: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(TemplatesResponse { templates }))
}

#[utoipa::path(
    post,
    path = "/api/email-templates",
    tag = "Email templates",
    security(("bearerAuth" = [])),
    request_body = CreateEmailTemplateRequest,
    responses(
        (status = 201, description = "Template created", body = TemplateResponse),
        (status = 400, description = "Invalid template payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 409, description = "Template name already used", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_template(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateEmailTemplateRequest>,
) -> Result<(StatusCode, Json<TemplateResponse>), ApiError> {
    state.authorize(&headers)?;

    let template = EmailTemplateRepository::new(state.db_pool().clone())
        .create(req)
        .await?;

    Ok((StatusCode::CREATED, Json(TemplateResponse { template })))
}

#[utoipa::path(
    get,
    path = "/api/email-templates/{template_id}",
    tag = "Email templates",
    security(("bearerAuth" = [])),
    params(("template_id" = String, Path, description = "Email template identifier")),
    responses(
        (status = 200, description = "Template fetched", body = TemplateResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Template not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_template(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<TemplateResponse>, ApiError> {
    state.authorize(&headers)?;

    let template = EmailTemplateRepository::new(state.db_pool().clone())
        .get(&template_id)
        .await?;

    Ok(Json(TemplateResponse { template }))
}

#[utoipa::path(
    put,
    path = "/api/email-templates/{template_id}",
    tag = "Email templates",
    security(("bearerAuth" = [])),
    params(("template_id" = String, Path, description = "Email template identifier")),
    request_body = UpdateEmailTemplateRequest,
    responses(
        (status = 200, description = "Template updated", body = TemplateResponse),
        (status = 400, description = "Invalid update payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Template not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Template name already used", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_template(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<UpdateEmailTemplateRequest>,
) -> Result<Json<TemplateResponse>, ApiError> {
    state.authorize(&headers)?;

    let template = EmailTemplateRepository::new(state.db_pool().clone())
        .update(&template_id, req)
        .await?;

    Ok(Json(TemplateResponse { template }))
}

#[utoipa::path(
    delete,
    path = "/api/email-templates/{template_id}",
    tag = "Email templates",
    security(("bearerAuth" = [])),
    params(("template_id" = String, Path, description = "Email template identifier")),
    responses(
        (status = 204, description = "Template deleted"),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Template not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_template(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state.authorize(&headers)?;

    EmailTemplateRepository::new(state.db_pool().clone())
        .delete(&template_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/email-templates/{template_id}/preview",
    tag = "Email templates",
    security(("bearerAuth" = [])),
    params(("template_id" = String, Path, description = "Email template identifier")),
    request_body = PreviewTemplateRequest,
    responses(
        (status = 200, description = "Rendered subject and body", body = PreviewResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Template or event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn preview_template(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<PreviewTemplateRequest>,
) -> Result<Json<PreviewResponse>, ApiError> {
    state.authorize(&headers)?;

    let event = match req.event_id.as_deref() {
        Some(event_id) => Some(load_event(&state, event_id).await?),
        None => None,
    };
    let preview = EmailTemplateRepository::new(state.db_pool().clone())
        .preview(&template_id, event.as_ref(), req.variables)
        .await?;

    Ok(Json(PreviewResponse { preview }))
}
