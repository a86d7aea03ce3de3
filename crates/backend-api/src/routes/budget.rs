use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use eventdesk_database::{
    BudgetCategory, BudgetItem, BudgetRepository, CreateBudgetCategoryRequest,
    CreateBudgetItemRequest, UpdateBudgetCategoryRequest, UpdateBudgetItemRequest,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{routes::load_event, util::ApiJson, ApiError, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoriesResponse {
    pub categories: Vec<BudgetCategory>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub category: BudgetCategory,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemsResponse {
    pub items: Vec<BudgetItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemResponse {
    pub item: BudgetItem,
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/budget/categories",
    tag = "Budget",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Budget categories of the event", body = CategoriesResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CategoriesResponse>, ApiError> {
    state.authorize(&headers)?;
    let event = load_event(&state, &event_id).await?;

    let categories = BudgetRepository::new(state.db_pool().clone())
        .list_categories(&event.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list budget categories: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(CategoriesResponse { categories }))
}

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/budget/categories",
    tag = "Budget",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    request_body = CreateBudgetCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid category payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Category name already used for the event", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateBudgetCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    state.authorize(&headers)?;
    let event = load_event(&state, &event_id).await?;

    let category = BudgetRepository::new(state.db_pool().clone())
        .create_category(&event.id, req)
        .await?;
    state.revalidate_event(&event.id).await;

    Ok((StatusCode::CREATED, Json(CategoryResponse { category })))
}

#[utoipa::path(
    put,
    path = "/api/budget/categories/{category_id}",
    tag = "Budget",
    security(("bearerAuth" = [])),
    params(("category_id" = String, Path, description = "Budget category identifier")),
    request_body = UpdateBudgetCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Invalid update payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Category name already used for the event", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<UpdateBudgetCategoryRequest>,
) -> Result<Json<CategoryResponse>, ApiError> {
    state.authorize(&headers)?;

    let category = BudgetRepository::new(state.db_pool().clone())
        .update_category(&category_id, req)
        .await?;
    state.revalidate_event(&category.event_id).await;

    Ok(Json(CategoryResponse { category }))
}

#[utoipa::path(
    delete,
    path = "/api/budget/categories/{category_id}",
    tag = "Budget",
    security(("bearerAuth" = [])),
    params(("category_id" = String, Path, description = "Budget category identifier")),
    responses(
        (status = 204, description = "Category deleted, its items become uncategorised"),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state.authorize(&headers)?;

    let repo = BudgetRepository::new(state.db_pool().clone());
    let category = repo.get_category(&category_id).await?;
    repo.delete_category(&category.id).await?;
    state.revalidate_event(&category.event_id).await;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/budget/items",
    tag = "Budget",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Budget items of the event", body = ItemsResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_items(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ItemsResponse>, ApiError> {
    state.authorize(&headers)?;
    let event = load_event(&state, &event_id).await?;

    let items = BudgetRepository::new(state.db_pool().clone())
        .list_items(&event.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list budget items: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(ItemsResponse { items }))
}

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/budget/items",
    tag = "Budget",
    security(("bearerAuth" = [])),
    params(("event_id" = String, Path, description = "Event identifier")),
    request_body = CreateBudgetItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 400, description = "Invalid item payload or foreign category", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateBudgetItemRequest>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    state.authorize(&headers)?;
    let event = load_event(&state, &event_id).await?;

    let item = BudgetRepository::new(state.db_pool().clone())
        .create_item(&event.id, req)
        .await?;
    state.revalidate_event(&event.id).await;

    Ok((StatusCode::CREATED, Json(ItemResponse { item })))
}

#[utoipa::path(
    get,
    path = "/api/budget/items/{item_id}",
    tag = "Budget",
    security(("bearerAuth" = [])),
    params(("item_id" = String, Path, description = "Budget item identifier")),
    responses(
        (status = 200, description = "Item fetched", body = ItemResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ItemResponse>, ApiError> {
    state.authorize(&headers)?;

    let item = BudgetRepository::new(state.db_pool().clone())
        .get_item(&item_id)
        .await?;

    Ok(Json(ItemResponse { item }))
}

#[utoipa::path(
    put,
    path = "/api/budget/items/{item_id}",
    tag = "Budget",
    security(("bearerAuth" = [])),
    params(("item_id" = String, Path, description = "Budget item identifier")),
    request_body = UpdateBudgetItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ItemResponse),
        (status = 400, description = "Invalid update payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<UpdateBudgetItemRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
    state.authorize(&headers)?;

    let item = BudgetRepository::new(state.db_pool().clone())
        .update_item(&item_id, req)
        .await?;
    state.revalidate_event(&item.event_id).await;

    Ok(Json(ItemResponse { item }))
}

#[utoipa::path(
    delete,
    path = "/api/budget/items/{item_id}",
    tag = "Budget",
    security(("bearerAuth" = [])),
    params(("item_id" = String, Path, description = "Budget item identifier")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state.authorize(&headers)?;

    let repo = BudgetRepository::new(state.db_pool().clone());
    let item = repo.get_item(&item_id).await?;
    repo.delete_item(&item.id).await?;
    state.revalidate_event(&item.event_id).await;

    Ok(StatusCode::NO_CONTENT)
}
