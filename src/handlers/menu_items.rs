use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::common::created;
use crate::entities::menu_item;
use crate::errors::ServiceError;
use crate::services::menu_items::MenuItemInput;
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MenuQuery {
    /// Only return items currently offered to customers
    #[serde(default)]
    pub active: bool,
}

#[utoipa::path(
    get,
    path = "/api/v1/menu-items",
    summary = "List menu items",
    params(MenuQuery),
    responses(
        (status = 200, description = "Menu retrieved", body = ApiResponse<Vec<menu_item::Model>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Menu"
)]
pub async fn list_menu_items(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> ApiResult<Vec<menu_item::Model>> {
    let items = if query.active {
        state.services.menu_items.list_active_menu_items().await?
    } else {
        state.services.menu_items.list_menu_items().await?
    };
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/menu-items/{id}",
    summary = "Get menu item",
    params(("id" = i32, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Menu item retrieved", body = ApiResponse<menu_item::Model>),
        (status = 404, description = "Menu item not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Menu"
)]
pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<menu_item::Model> {
    state
        .services
        .menu_items
        .get_menu_item(id)
        .await?
        .map(|item| Json(ApiResponse::success(item)))
        .ok_or_else(|| ServiceError::NotFound(format!("Menu item {} not found", id)))
}

#[utoipa::path(
    post,
    path = "/api/v1/menu-items",
    summary = "Add menu item",
    request_body = MenuItemInput,
    responses(
        (status = 201, description = "Menu item created", body = ApiResponse<menu_item::Model>),
        (status = 400, description = "Invalid menu item", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Menu"
)]
pub async fn create_menu_item(
    State(state): State<AppState>,
    Json(input): Json<MenuItemInput>,
) -> Result<(StatusCode, Json<ApiResponse<menu_item::Model>>), ServiceError> {
    let item = state.services.menu_items.create_menu_item(input).await?;
    Ok(created(item))
}

#[utoipa::path(
    put,
    path = "/api/v1/menu-items/{id}",
    summary = "Update menu item",
    description = "Changes apply to future orders only; existing order lines keep their price",
    params(("id" = i32, Path, description = "Menu item ID")),
    request_body = MenuItemInput,
    responses(
        (status = 200, description = "Menu item updated", body = ApiResponse<menu_item::Model>),
        (status = 404, description = "Menu item not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Menu"
)]
pub async fn update_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<MenuItemInput>,
) -> ApiResult<menu_item::Model> {
    let item = state.services.menu_items.update_menu_item(id, input).await?;
    Ok(Json(ApiResponse::success(item)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/menu-items/{id}",
    summary = "Delete menu item",
    params(("id" = i32, Path, description = "Menu item ID")),
    responses(
        (status = 204, description = "Menu item deleted"),
        (status = 404, description = "Menu item not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Menu"
)]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServiceError> {
    state.services.menu_items.delete_menu_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
