//! Self-service ordering for signed-in customers.

use axum::{extract::State, http::StatusCode, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};
use utoipa::ToSchema;

use super::common::{created, price_lines};
use crate::auth::AuthUser;
use crate::entities::menu_item;
use crate::errors::ServiceError;
use crate::services::customers::CustomerProfile;
use crate::services::orders::{CustomerOrderLine, PlacedOrder};
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PortalLine {
    pub menu_item_id: i32,
    /// Lines with quantity 0 are ignored
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PortalOrderRequest {
    pub items: Vec<PortalLine>,
}

#[utoipa::path(
    get,
    path = "/api/v1/portal/menu",
    summary = "Browse the menu",
    responses(
        (status = 200, description = "Items currently offered", body = ApiResponse<Vec<menu_item::Model>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Portal"
)]
pub async fn menu(State(state): State<AppState>) -> ApiResult<Vec<menu_item::Model>> {
    let items = state.services.menu_items.list_active_menu_items().await?;
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    post,
    path = "/api/v1/portal/orders",
    summary = "Place an order",
    description = "Prices come from the current menu. The order is processed by the order-desk employee.",
    request_body = PortalOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = ApiResponse<PlacedOrder>),
        (status = 400, description = "Nothing ordered or item unavailable", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Portal"
)]
#[instrument(skip(state, request), fields(customer = %user.email))]
pub async fn place_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<PortalOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PlacedOrder>>), ServiceError> {
    let wanted: Vec<(i32, i32, Option<Decimal>)> = request
        .items
        .iter()
        .filter(|line| line.quantity != 0)
        .map(|line| (line.menu_item_id, line.quantity, None))
        .collect();
    if wanted.is_empty() {
        return Err(ServiceError::ValidationError(
            "Select at least one menu item".to_string(),
        ));
    }

    let menu = state.services.menu_items.list_active_menu_items().await?;
    let items = price_lines(&menu, wanted, |id| {
        ServiceError::ValidationError(format!("Menu item {} is not available", id))
    })?;

    let desk_email = &state.config.order_desk_email;
    let desk = state
        .services
        .employees
        .get_employee_by_email(desk_email)
        .await?
        .ok_or_else(|| {
            warn!(email = %desk_email, "Order desk employee is missing");
            ServiceError::InternalError(format!("No employee record for order desk {}", desk_email))
        })?;

    let customer_id = state
        .services
        .customers
        .ensure_customer(&user.email, CustomerProfile::from_email(&user.email))
        .await?;

    let placed = state
        .services
        .orders
        .place_order(Some(customer_id), desk.employee_id, items)
        .await?;
    Ok(created(placed))
}

#[utoipa::path(
    get,
    path = "/api/v1/portal/orders",
    summary = "My orders",
    description = "Order history of the signed-in customer, one row per line",
    responses(
        (status = 200, description = "Order lines", body = ApiResponse<Vec<CustomerOrderLine>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Portal"
)]
pub async fn my_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Vec<CustomerOrderLine>> {
    let customer_id = state
        .services
        .customers
        .ensure_customer(&user.email, CustomerProfile::from_email(&user.email))
        .await?;
    let lines = state.services.orders.customer_orders(customer_id).await?;
    Ok(Json(ApiResponse::success(lines)))
}
